use crate::error::PlayerError;
use crate::hardware::LineSink;
use crate::playback::{PlaybackOutcome, PlaybackReport, StopSignal};
use chrono::Utc;
use std::io::Write;
use std::time::Duration;
use tracing::trace;

/// Per-run transmit state shared by both playback loops
pub(crate) struct Session<'a> {
    sink: &'a mut dyn LineSink,
    stop: &'a StopSignal,
    pause: Duration,
    show_progress: bool,
    report: PlaybackReport,
    pass_lines: u64,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        sink: &'a mut dyn LineSink,
        stop: &'a StopSignal,
        pause: Duration,
        show_progress: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            sink,
            stop,
            pause,
            show_progress,
            report: PlaybackReport {
                outcome: PlaybackOutcome::Completed,
                passes: 0,
                lines_sent: 0,
                bytes_sent: 0,
                started_at: now,
                finished_at: now,
            },
            pass_lines: 0,
        }
    }

    pub(crate) fn interrupted(&self) -> bool {
        self.stop.is_triggered()
    }

    /// Hand one line to the sink, then wait out the pacing delay
    pub(crate) async fn transmit(&mut self, wire: &[u8]) -> Result<(), PlayerError> {
        self.sink
            .send_line(wire)
            .await
            .map_err(|e| PlayerError::PortWrite {
                device: self.sink.name().to_string(),
                reason: e.to_string(),
            })?;

        self.report.lines_sent += 1;
        self.report.bytes_sent += wire.len() as u64;
        self.pass_lines += 1;

        if self.pause.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.pause).await;
        }
        Ok(())
    }

    /// Report the current position; `total` is known in buffered mode only
    pub(crate) fn progress(&self, line: u64, total: Option<usize>) {
        trace!("Line {} of {:?}", line, total);
        if !self.show_progress {
            return;
        }
        match total {
            Some(total) => print!("Line {} of {}\r", line, total),
            None => print!("Line {}\r", line),
        }
        let _ = std::io::stdout().flush();
    }

    /// Close a pass, returning how many lines it transmitted
    pub(crate) fn complete_pass(&mut self) -> u64 {
        self.report.passes += 1;
        std::mem::take(&mut self.pass_lines)
    }

    /// Forget lines counted towards an unfinished pass
    pub(crate) fn abandon_pass(&mut self) {
        self.pass_lines = 0;
    }

    pub(crate) fn finish(mut self, outcome: PlaybackOutcome) -> PlaybackReport {
        self.report.outcome = outcome;
        self.report.finished_at = Utc::now();
        self.report
    }
}
