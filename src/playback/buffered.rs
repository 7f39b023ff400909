use crate::core::CRLF;
use crate::input::{LineSplitter, LogBuffer};
use crate::playback::session::Session;
use crate::playback::{PlaybackConfig, PlaybackOutcome, Window};
use tracing::{debug, warn};

/// Walk the window of an in-memory log, one pass or forever
pub(crate) async fn run(
    buffer: &LogBuffer,
    config: &PlaybackConfig,
    window: Window,
    session: &mut Session<'_>,
) -> PlaybackOutcome {
    let total = buffer.line_count();
    let mut splitter = LineSplitter::new(buffer.as_bytes(), config.max_line);

    let skipped = splitter.skip_lines(window.lines_before());
    let window_start = splitter.position();
    debug!(
        "Buffered playback: {} lines, skipped {}, window {:?}",
        total, skipped, window
    );

    loop {
        splitter.rewind_to(window_start);
        let mut line_number = window.start();

        while window.within_end(line_number) {
            if session.interrupted() {
                return PlaybackOutcome::Interrupted;
            }
            let Some(line) = splitter.next_line() else {
                break;
            };
            if line.is_truncated() {
                warn!(
                    "Line {} exceeds {} bytes and was truncated",
                    line_number,
                    line.max_len()
                );
            }

            session.progress(line_number, Some(total));
            if let Err(e) = session.transmit(&line.to_wire(CRLF)).await {
                return PlaybackOutcome::DeviceError(e);
            }
            line_number += 1;
        }

        let sent = session.complete_pass();
        if config.once {
            return PlaybackOutcome::Completed;
        }
        if session.interrupted() {
            return PlaybackOutcome::Interrupted;
        }
        if sent == 0 {
            tokio::time::sleep(config.poll_interval).await;
        }
    }
}
