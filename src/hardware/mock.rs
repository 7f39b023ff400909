use async_trait::async_trait;
use crate::hardware::line_sink::{LineSink, SinkResult};
use crate::playback::StopSignal;

/// Recording sink for tests
///
/// Captures every line it is handed. Can simulate a device failure after
/// a number of lines, or raise a stop signal once enough lines arrived.
pub struct RecorderSink {
    lines: Vec<Vec<u8>>,
    fail_after: Option<usize>,
    stop_after: Option<(usize, StopSignal)>,
}

impl RecorderSink {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            fail_after: None,
            stop_after: None,
        }
    }

    /// Accept `count` lines, then fail every send
    pub fn failing_after(count: usize) -> Self {
        Self {
            fail_after: Some(count),
            ..Self::new()
        }
    }

    /// Trigger `stop` once `count` lines have been recorded
    pub fn stopping_after(count: usize, stop: StopSignal) -> Self {
        Self {
            stop_after: Some((count, stop)),
            ..Self::new()
        }
    }

    pub fn lines(&self) -> &[Vec<u8>] {
        &self.lines
    }

    /// Recorded lines as text, for readable assertions
    pub fn texts(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|l| String::from_utf8_lossy(l).into_owned())
            .collect()
    }
}

#[async_trait]
impl LineSink for RecorderSink {
    async fn send_line(&mut self, line: &[u8]) -> SinkResult<()> {
        if let Some(limit) = self.fail_after {
            if self.lines.len() >= limit {
                return Err("Device disconnected".into());
            }
        }

        self.lines.push(line.to_vec());

        if let Some((count, stop)) = &self.stop_after {
            if self.lines.len() >= *count {
                stop.trigger();
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "recorder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recorder_captures_lines() {
        let mut sink = RecorderSink::new();
        sink.send_line(b"A\r\n").await.unwrap();
        sink.send_line(b"B\r\n").await.unwrap();
        assert_eq!(sink.texts(), vec!["A\r\n", "B\r\n"]);
    }

    #[tokio::test]
    async fn test_recorder_fails_after_limit() {
        let mut sink = RecorderSink::failing_after(1);
        assert!(sink.send_line(b"A\r\n").await.is_ok());
        assert!(sink.send_line(b"B\r\n").await.is_err());
        assert_eq!(sink.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_recorder_raises_stop() {
        let stop = StopSignal::new();
        let mut sink = RecorderSink::stopping_after(2, stop.clone());
        sink.send_line(b"A\r\n").await.unwrap();
        assert!(!stop.is_triggered());
        sink.send_line(b"B\r\n").await.unwrap();
        assert!(stop.is_triggered());
    }
}
