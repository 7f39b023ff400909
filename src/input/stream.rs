use crate::core::LineRecord;

/// What a single byte did to the stream state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteEvent {
    /// Byte was accumulated or dropped; no line is ready yet
    Pending,
    /// A line feed completed the current line
    LineComplete,
}

/// Position and accumulation state for byte-by-byte playback
#[derive(Debug, Clone)]
pub struct StreamState {
    line: LineRecord,
    bytes_processed: u64,
    line_count: u64,
}

impl StreamState {
    pub fn new(max_line: usize) -> Self {
        Self {
            line: LineRecord::with_limit(max_line),
            bytes_processed: 0,
            line_count: 0,
        }
    }

    /// Consume one byte read from the source
    pub fn feed(&mut self, byte: u8) -> ByteEvent {
        self.bytes_processed += 1;
        match byte {
            b'\n' => ByteEvent::LineComplete,
            b'\r' => ByteEvent::Pending,
            other => {
                self.line.push(other);
                ByteEvent::Pending
            }
        }
    }

    /// The line accumulated so far
    pub fn line(&self) -> &LineRecord {
        &self.line
    }

    /// 1-based number of the line currently being accumulated
    pub fn current_line_number(&self) -> u64 {
        self.line_count + 1
    }

    /// Close the completed line and return the updated line count
    pub fn finish_line(&mut self) -> u64 {
        self.line.clear();
        self.line_count += 1;
        self.line_count
    }

    /// Bytes consumed since the last restart
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }

    #[cfg(test)]
    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    /// Return to the start of the source, forgetting any partial line
    pub fn restart(&mut self) {
        self.line.clear();
        self.bytes_processed = 0;
        self.line_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::STREAMING_MAX_LINE;

    #[test]
    fn test_feed_accumulates_until_line_feed() {
        let mut state = StreamState::new(STREAMING_MAX_LINE);
        for &b in b"ONE" {
            assert_eq!(state.feed(b), ByteEvent::Pending);
        }
        assert_eq!(state.feed(b'\n'), ByteEvent::LineComplete);
        assert_eq!(state.line().as_bytes(), b"ONE");
        assert_eq!(state.current_line_number(), 1);

        assert_eq!(state.finish_line(), 1);
        assert!(state.line().is_empty());
        assert_eq!(state.bytes_processed(), 4);
    }

    #[test]
    fn test_carriage_return_is_dropped_but_counted() {
        let mut state = StreamState::new(STREAMING_MAX_LINE);
        state.feed(b'A');
        state.feed(b'\r');
        assert_eq!(state.feed(b'\n'), ByteEvent::LineComplete);
        assert_eq!(state.line().as_bytes(), b"A");
        assert_eq!(state.bytes_processed(), 3);
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut state = StreamState::new(STREAMING_MAX_LINE);
        for &b in b"A\nB" {
            if state.feed(b) == ByteEvent::LineComplete {
                state.finish_line();
            }
        }
        assert_eq!(state.line_count(), 1);
        assert_eq!(state.line().as_bytes(), b"B");

        state.restart();
        assert_eq!(state.line_count(), 0);
        assert_eq!(state.bytes_processed(), 0);
        assert!(state.line().is_empty());
    }

    #[test]
    fn test_overlong_line_is_truncated() {
        let mut state = StreamState::new(2);
        for &b in b"ABCD" {
            state.feed(b);
        }
        assert_eq!(state.line().as_bytes(), b"AB");
        assert!(state.line().is_truncated());
    }
}
