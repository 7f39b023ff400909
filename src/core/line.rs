/// Default content limit for lines resolved from an in-memory buffer
pub const BUFFERED_MAX_LINE: usize = 200;

/// Default content limit for lines accumulated from a byte stream
pub const STREAMING_MAX_LINE: usize = 1000;

/// Canonical terminator appended to buffered-mode lines
pub const CRLF: &[u8] = b"\r\n";

/// Terminator retained on streaming-mode lines
pub const LF: &[u8] = b"\n";

/// One output line with its terminator stripped
///
/// Content is bounded by `max_len`. Bytes pushed past the limit are
/// discarded and the record is flagged as truncated; the caller still
/// consumes the source up to the next terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    content: Vec<u8>,
    max_len: usize,
    truncated: bool,
}

impl LineRecord {
    /// Create an empty record holding at most `max_len` content bytes
    pub fn with_limit(max_len: usize) -> Self {
        Self {
            content: Vec::with_capacity(max_len.min(BUFFERED_MAX_LINE)),
            max_len,
            truncated: false,
        }
    }

    /// Append one byte, returning false if it was dropped by the limit
    pub fn push(&mut self, byte: u8) -> bool {
        if self.content.len() >= self.max_len {
            self.truncated = true;
            return false;
        }
        self.content.push(byte);
        true
    }

    /// Append a run of bytes, keeping only what fits
    #[cfg(test)]
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        let room = self.max_len.saturating_sub(self.content.len());
        if bytes.len() > room {
            self.truncated = true;
        }
        self.content.extend_from_slice(&bytes[..bytes.len().min(room)]);
    }

    #[cfg(test)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether any byte was discarded because of the limit
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Reset to empty, keeping the limit and the allocation
    pub fn clear(&mut self) {
        self.content.clear();
        self.truncated = false;
    }

    /// Build the bytes handed to a sink: content followed by `terminator`
    pub fn to_wire(&self, terminator: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.content.len() + terminator.len());
        out.extend_from_slice(&self.content);
        out.extend_from_slice(terminator);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_within_limit() {
        let mut line = LineRecord::with_limit(4);
        for b in b"ABCD" {
            assert!(line.push(*b));
        }
        assert_eq!(line.as_bytes(), b"ABCD");
        assert!(!line.is_truncated());
    }

    #[test]
    fn test_push_past_limit_truncates() {
        let mut line = LineRecord::with_limit(3);
        line.push(b'A');
        line.push(b'B');
        line.push(b'C');
        assert!(!line.push(b'D'));
        assert_eq!(line.as_bytes(), b"ABC");
        assert!(line.is_truncated());
    }

    #[test]
    fn test_extend_keeps_prefix() {
        let mut line = LineRecord::with_limit(5);
        line.extend_from_slice(b"HELLO WORLD");
        assert_eq!(line.as_bytes(), b"HELLO");
        assert!(line.is_truncated());
    }

    #[test]
    fn test_clear_resets_truncation() {
        let mut line = LineRecord::with_limit(1);
        line.extend_from_slice(b"XY");
        line.clear();
        assert!(line.is_empty());
        assert!(!line.is_truncated());
        assert_eq!(line.max_len(), 1);
    }

    #[test]
    fn test_to_wire_appends_terminator() {
        let mut line = LineRecord::with_limit(BUFFERED_MAX_LINE);
        line.extend_from_slice(b"AAA");
        assert_eq!(line.to_wire(CRLF), b"AAA\r\n".to_vec());
        assert_eq!(line.to_wire(LF), b"AAA\n".to_vec());

        let empty = LineRecord::with_limit(BUFFERED_MAX_LINE);
        assert_eq!(empty.to_wire(CRLF), b"\r\n".to_vec());
    }
}
