use crate::core::LineRecord;

/// Count the lines a `LineSplitter` will yield for `data`
///
/// Every `\n` closes a line; a trailing fragment without a terminator
/// counts as one more line. An empty buffer has no lines.
pub fn count_lines(data: &[u8]) -> usize {
    if data.is_empty() {
        return 0;
    }
    let terminators = data.iter().filter(|&&b| b == b'\n').count();
    if data.last() == Some(&b'\n') {
        terminators
    } else {
        terminators + 1
    }
}

/// Resolves logical lines from an in-memory buffer
///
/// `\r` bytes are dropped, `\n` ends a line and is consumed, and the end
/// of the buffer ends the last line. Lines longer than `max_len` keep
/// their first `max_len` bytes and the position still moves past the
/// terminator.
#[derive(Debug, Clone)]
pub struct LineSplitter<'a> {
    data: &'a [u8],
    pos: usize,
    max_len: usize,
}

impl<'a> LineSplitter<'a> {
    pub fn new(data: &'a [u8], max_len: usize) -> Self {
        Self {
            data,
            pos: 0,
            max_len,
        }
    }

    /// Byte offset of the next unread line
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Move back to a position previously returned by `position`
    pub fn rewind_to(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    /// Produce the next line, or `None` once the buffer is exhausted
    pub fn next_line(&mut self) -> Option<LineRecord> {
        if self.is_at_end() {
            return None;
        }

        let rest = &self.data[self.pos..];
        let (segment, consumed) = match rest.iter().position(|&b| b == b'\n') {
            Some(idx) => (&rest[..idx], idx + 1),
            None => (rest, rest.len()),
        };

        let mut line = LineRecord::with_limit(self.max_len);
        for &byte in segment.iter().filter(|&&b| b != b'\r') {
            if !line.push(byte) {
                break;
            }
        }

        self.pos += consumed;
        Some(line)
    }

    /// Discard up to `count` lines, returning how many were skipped
    pub fn skip_lines(&mut self, count: usize) -> usize {
        let mut skipped = 0;
        while skipped < count && self.next_line().is_some() {
            skipped += 1;
        }
        skipped
    }
}

impl Iterator for LineSplitter<'_> {
    type Item = LineRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BUFFERED_MAX_LINE;

    fn lines(data: &[u8]) -> Vec<Vec<u8>> {
        LineSplitter::new(data, BUFFERED_MAX_LINE)
            .map(|l| l.as_bytes().to_vec())
            .collect()
    }

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(b""), 0);
        assert_eq!(count_lines(b"one"), 1);
        assert_eq!(count_lines(b"one\ntwo"), 2);
        assert_eq!(count_lines(b"one\ntwo\n"), 2);
        assert_eq!(count_lines(b"X\n\nY\n"), 3);
        assert_eq!(count_lines(b"\n"), 1);
    }

    #[test]
    fn test_count_matches_splitter() {
        for data in [&b"a\nb\nc"[..], b"a\r\nb\r\n", b"\n\n\n", b"x", b""] {
            assert_eq!(count_lines(data), lines(data).len());
        }
    }

    #[test]
    fn test_unterminated_file_counts_one_plus_newlines() {
        let data = b"l1\nl2\nl3\nl4";
        let newlines = data.iter().filter(|&&b| b == b'\n').count();
        assert_eq!(count_lines(data), newlines + 1);
    }

    #[test]
    fn test_split_strips_carriage_returns() {
        assert_eq!(
            lines(b"AAA\r\nB\rB\r\n"),
            vec![b"AAA".to_vec(), b"BB".to_vec()]
        );
    }

    #[test]
    fn test_split_keeps_empty_lines() {
        assert_eq!(
            lines(b"X\n\nY\n"),
            vec![b"X".to_vec(), Vec::new(), b"Y".to_vec()]
        );
    }

    #[test]
    fn test_split_last_line_without_terminator() {
        assert_eq!(lines(b"A\nB"), vec![b"A".to_vec(), b"B".to_vec()]);
    }

    #[test]
    fn test_split_truncates_long_line_and_resyncs() {
        let mut splitter = LineSplitter::new(b"ABCDEFGH\nNEXT\n", 4);

        let first = splitter.next_line().unwrap();
        assert_eq!(first.as_bytes(), b"ABCD");
        assert!(first.is_truncated());

        let second = splitter.next_line().unwrap();
        assert_eq!(second.as_bytes(), b"NEXT");
        assert!(!second.is_truncated());
        assert!(splitter.next_line().is_none());
    }

    #[test]
    fn test_skip_and_rewind() {
        let mut splitter = LineSplitter::new(b"1\n2\n3\n", BUFFERED_MAX_LINE);
        assert_eq!(splitter.skip_lines(1), 1);
        let mark = splitter.position();
        assert_eq!(splitter.next_line().unwrap().as_bytes(), b"2");

        splitter.rewind_to(mark);
        assert_eq!(splitter.next_line().unwrap().as_bytes(), b"2");
        assert_eq!(splitter.skip_lines(10), 1);
        assert!(splitter.is_at_end());
    }
}
