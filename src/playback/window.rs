use crate::error::PlayerError;

/// Inclusive, 1-based range of file lines selected for playback
///
/// Line numbers count from the first line of the file, not of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    start: u64,
    end: Option<u64>,
}

impl Default for Window {
    fn default() -> Self {
        Self { start: 1, end: None }
    }
}

impl Window {
    /// Build a window; a start of 0 is the same as 1
    pub fn new(start: u32, end: Option<u32>) -> Result<Self, PlayerError> {
        let first = start.max(1);
        if let Some(last) = end {
            if first > last {
                return Err(PlayerError::InvalidWindow { start, end: last });
            }
        }
        Ok(Self {
            start: u64::from(first),
            end: end.map(u64::from),
        })
    }

    /// First line of the window
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Lines that precede the window and are skipped before playback
    pub fn lines_before(&self) -> usize {
        (self.start - 1) as usize
    }

    /// Whether `line` has not yet passed the end of the window
    pub fn within_end(&self, line: u64) -> bool {
        self.end.map_or(true, |end| line <= end)
    }

    /// Whether a pass that has completed `count` lines is done
    pub fn is_exhausted_by(&self, count: u64) -> bool {
        self.end.is_some_and(|end| count >= end)
    }
}
