pub mod buffered;
pub mod engine;
mod session;
pub mod streaming;
pub mod window;

pub use engine::PlaybackEngine;
pub use window::Window;

use crate::core::{BUFFERED_MAX_LINE, STREAMING_MAX_LINE};
use crate::error::PlayerError;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default pause between lines
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(100);

/// Minimum wait before restarting when a pass produced nothing
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How the log is read during playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Whole file loaded once, lines resolved from memory
    Buffered,
    /// File read one byte at a time, re-measured every pass
    Streaming,
}

impl PlaybackMode {
    /// Default line content limit for this mode
    pub fn default_max_line(self) -> usize {
        match self {
            PlaybackMode::Buffered => BUFFERED_MAX_LINE,
            PlaybackMode::Streaming => STREAMING_MAX_LINE,
        }
    }
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// First line to play, 1-based; 0 behaves like 1
    pub start_line: u32,
    /// Last line to play, 1-based inclusive; `None` plays to the end
    pub end_line: Option<u32>,
    /// Stop after one pass instead of looping forever
    pub once: bool,
    pub pause: Duration,
    pub verbose: bool,
    pub mode: PlaybackMode,
    /// Longest line content kept; longer lines are truncated
    pub max_line: usize,
    pub poll_interval: Duration,
    /// Print a `Line i of N` progress line on stdout
    pub show_progress: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            start_line: 0,
            end_line: None,
            once: false,
            pause: DEFAULT_PAUSE,
            verbose: false,
            mode: PlaybackMode::Buffered,
            max_line: BUFFERED_MAX_LINE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            show_progress: true,
        }
    }
}

impl PlaybackConfig {
    /// Validated line window for this configuration
    pub fn window(&self) -> Result<Window, PlayerError> {
        Window::new(self.start_line, self.end_line)
    }
}

/// How a run ended
#[derive(Debug)]
pub enum PlaybackOutcome {
    /// The requested passes finished
    Completed,
    /// A read or write failed mid-run
    DeviceError(PlayerError),
    /// The stop signal was raised
    Interrupted,
}

/// Summary of one run
#[derive(Debug)]
pub struct PlaybackReport {
    pub outcome: PlaybackOutcome,
    /// Passes that ran to the end of the window
    pub passes: u64,
    pub lines_sent: u64,
    pub bytes_sent: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PlaybackReport {
    #[cfg(test)]
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, PlaybackOutcome::Completed)
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Shared stop flag, checked by playback at every line boundary
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
