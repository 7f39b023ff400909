use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a run before or during playback
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Unable to find file '{}'", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unable to read file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to allocate buffer of {size} bytes")]
    Allocation { size: usize },

    #[error("Unable to open {device}: {reason}")]
    PortOpen { device: String, reason: String },

    #[error("Error writing to {device}: {reason}")]
    PortWrite { device: String, reason: String },

    #[error("Error reading file, stopping: {0}")]
    PlaybackRead(#[source] std::io::Error),

    #[error("Invalid line window: start line {start} is after end line {end}")]
    InvalidWindow { start: u32, end: u32 },

    #[error("Unable to load settings from '{}': {reason}", path.display())]
    Settings { path: PathBuf, reason: String },
}

pub type PlayerResult<T> = Result<T, PlayerError>;
