pub mod splitter;
pub mod stream;

pub use splitter::{count_lines, LineSplitter};
pub use stream::{ByteEvent, StreamState};

use crate::error::{PlayerError, PlayerResult};
use crate::playback::PlaybackMode;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Raw bytes of a log file, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBuffer {
    data: Vec<u8>,
}

impl LogBuffer {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of lines playback will resolve from this buffer
    pub fn line_count(&self) -> usize {
        count_lines(&self.data)
    }
}

/// A log opened for playback in a particular mode
#[derive(Debug)]
pub enum LogSource {
    /// Whole file in memory
    Buffered(LogBuffer),
    /// Open handle, read byte by byte
    Streaming(File),
}

impl LogSource {
    /// Check the file exists, then load or open it for `mode`
    pub async fn open(path: &Path, mode: PlaybackMode) -> PlayerResult<Self> {
        ensure_exists(path).await?;
        match mode {
            PlaybackMode::Buffered => load_log(path).await.map(LogSource::Buffered),
            PlaybackMode::Streaming => open_log(path).await.map(LogSource::Streaming),
        }
    }
}

/// Fail with `FileNotFound` unless `path` names an existing file
pub async fn ensure_exists(path: &Path) -> PlayerResult<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(PlayerError::FileNotFound(path.to_path_buf())),
    }
}

/// Open a log file for streaming playback
pub async fn open_log(path: &Path) -> PlayerResult<File> {
    File::open(path).await.map_err(|source| PlayerError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a whole log file into memory for buffered playback
pub async fn load_log(path: &Path) -> PlayerResult<LogBuffer> {
    let mut file = open_log(path).await?;
    let read_error = |source| PlayerError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let size = file.metadata().await.map_err(read_error)?.len() as usize;

    let mut data = Vec::new();
    data.try_reserve_exact(size)
        .map_err(|_| PlayerError::Allocation { size })?;

    file.read_to_end(&mut data).await.map_err(read_error)?;
    debug!("Loaded {} bytes from {}", data.len(), path.display());

    Ok(LogBuffer::from_bytes(data))
}
