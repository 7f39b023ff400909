use crate::core::{BUFFERED_MAX_LINE, STREAMING_MAX_LINE};
use crate::error::{PlayerError, PlayerResult};
use crate::hardware::serial::DEFAULT_BAUD;
use crate::playback::{DEFAULT_PAUSE, DEFAULT_POLL_INTERVAL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persistent defaults, overridden by command line switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub port: u32,
    pub baud: u32,
    pub pause_ms: u64,
    /// Explicit device path, used instead of one derived from `port`
    pub device: Option<String>,
    pub poll_interval_ms: u64,
    pub buffered_max_line: usize,
    pub streaming_max_line: usize,
    pub write_timeout_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            port: 1,
            baud: DEFAULT_BAUD,
            pause_ms: DEFAULT_PAUSE.as_millis() as u64,
            device: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            buffered_max_line: BUFFERED_MAX_LINE,
            streaming_max_line: STREAMING_MAX_LINE,
            write_timeout_ms: 3000,
        }
    }
}

impl PlayerSettings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("serial-log-player").join("settings.json"))
    }

    /// Read settings from `path`; a missing file gives the defaults
    pub fn load_from(path: &Path) -> PlayerResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let error = |reason: String| PlayerError::Settings {
            path: path.to_path_buf(),
            reason,
        };
        let contents = fs::read_to_string(path).map_err(|e| error(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| error(e.to_string()))
    }

    /// Load from `explicit` or the default location, falling back to defaults
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(path) => path,
            None => return Self::default(),
        };
        match Self::load_from(&path) {
            Ok(settings) => {
                debug!("Settings loaded from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("{}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = PlayerSettings::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, PlayerSettings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "baud": 9600, "device": "/dev/ttyUSB0" }"#).unwrap();

        let settings = PlayerSettings::load_from(&path).unwrap();
        assert_eq!(settings.baud, 9600);
        assert_eq!(settings.device.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(settings.port, 1);
        assert_eq!(settings.pause_ms, 100);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            PlayerSettings::load_from(&path),
            Err(PlayerError::Settings { .. })
        ));
        assert_eq!(PlayerSettings::load(Some(&path)), PlayerSettings::default());
    }
}
