//! Runtime configuration
//!
//! Built once at startup from defaults, overlaid by an optional TOML file and
//! then by command-line flags, and passed by reference from there on.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use directories::{BaseDirs, UserDirs};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Application name used for config and log paths
pub const APP_NAME: &str = "dylt";

/// Log file name placed in the home directory
pub const LOG_FILE_NAME: &str = ".log-dylt.log";

/// User-editable settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where finished files are written
    pub output_dir: PathBuf,
    /// Maximum video height, highest available when unset
    pub resolution: Option<u32>,
    /// Container for audio-only output
    pub audio_format: String,
    /// Joins tags onto the base file name
    pub tag_separator: String,
    /// chrono format for an optional `"<stamp> - "` file name prefix
    pub timestamp_format: Option<String>,
    /// Always write a markdown source note next to the output
    pub write_note: bool,
    /// Log file, truncated on every run
    pub log_file: Option<PathBuf>,
    /// Write the log file as JSON lines
    pub log_json: bool,
    pub ffmpeg_path: PathBuf,
    pub downloader_path: PathBuf,
    /// Cut segments with stream copy (fast, keyframe aligned) instead of re-encoding
    pub copy_segments: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            resolution: None,
            audio_format: "mp3".to_string(),
            tag_separator: "_".to_string(),
            timestamp_format: None,
            write_note: false,
            log_file: default_log_file(),
            log_json: false,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            downloader_path: PathBuf::from("yt-dlp"),
            copy_segments: false,
        }
    }
}

/// Values from the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_dir: Option<PathBuf>,
    pub resolution: Option<u32>,
}

impl Config {
    /// Apply command-line overrides
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if overrides.resolution.is_some() {
            self.resolution = overrides.resolution;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> DomainResult<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(DomainError::Config("output_dir cannot be empty".to_string()));
        }

        if self.audio_format.is_empty()
            || !self.audio_format.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(DomainError::Config(format!(
                "audio_format must be a bare extension such as 'mp3', got '{}'",
                self.audio_format
            )));
        }

        if self.tag_separator.contains(['/', '\\']) {
            return Err(DomainError::Config(
                "tag_separator cannot contain path separators".to_string(),
            ));
        }

        if let Some(format) = &self.timestamp_format {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(DomainError::Config(format!(
                    "timestamp_format '{}' is not a valid strftime format",
                    format
                )));
            }
        }

        if self.resolution == Some(0) {
            return Err(DomainError::Config("resolution must be positive".to_string()));
        }

        for (key, path) in [
            ("ffmpeg_path", &self.ffmpeg_path),
            ("downloader_path", &self.downloader_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(DomainError::Config(format!("{} cannot be empty", key)));
            }
        }

        Ok(())
    }
}

/// The user's Downloads directory, else the current directory
fn default_output_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `~/.log-dylt.log`
fn default_log_file() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(LOG_FILE_NAME))
}
