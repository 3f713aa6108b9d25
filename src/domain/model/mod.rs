// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::utils::time::{format_offset, parse_offset};

/// Separator between clip ranges
pub const RANGE_LIST_SEPARATOR: char = ',';
/// Separator between the start and end of one range
pub const RANGE_SEPARATOR: char = '-';

/// A single time range to keep, in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipRange {
    pub start: u32,
    pub end: u32,
}

impl ClipRange {
    /// Create a new clip range with validation
    pub fn new(start: u32, end: u32) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::malformed(
                format!("{}{}{}", format_offset(start), RANGE_SEPARATOR, format_offset(end)),
                "start is after end",
            ));
        }
        Ok(Self { start, end })
    }

    /// Parse one `start-end` token
    pub fn parse(token: &str) -> DomainResult<Self> {
        let token = token.trim();
        let parts: Vec<&str> = token.split(RANGE_SEPARATOR).collect();
        if parts.len() != 2 {
            return Err(DomainError::malformed(
                token,
                format!("expected exactly one '{}' between start and end", RANGE_SEPARATOR),
            ));
        }

        let start = parse_offset(parts[0]).ok_or_else(|| {
            DomainError::malformed(token, format!("invalid start '{}'", parts[0].trim()))
        })?;
        let end = parse_offset(parts[1]).ok_or_else(|| {
            DomainError::malformed(token, format!("invalid end '{}'", parts[1].trim()))
        })?;

        if start > end {
            return Err(DomainError::malformed(token, "start is after end"));
        }

        Ok(Self { start, end })
    }

    /// Length of the range in seconds
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }
}

impl fmt::Display for ClipRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            format_offset(self.start),
            RANGE_SEPARATOR,
            format_offset(self.end)
        )
    }
}

/// Ordered list of ranges; insertion order is output order
///
/// An empty spec means "no trimming requested".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipSpec {
    ranges: Vec<ClipRange>,
}

impl ClipSpec {
    /// Create a clip spec from already validated ranges
    pub fn new(ranges: Vec<ClipRange>) -> Self {
        Self { ranges }
    }

    /// Parse comma separated `start-end` tokens
    ///
    /// Blank input yields an empty spec.
    pub fn parse(input: &str) -> DomainResult<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }

        let ranges = input
            .split(RANGE_LIST_SEPARATOR)
            .map(ClipRange::parse)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &[ClipRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Total kept duration in seconds
    pub fn total_duration(&self) -> u64 {
        self.ranges.iter().map(|r| u64::from(r.duration())).sum()
    }
}

impl FromStr for ClipSpec {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ClipSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", RANGE_LIST_SEPARATOR)?;
            }
            write!(f, "{}", range)?;
        }
        Ok(())
    }
}

/// What a local media file contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Audio,
}

/// A locally materialized media file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>, kind: MediaKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Container extension, lowercased
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Check whether the file already uses the given container
    pub fn has_extension(&self, ext: &str) -> bool {
        self.extension()
            .map(|own| own.eq_ignore_ascii_case(ext))
            .unwrap_or(false)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Kind of stream exposed by the download capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamKind {
    /// Video and audio in one file
    Combined,
    VideoOnly,
    AudioOnly,
}

/// One downloadable format of a remote video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamHandle {
    pub format_id: String,
    pub kind: StreamKind,
    pub container: String,
    pub height: Option<u32>,
    /// Total bitrate in kbit/s when reported
    pub bitrate: Option<f64>,
}

impl StreamHandle {
    pub fn new(format_id: impl Into<String>, kind: StreamKind, container: impl Into<String>) -> Self {
        Self {
            format_id: format_id.into(),
            kind,
            container: container.into(),
            height: None,
            bitrate: None,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_bitrate(mut self, bitrate: f64) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    /// Media kind of a file downloaded from this stream
    pub fn media_kind(&self) -> MediaKind {
        match self.kind {
            StreamKind::AudioOnly => MediaKind::Audio,
            StreamKind::Combined | StreamKind::VideoOnly => MediaKind::Video,
        }
    }
}

/// Metadata reported by the download capability for one URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub uploader: Option<String>,
    /// Publish date as reported (`YYYYMMDD` for most sites)
    pub upload_date: Option<String>,
    /// Duration in seconds
    pub duration: Option<f64>,
    pub streams: Vec<StreamHandle>,
}

/// Streams chosen for download
#[derive(Debug, Clone, PartialEq)]
pub enum StreamSelection {
    /// One file holds everything needed
    Single(StreamHandle),
    /// Video and audio fetched separately and muxed by the encoder
    Separate {
        video: StreamHandle,
        audio: StreamHandle,
    },
}

/// Everything the user asked for in one invocation
#[derive(Debug, Clone, Default)]
pub struct DownloadRequest {
    /// Explicit source URL; the clipboard is consulted when absent
    pub url: Option<String>,
    /// Output base name; defaults to the sanitized title
    pub name: Option<String>,
    pub tags: Vec<String>,
    pub audio_only: bool,
    pub clip: ClipSpec,
    /// Maximum video height
    pub resolution: Option<u32>,
    /// Free-text comment for the source note
    pub note: Option<String>,
    pub overwrite: bool,
}

impl DownloadRequest {
    pub fn new() -> Self {
        Self::default()
    }
}
