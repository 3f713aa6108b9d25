// Domain rules - Business logic and policies

use chrono::{DateTime, Local};
use url::Url;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::*;

/// Fallback base name when a title sanitizes to nothing
pub const DEFAULT_BASE_NAME: &str = "video";

/// Longest file name most filesystems accept, in bytes
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Rules for deciding whether a piece of text is a usable source URL
pub struct SourceValidator;

impl SourceValidator {
    /// Parse text as an absolute http(s) URL with a host
    pub fn parse(text: &str) -> Option<Url> {
        let text = text.trim();
        if text.is_empty() || text.contains(char::is_whitespace) {
            return None;
        }

        let url = Url::parse(text).ok()?;
        let web = matches!(url.scheme(), "http" | "https");
        if web && url.host_str().is_some_and(|h| !h.is_empty()) {
            Some(url)
        } else {
            None
        }
    }

    /// Check if text looks like a source URL
    pub fn is_valid(text: &str) -> bool {
        Self::parse(text).is_some()
    }

    /// Resolve the source: an explicit URL wins, then the clipboard text
    pub fn resolve(explicit: Option<&str>, clipboard: Option<&str>) -> DomainResult<String> {
        if let Some(url) = explicit {
            return Self::parse(url)
                .map(String::from)
                .ok_or_else(|| DomainError::DownloadFailed(format!("'{}' is not a valid URL", url.trim())));
        }

        clipboard
            .and_then(Self::parse)
            .map(String::from)
            .ok_or(DomainError::NoSourceProvided)
    }
}

/// Rules for picking streams out of the formats a site exposes
pub struct StreamSelector;

impl StreamSelector {
    /// Choose what to download
    ///
    /// Audio-only requests take the best audio-only stream, falling back to a
    /// combined stream. Video requests take the best combined stream unless a
    /// taller video-only stream can be paired with an audio-only stream.
    pub fn select(
        info: &VideoInfo,
        audio_only: bool,
        max_height: Option<u32>,
    ) -> DomainResult<StreamSelection> {
        let best_audio = Self::best_audio(&info.streams);

        if audio_only {
            return best_audio
                .or_else(|| Self::best_video(&info.streams, StreamKind::Combined, None))
                .cloned()
                .map(StreamSelection::Single)
                .ok_or_else(|| {
                    DomainError::DownloadFailed(format!("no audio stream available for '{}'", info.title))
                });
        }

        let combined = Self::best_video(&info.streams, StreamKind::Combined, max_height);
        let video_only = Self::best_video(&info.streams, StreamKind::VideoOnly, max_height);

        match (combined, video_only, best_audio) {
            (Some(combined), Some(video), Some(audio))
                if video.height.unwrap_or(0) > combined.height.unwrap_or(0) =>
            {
                Ok(StreamSelection::Separate {
                    video: video.clone(),
                    audio: audio.clone(),
                })
            }
            (Some(combined), _, _) => Ok(StreamSelection::Single(combined.clone())),
            (None, Some(video), Some(audio)) => Ok(StreamSelection::Separate {
                video: video.clone(),
                audio: audio.clone(),
            }),
            _ => Err(DomainError::DownloadFailed(format!(
                "no suitable video stream available for '{}'",
                info.title
            ))),
        }
    }

    /// Highest bitrate audio-only stream
    fn best_audio(streams: &[StreamHandle]) -> Option<&StreamHandle> {
        streams
            .iter()
            .filter(|s| s.kind == StreamKind::AudioOnly)
            .max_by(|a, b| {
                a.bitrate
                    .unwrap_or(0.0)
                    .total_cmp(&b.bitrate.unwrap_or(0.0))
            })
    }

    /// Tallest stream of a kind within the height cap, bitrate breaks ties
    fn best_video(
        streams: &[StreamHandle],
        kind: StreamKind,
        max_height: Option<u32>,
    ) -> Option<&StreamHandle> {
        streams
            .iter()
            .filter(|s| s.kind == kind)
            .filter(|s| match (max_height, s.height) {
                (Some(cap), Some(height)) => height <= cap,
                _ => true,
            })
            .max_by(|a, b| {
                a.height
                    .unwrap_or(0)
                    .cmp(&b.height.unwrap_or(0))
                    .then(a.bitrate.unwrap_or(0.0).total_cmp(&b.bitrate.unwrap_or(0.0)))
            })
    }
}

/// Rules for building the output file name
pub struct FileNamer;

impl FileNamer {
    /// Make a title safe to use as a file name
    pub fn sanitize(title: &str) -> String {
        let options = sanitize_filename::Options {
            truncate: true,
            windows: true,
            replacement: "_",
        };
        let cleaned = sanitize_filename::sanitize_with_options(title.trim(), options);
        let cleaned = cleaned.trim();

        // Nothing left but replacement characters and dots
        if cleaned.chars().all(|c| c == '_' || c == '.' || c.is_whitespace()) {
            DEFAULT_BASE_NAME.to_string()
        } else {
            cleaned.to_string()
        }
    }

    /// Build the base name (no extension)
    ///
    /// `<stamp> - <name><sep><tag1><sep><tag2>`, where the stamp is only
    /// present when a timestamp format is configured.
    pub fn base_name(
        name: Option<&str>,
        title: &str,
        tags: &[String],
        separator: &str,
        stamp: Option<&str>,
    ) -> String {
        let mut base = Self::sanitize(name.unwrap_or(title));

        for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            base.push_str(separator);
            base.push_str(tag);
        }

        let base = match stamp {
            Some(stamp) if !stamp.is_empty() => format!("{} - {}", stamp, base),
            _ => base,
        };

        // Tags and separators come from the user, run the result through again
        Self::sanitize(&base)
    }

    /// Shorten `base` so `<base>.<ext>` fits for every extension given
    ///
    /// Cuts on a char boundary and drops trailing dots and spaces left by
    /// the cut.
    pub fn fit_extensions(base: &str, extensions: &[&str]) -> String {
        let reserved = extensions
            .iter()
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.len() + 1)
            .max()
            .unwrap_or(0);
        let limit = MAX_FILE_NAME_BYTES.saturating_sub(reserved);
        if base.len() <= limit {
            return base.to_string();
        }

        let mut end = limit;
        while !base.is_char_boundary(end) {
            end -= 1;
        }
        let cut = base[..end].trim_end_matches(['.', ' ']);
        if cut.is_empty() {
            DEFAULT_BASE_NAME.to_string()
        } else {
            cut.to_string()
        }
    }

    /// Render the optional timestamp prefix
    pub fn stamp(format: Option<&str>, now: DateTime<Local>) -> Option<String> {
        format
            .filter(|f| !f.is_empty())
            .map(|f| now.format(f).to_string())
    }
}
