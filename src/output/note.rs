//! Markdown source notes
//!
//! A note sits next to the downloaded file and records where it came from:
//! YAML front matter with the video's metadata, a link to the source and the
//! clip ranges that were kept.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{ClipSpec, VideoInfo};

/// Front matter block
#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a str>,
    title: &'a str,
    #[serde(rename = "publish date", skip_serializing_if = "Option::is_none")]
    publish_date: Option<String>,
    #[serde(skip_serializing_if = "no_tags")]
    tags: &'a [String],
}

fn no_tags(tags: &&[String]) -> bool {
    tags.is_empty()
}

/// Note describing one downloaded file
#[derive(Debug, Clone)]
pub struct SourceNote<'a> {
    pub info: &'a VideoInfo,
    pub url: &'a str,
    pub clip: &'a ClipSpec,
    pub tags: &'a [String],
    pub comment: Option<&'a str>,
}

impl<'a> SourceNote<'a> {
    /// Note path for a media file: same stem, `.md`
    pub fn path_for(media: &Path) -> PathBuf {
        media.with_extension("md")
    }

    /// Render the note
    pub fn render(&self, heading: &str) -> Result<String, serde_yaml::Error> {
        let front = FrontMatter {
            author: self.info.uploader.as_deref(),
            title: &self.info.title,
            publish_date: self.info.upload_date.as_deref().map(format_publish_date),
            tags: self.tags,
        };
        let yaml = serde_yaml::to_string(&front)?;

        let mut note = String::new();
        note.push_str("---\n");
        note.push_str(&yaml);
        note.push_str("---\n");
        note.push_str(&format!("# {}\n", heading));

        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(|t| format!("#{}", t)).collect();
            note.push_str(&format!("Tags: {}\n", tags.join(", ")));
        }

        note.push_str(&format!("[Source]({})\n", self.url));
        note.push_str(&format!("Video downloaded from {}\n", source_host(self.url)));

        if !self.clip.is_empty() {
            note.push_str(&format!("Clipped: {}\n", self.clip));
        }

        if let Some(comment) = self.comment.filter(|c| !c.trim().is_empty()) {
            note.push_str(&format!("\n\n{}\n", comment.trim()));
        }

        Ok(note)
    }

    /// Render the note that goes next to `media`, without writing it
    pub fn prepare(&self, media: &Path) -> DomainResult<PreparedNote> {
        let path = Self::path_for(media);
        let heading = media
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.info.title.clone());

        let text = self
            .render(&heading)
            .map_err(|e| render_failure(&path, e))?;
        Ok(PreparedNote { path, text })
    }
}

/// A rendered note and the path it belongs at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedNote {
    pub path: PathBuf,
    pub text: String,
}

impl PreparedNote {
    pub fn save(&self) -> DomainResult<PathBuf> {
        std::fs::write(&self.path, &self.text).map_err(|e| DomainError::fs(&self.path, e))?;
        debug!("Source note saved: {}", self.path.display());
        Ok(self.path.clone())
    }
}

/// Rendering failures belong to the note file, not to the configuration
fn render_failure(path: &Path, err: serde_yaml::Error) -> DomainError {
    DomainError::FilesystemError {
        path: path.to_path_buf(),
        message: format!("failed to render note metadata: {}", err),
    }
}

/// `20091025` -> `2009-10-25`; other formats pass through
fn format_publish_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Host name of the source, for the note body
fn source_host(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| "the web".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> VideoInfo {
        VideoInfo {
            id: "abc".to_string(),
            title: "A Talk: Part 1".to_string(),
            uploader: Some("Conference".to_string()),
            upload_date: Some("20240102".to_string()),
            duration: Some(100.0),
            streams: Vec::new(),
        }
    }

    #[test]
    fn test_render_full_note() {
        let info = info();
        let clip = ClipSpec::parse("0:10-0:20").unwrap();
        let tags = vec!["talk".to_string(), "rust".to_string()];
        let note = SourceNote {
            info: &info,
            url: "https://www.youtube.com/watch?v=abc",
            clip: &clip,
            tags: &tags,
            comment: Some("worth rewatching"),
        };

        let text = note.render("A Talk_ Part 1").unwrap();

        assert!(text.starts_with("---\n"));
        assert!(text.contains("author: Conference\n"));
        assert!(text.contains("publish date:"));
        assert!(text.contains("2024-01-02"));
        assert!(text.contains("- talk\n"));
        assert!(text.contains("# A Talk_ Part 1\n"));
        assert!(text.contains("Tags: #talk, #rust\n"));
        assert!(text.contains("[Source](https://www.youtube.com/watch?v=abc)\n"));
        assert!(text.contains("Video downloaded from youtube.com\n"));
        assert!(text.contains("Clipped: 0:10-0:20\n"));
        assert!(text.ends_with("\n\nworth rewatching\n"));
    }

    #[test]
    fn test_render_minimal_note() {
        let mut info = info();
        info.uploader = None;
        info.upload_date = None;
        let clip = ClipSpec::default();
        let note = SourceNote {
            info: &info,
            url: "https://example.com/v/1",
            clip: &clip,
            tags: &[],
            comment: None,
        };

        let text = note.render("heading").unwrap();

        assert!(!text.contains("author"));
        assert!(!text.contains("publish date"));
        assert!(!text.contains("Tags:"));
        assert!(!text.contains("Clipped:"));
        assert!(text.contains("title:"));
        assert!(text.contains("A Talk: Part 1"));
    }

    #[test]
    fn test_prepare_and_save_next_to_media() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let media = temp_dir.path().join("Some Video.mp4");
        let info = info();
        let clip = ClipSpec::default();
        let note = SourceNote {
            info: &info,
            url: "https://example.com/v/1",
            clip: &clip,
            tags: &[],
            comment: None,
        };

        let prepared = note.prepare(&media).unwrap();
        assert!(!prepared.path.exists());

        let path = prepared.save().unwrap();
        assert_eq!(path, temp_dir.path().join("Some Video.md"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("# Some Video\n"));
    }

    #[test]
    fn test_render_failure_is_a_filesystem_error() {
        let yaml_err = <serde_yaml::Error as serde::ser::Error>::custom("bad value");
        let err = render_failure(Path::new("/out/Talk.md"), yaml_err);

        assert_eq!(err.stage(), "filesystem");
        match err {
            DomainError::FilesystemError { path, message } => {
                assert_eq!(path, PathBuf::from("/out/Talk.md"));
                assert!(message.contains("bad value"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_format_publish_date() {
        assert_eq!(format_publish_date("20091025"), "2009-10-25");
        assert_eq!(format_publish_date("2009"), "2009");
    }
}
