//! dylt: download online videos, optionally trimmed
//!
//! The source URL comes from `--url` or the clipboard. The video is fetched
//! with yt-dlp, cut and joined with ffmpeg according to a compact clip spec
//! such as `0:08-5:01,6:00-6:30`, optionally reduced to its audio track and
//! saved under a sanitized name with an optional markdown source note.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod output;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use domain::errors::{DomainError, DomainResult};
pub use domain::model::{ClipRange, ClipSpec, DownloadRequest, MediaFile, MediaKind, VideoInfo};
