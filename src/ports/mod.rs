// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for the video download capability
pub trait DownloadPort: Send + Sync {
    /// Fetch title, uploader and the list of available streams
    fn fetch_info(&self, url: &str) -> DomainResult<VideoInfo>;

    /// Download one stream into `dest_dir` and return the file it produced
    fn download(&self, url: &str, stream: &StreamHandle, dest_dir: &Path) -> DomainResult<PathBuf>;
}

/// Port for reading the system clipboard
pub trait ClipboardPort: Send + Sync {
    /// Current clipboard text, `None` when empty or not text
    fn read_text(&self) -> Option<String>;
}

/// Port for the external media encoder
pub trait EncodePort: Send + Sync {
    /// Cut `range` out of `input` into `output`
    fn extract_segment(&self, input: &Path, range: &ClipRange, output: &Path) -> DomainResult<()>;

    /// Join `segments` in order into `output`
    fn concat(&self, segments: &[PathBuf], output: &Path) -> DomainResult<()>;

    /// Combine a video-only and an audio-only file into `output`
    fn mux(&self, video: &Path, audio: &Path, output: &Path) -> DomainResult<()>;

    /// Drop the video track and transcode the audio into `output`
    fn extract_audio(&self, input: &Path, output: &Path) -> DomainResult<()>;
}
