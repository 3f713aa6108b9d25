//! In-memory adapters
//!
//! Fakes for the download, clipboard and encoder ports. They touch the
//! filesystem only to create placeholder output files so the pipeline can be
//! exercised without network access or an ffmpeg install.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Encoder that records each call and writes placeholder outputs
#[derive(Default)]
pub struct RecordingEncoder {
    calls: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the call whose label equals `label`
    pub fn failing_on(label: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(label.to_string()),
        }
    }

    /// Labels of every call so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, label: String, output: &Path) -> DomainResult<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(label.clone());
        }

        if self.fail_on.as_deref() == Some(label.as_str()) {
            return Err(DomainError::EncodingFailed {
                stage: label,
                message: "exit status: 1".to_string(),
            });
        }

        std::fs::write(output, label.as_bytes()).map_err(|e| DomainError::fs(output, e))
    }
}

impl EncodePort for RecordingEncoder {
    fn extract_segment(&self, _input: &Path, range: &ClipRange, output: &Path) -> DomainResult<()> {
        self.record(format!("extract {}", range), output)
    }

    fn concat(&self, segments: &[PathBuf], output: &Path) -> DomainResult<()> {
        self.record(format!("concat {}", segments.len()), output)
    }

    fn mux(&self, _video: &Path, _audio: &Path, output: &Path) -> DomainResult<()> {
        self.record("mux".to_string(), output)
    }

    fn extract_audio(&self, _input: &Path, output: &Path) -> DomainResult<()> {
        self.record("audio".to_string(), output)
    }
}

/// Downloader serving a fixed [`VideoInfo`]
pub struct FakeDownloader {
    info: VideoInfo,
    failure: Option<String>,
    requests: Mutex<Vec<String>>,
}

impl FakeDownloader {
    pub fn new(info: VideoInfo) -> Self {
        Self {
            info,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Downloader whose every call fails with `reason`
    pub fn failing(reason: &str) -> Self {
        Self {
            info: VideoInfo::default(),
            failure: Some(reason.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `info <url>` and `download <format_id>` entries, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn record(&self, entry: String) -> DomainResult<()> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(entry);
        }
        match &self.failure {
            Some(reason) => Err(DomainError::DownloadFailed(reason.clone())),
            None => Ok(()),
        }
    }
}

impl DownloadPort for FakeDownloader {
    fn fetch_info(&self, url: &str) -> DomainResult<VideoInfo> {
        self.record(format!("info {}", url))?;
        Ok(self.info.clone())
    }

    fn download(&self, _url: &str, stream: &StreamHandle, dest_dir: &Path) -> DomainResult<PathBuf> {
        self.record(format!("download {}", stream.format_id))?;
        let path = dest_dir.join(format!("{}.{}", stream.format_id, stream.container));
        std::fs::write(&path, stream.format_id.as_bytes()).map_err(|e| DomainError::fs(&path, e))?;
        Ok(path)
    }
}

/// Clipboard holding fixed text
pub struct FakeClipboard(pub Option<String>);

impl FakeClipboard {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn with_text(text: &str) -> Self {
        Self(Some(text.to_string()))
    }
}

impl ClipboardPort for FakeClipboard {
    fn read_text(&self) -> Option<String> {
        self.0.clone()
    }
}
