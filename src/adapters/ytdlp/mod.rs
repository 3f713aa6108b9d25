//! yt-dlp download adapter
//!
//! Metadata comes from `--dump-single-json`; each stream is fetched with an
//! explicit `-f <format_id>` into the caller's working directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Codec value yt-dlp reports for a missing track
const NO_CODEC: &str = "none";

/// Download adapter backed by the yt-dlp binary
pub struct YtDlpAdapter {
    program: PathBuf,
}

impl YtDlpAdapter {
    /// Create new yt-dlp adapter
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["--no-playlist", "--no-warnings"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    /// Run a prepared command and return stdout
    fn run(&self, mut command: Command) -> DomainResult<Vec<u8>> {
        debug!("Executing: {:?}", command);

        let output = command.output().map_err(|e| {
            DomainError::DownloadFailed(format!(
                "failed to start {}: {}",
                self.program.display(),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::DownloadFailed(describe_failure(&stderr)));
        }

        Ok(output.stdout)
    }
}

impl DownloadPort for YtDlpAdapter {
    fn fetch_info(&self, url: &str) -> DomainResult<VideoInfo> {
        info!("Fetching stream list for {}", url);

        let mut command = self.command();
        command.arg("--dump-single-json").arg(url);
        let stdout = self.run(command)?;

        let info = parse_video_info(&stdout)?;
        debug!("{} streams available for '{}'", info.streams.len(), info.title);
        Ok(info)
    }

    fn download(&self, url: &str, stream: &StreamHandle, dest_dir: &Path) -> DomainResult<PathBuf> {
        info!(
            "Downloading stream {} ({:?}, {})",
            stream.format_id, stream.kind, stream.container
        );

        let template = dest_dir.join(format!("{}.%(ext)s", stream.format_id));
        let mut command = self.command();
        command
            .args(["--no-progress", "--no-simulate", "--no-part"])
            .args(["--print", "after_move:filepath"])
            .arg("-f")
            .arg(&stream.format_id)
            .arg("-o")
            .arg(&template)
            .arg(url);
        let stdout = self.run(command)?;

        let printed = String::from_utf8_lossy(&stdout);
        if let Some(path) = printed
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(PathBuf::from)
            .filter(|p| p.is_file())
        {
            return Ok(path);
        }

        locate_download(dest_dir, &stream.format_id).ok_or_else(|| {
            DomainError::DownloadFailed(format!(
                "stream {} finished but no file was found in {}",
                stream.format_id,
                dest_dir.display()
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    uploader: Option<String>,
    upload_date: Option<String>,
    duration: Option<f64>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: String,
    #[serde(default)]
    ext: String,
    vcodec: Option<String>,
    acodec: Option<String>,
    height: Option<u32>,
    tbr: Option<f64>,
    abr: Option<f64>,
}

impl RawFormat {
    /// Classify by reported codecs; `None` for formats with no media tracks
    fn kind(&self) -> Option<StreamKind> {
        if self.ext == "mhtml" {
            return None;
        }
        let has = |codec: &Option<String>| codec.as_deref() != Some(NO_CODEC);
        match (has(&self.vcodec), has(&self.acodec)) {
            (true, true) => Some(StreamKind::Combined),
            (true, false) => Some(StreamKind::VideoOnly),
            (false, true) => Some(StreamKind::AudioOnly),
            (false, false) => None,
        }
    }

    fn into_handle(self) -> Option<StreamHandle> {
        let kind = self.kind()?;
        Some(StreamHandle {
            format_id: self.format_id,
            kind,
            container: self.ext,
            height: self.height,
            bitrate: self.tbr.or(self.abr),
        })
    }
}

/// Parse `--dump-single-json` output
pub fn parse_video_info(json: &[u8]) -> DomainResult<VideoInfo> {
    let raw: RawInfo = serde_json::from_slice(json).map_err(|e| {
        DomainError::DownloadFailed(format!("downloader returned invalid metadata: {}", e))
    })?;

    let title = if raw.title.trim().is_empty() {
        raw.id.clone()
    } else {
        raw.title
    };

    Ok(VideoInfo {
        id: raw.id,
        title,
        uploader: raw.uploader,
        upload_date: raw.upload_date,
        duration: raw.duration,
        streams: raw
            .formats
            .into_iter()
            .filter_map(RawFormat::into_handle)
            .collect(),
    })
}

/// Find the file yt-dlp wrote for `format_id` when it did not print one
fn locate_download(dest_dir: &Path, format_id: &str) -> Option<PathBuf> {
    WalkDir::new(dest_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .find(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy() == format_id)
                .unwrap_or(false)
        })
}

/// Turn yt-dlp stderr into a short reason
pub fn describe_failure(stderr: &str) -> String {
    let lower = stderr.to_lowercase();

    if lower.contains("private video") {
        return "this video is private".to_string();
    }
    if lower.contains("confirm your age") || lower.contains("age-restricted") {
        return "video is age restricted".to_string();
    }
    if lower.contains("not available in your country")
        || (lower.contains("geo") && lower.contains("block"))
    {
        return "video is not available in your region".to_string();
    }
    if lower.contains("video unavailable") {
        return "video unavailable or removed".to_string();
    }
    if lower.contains("unsupported url") {
        return "unsupported URL".to_string();
    }
    if lower.contains("timed out") || lower.contains("name or service not known") {
        return "network error, check your connection".to_string();
    }

    let last_error = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| l.to_lowercase().starts_with("error"));

    match last_error {
        Some(line) => line
            .strip_prefix("ERROR: ")
            .or_else(|| line.strip_prefix("ERROR:"))
            .unwrap_or(line)
            .trim()
            .to_string(),
        None if stderr.trim().is_empty() => "downloader exited without output".to_string(),
        None => stderr.trim().lines().last().unwrap_or_default().to_string(),
    }
}
