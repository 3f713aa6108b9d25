//! FFmpeg execution adapter
//!
//! This module drives the `ffmpeg` binary for segment extraction, concatenation,
//! muxing and audio extraction.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::time::format_timestamp;

/// Number of stderr lines kept in error messages
const STDERR_TAIL_LINES: usize = 5;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: PathBuf,
    copy_segments: bool,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            copy_segments: false,
        }
    }

    /// Cut segments with stream copy instead of re-encoding
    ///
    /// Faster, but cuts snap to the nearest keyframe.
    pub fn with_copy_segments(mut self, copy: bool) -> Self {
        self.copy_segments = copy;
        self
    }

    /// Arguments for cutting one range
    pub fn segment_args(&self, input: &Path, range: &ClipRange, output: &Path) -> Vec<OsString> {
        let mut args = base_args();
        args.push("-ss".into());
        args.push(format_timestamp(range.start).into());
        args.push("-i".into());
        args.push(input.as_os_str().to_owned());
        args.push("-t".into());
        args.push(range.duration().to_string().into());
        if self.copy_segments {
            args.extend(["-c", "copy", "-avoid_negative_ts", "make_zero"].map(OsString::from));
        }
        args.push(output.as_os_str().to_owned());
        args
    }

    /// Arguments for joining segments listed in `list_file`
    pub fn concat_args(&self, list_file: &Path, output: &Path) -> Vec<OsString> {
        let mut args = base_args();
        args.extend(["-f", "concat", "-safe", "0", "-i"].map(OsString::from));
        args.push(list_file.as_os_str().to_owned());
        args.extend(["-c", "copy"].map(OsString::from));
        args.push(output.as_os_str().to_owned());
        args
    }

    /// Arguments for muxing separate video and audio files
    pub fn mux_args(&self, video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        let mut args = base_args();
        args.push("-i".into());
        args.push(video.as_os_str().to_owned());
        args.push("-i".into());
        args.push(audio.as_os_str().to_owned());
        args.extend(
            ["-map", "0:v:0", "-map", "1:a:0", "-c", "copy", "-shortest"].map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());
        args
    }

    /// Arguments for dropping video and transcoding audio
    pub fn audio_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args = base_args();
        args.push("-i".into());
        args.push(input.as_os_str().to_owned());
        args.push("-vn".into());

        let ext = output
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        args.extend(audio_codec_args(&ext).iter().map(OsString::from));

        args.push(output.as_os_str().to_owned());
        args
    }

    /// Run ffmpeg and map failures to [`DomainError::EncodingFailed`]
    fn run(&self, stage: &str, args: &[OsString]) -> DomainResult<()> {
        debug!(
            "Executing: {} {}",
            self.program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| DomainError::EncodingFailed {
                stage: stage.to_string(),
                message: format!("failed to start {}: {}", self.program.display(), e),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(DomainError::EncodingFailed {
            stage: stage.to_string(),
            message: format!("{}: {}", output.status, stderr_tail(&stderr)),
        })
    }
}

impl EncodePort for FFmpegAdapter {
    fn extract_segment(&self, input: &Path, range: &ClipRange, output: &Path) -> DomainResult<()> {
        self.run("extract", &self.segment_args(input, range, output))
    }

    fn concat(&self, segments: &[PathBuf], output: &Path) -> DomainResult<()> {
        let list_file = output.with_extension("txt");
        std::fs::write(&list_file, concat_list(segments, &list_file))
            .map_err(|e| DomainError::fs(&list_file, e))?;

        let result = self.run("concat", &self.concat_args(&list_file, output));

        if let Err(e) = std::fs::remove_file(&list_file) {
            warn!("Could not remove concat list {}: {}", list_file.display(), e);
        }
        result
    }

    fn mux(&self, video: &Path, audio: &Path, output: &Path) -> DomainResult<()> {
        self.run("mux", &self.mux_args(video, audio, output))
    }

    fn extract_audio(&self, input: &Path, output: &Path) -> DomainResult<()> {
        self.run("audio", &self.audio_args(input, output))
    }
}

/// Flags shared by every invocation
fn base_args() -> Vec<OsString> {
    ["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]
        .map(OsString::from)
        .to_vec()
}

/// Codec options for an audio container
fn audio_codec_args(ext: &str) -> &'static [&'static str] {
    match ext {
        "mp3" => &["-c:a", "libmp3lame", "-q:a", "2"],
        "m4a" | "aac" => &["-c:a", "aac", "-b:a", "192k"],
        "opus" | "ogg" => &["-c:a", "libopus", "-b:a", "160k"],
        "flac" => &["-c:a", "flac"],
        "wav" => &["-c:a", "pcm_s16le"],
        _ => &[],
    }
}

/// Input file for ffmpeg's concat demuxer
///
/// Relative entries are resolved against the list's own directory, so
/// segments next to the list are written as bare file names.
fn concat_list(segments: &[PathBuf], list_file: &Path) -> String {
    segments
        .iter()
        .map(|path| {
            let entry = match (path.parent(), path.file_name()) {
                (Some(dir), Some(name)) if Some(dir) == list_file.parent() => PathBuf::from(name),
                _ => path.clone(),
            };
            // Quotes close, escape, reopen
            let escaped = entry.to_string_lossy().replace('\'', "'\\''");
            format!("file '{}'\n", escaped)
        })
        .collect()
}

/// Last few non-empty stderr lines
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "no diagnostic output".to_string();
    }
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}
