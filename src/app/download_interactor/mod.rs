// Download interactor - Orchestrates acquire, trim, convert and save

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::app::acquire_interactor::{Acquisition, AcquireInteractor};
use crate::config::Config;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::output::{OutputWriter, OverwritePolicy, SourceNote};
use crate::planner::TrimPlanner;
use crate::ports::*;
use crate::utils::path::ensure_dir;

/// Prefix of the per-run working directory inside the output directory
pub const WORK_DIR_PREFIX: &str = ".dylt-";

/// Stem of the converted audio file
const AUDIO_STEM: &str = "audio";

/// Extension of the source note
const NOTE_EXTENSION: &str = "md";

/// Outcome of one download
#[derive(Debug, Clone)]
pub struct DownloadResponse {
    /// Final location of the media file
    pub output: PathBuf,
    pub note: Option<PathBuf>,
    pub title: String,
    pub url: String,
    pub trimmed: bool,
}

/// Interactor for the whole download use case
pub struct DownloadInteractor {
    acquire: AcquireInteractor,
    encoder: Arc<dyn EncodePort>,
}

impl DownloadInteractor {
    /// Create new download interactor with injected ports
    pub fn new(
        downloader: Arc<dyn DownloadPort>,
        clipboard: Arc<dyn ClipboardPort>,
        encoder: Arc<dyn EncodePort>,
    ) -> Self {
        Self {
            acquire: AcquireInteractor::new(downloader, clipboard, Arc::clone(&encoder)),
            encoder,
        }
    }

    /// Run the pipeline for one request
    ///
    /// Intermediates live in a temporary directory inside the output
    /// directory, removed on every exit path.
    pub fn execute(&self, request: &DownloadRequest, config: &Config) -> DomainResult<DownloadResponse> {
        if !request.clip.is_empty() && request.clip.total_duration() == 0 {
            return Err(DomainError::malformed(
                request.clip.to_string(),
                "every range is empty",
            ));
        }

        let url = self.acquire.resolve_source(request.url.as_deref())?;

        ensure_dir(&config.output_dir)?;
        let work_dir = tempfile::Builder::new()
            .prefix(WORK_DIR_PREFIX)
            .tempdir_in(&config.output_dir)
            .map_err(|e| DomainError::fs(&config.output_dir, e))?;
        debug!("Working directory: {}", work_dir.path().display());

        let max_height = request.resolution.or(config.resolution);
        let acquisition = self
            .acquire
            .acquire(&url, request.audio_only, max_height, work_dir.path())?;

        let plan = TrimPlanner::plan(&acquisition.media, &request.clip, work_dir.path());
        let trimmed = !plan.is_passthrough();
        let media = TrimPlanner::apply(&plan, self.encoder.as_ref())?;

        let media = if request.audio_only {
            self.convert_audio(media, &config.audio_format, work_dir.path())?
        } else {
            media
        };

        let response = self.save(request, config, &acquisition, &media, trimmed)?;

        if let Err(e) = work_dir.close() {
            warn!("Could not remove working directory: {}", e);
        }

        Ok(response)
    }

    /// Transcode to the configured audio format unless the file already uses it
    fn convert_audio(&self, media: MediaFile, audio_format: &str, work_dir: &Path) -> DomainResult<MediaFile> {
        if media.has_extension(audio_format) {
            debug!("{} is already {}", media.path.display(), audio_format);
            return Ok(MediaFile::new(media.path, MediaKind::Audio));
        }

        let output = work_dir.join(format!("{}.{}", AUDIO_STEM, audio_format));
        info!("Converting audio to {}", audio_format);
        self.encoder.extract_audio(&media.path, &output)?;
        Ok(MediaFile::new(output, MediaKind::Audio))
    }

    /// Move the artifact to its final name and write the optional note
    ///
    /// Both targets are checked and the note rendered before anything is
    /// moved.
    fn save(
        &self,
        request: &DownloadRequest,
        config: &Config,
        acquisition: &Acquisition,
        media: &MediaFile,
        trimmed: bool,
    ) -> DomainResult<DownloadResponse> {
        let stamp = FileNamer::stamp(config.timestamp_format.as_deref(), Local::now());
        let base_name = FileNamer::base_name(
            request.name.as_deref(),
            &acquisition.info.title,
            &request.tags,
            &config.tag_separator,
            stamp.as_deref(),
        );
        let ext = media.extension().unwrap_or_default();
        let base_name = FileNamer::fit_extensions(&base_name, &[ext.as_str(), NOTE_EXTENSION]);

        let writer = OutputWriter::new(&config.output_dir, OverwritePolicy::from_flag(request.overwrite));
        let target = writer.target_for(media, &base_name);
        writer.check_target(&target)?;

        let note = if request.note.is_some() || config.write_note {
            let note = SourceNote {
                info: &acquisition.info,
                url: &acquisition.url,
                clip: &request.clip,
                tags: &request.tags,
                comment: request.note.as_deref(),
            };
            let prepared = note.prepare(&target)?;
            writer.check_target(&prepared.path)?;
            Some(prepared)
        } else {
            None
        };

        let output = writer.finalize(media, &base_name)?;
        let note = note.map(|prepared| prepared.save()).transpose()?;

        Ok(DownloadResponse {
            output,
            note,
            title: acquisition.info.title.clone(),
            url: acquisition.url.clone(),
            trimmed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{FakeClipboard, FakeDownloader, RecordingEncoder};
    use tempfile::TempDir;

    fn create_test_info() -> VideoInfo {
        VideoInfo {
            id: "abc".to_string(),
            title: "Rust: The Talk?".to_string(),
            uploader: Some("Conf".to_string()),
            upload_date: Some("20240102".to_string()),
            duration: Some(600.0),
            streams: vec![
                StreamHandle::new("22", StreamKind::Combined, "mp4").with_height(720),
                StreamHandle::new("251", StreamKind::AudioOnly, "webm").with_bitrate(160.0),
            ],
        }
    }

    struct Fixture {
        out: TempDir,
        downloader: Arc<FakeDownloader>,
        encoder: Arc<RecordingEncoder>,
        interactor: DownloadInteractor,
    }

    fn fixture(clipboard: FakeClipboard) -> Fixture {
        let downloader = Arc::new(FakeDownloader::new(create_test_info()));
        let encoder = Arc::new(RecordingEncoder::new());
        let interactor = DownloadInteractor::new(
            Arc::clone(&downloader) as Arc<dyn DownloadPort>,
            Arc::new(clipboard),
            Arc::clone(&encoder) as Arc<dyn EncodePort>,
        );
        Fixture {
            out: TempDir::new().unwrap(),
            downloader,
            encoder,
            interactor,
        }
    }

    fn config_for(out: &TempDir) -> Config {
        Config {
            output_dir: out.path().to_path_buf(),
            log_file: None,
            ..Config::default()
        }
    }

    fn request(url: &str) -> DownloadRequest {
        DownloadRequest {
            url: Some(url.to_string()),
            ..DownloadRequest::new()
        }
    }

    /// Entries left in the output directory, sorted
    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_full_video_without_clip_is_untouched() {
        let f = fixture(FakeClipboard::empty());
        let config = config_for(&f.out);

        let response = f
            .interactor
            .execute(&request("https://example.com/v"), &config)
            .unwrap();

        assert_eq!(response.output, f.out.path().join("Rust_ The Talk_.mp4"));
        assert!(!response.trimmed);
        assert!(response.note.is_none());
        assert!(f.encoder.calls().is_empty());
        assert_eq!(std::fs::read(&response.output).unwrap(), b"22");
        assert_eq!(listing(f.out.path()), vec!["Rust_ The Talk_.mp4"]);
    }

    #[test]
    fn test_clipped_video_is_trimmed_and_joined() {
        let f = fixture(FakeClipboard::empty());
        let config = config_for(&f.out);
        let req = DownloadRequest {
            clip: ClipSpec::parse("0:08-0:20,1:00-1:30").unwrap(),
            name: Some("highlights".to_string()),
            tags: vec!["rust".to_string(), "talk".to_string()],
            ..request("https://example.com/v")
        };

        let response = f.interactor.execute(&req, &config).unwrap();

        assert!(response.trimmed);
        assert_eq!(response.output, f.out.path().join("highlights_rust_talk.mp4"));
        assert_eq!(
            f.encoder.calls(),
            vec!["extract 0:08-0:20", "extract 1:00-1:30", "concat 2"]
        );
        assert_eq!(listing(f.out.path()), vec!["highlights_rust_talk.mp4"]);
    }

    #[test]
    fn test_audio_only_without_clip_never_extracts_segments() {
        let f = fixture(FakeClipboard::empty());
        let config = config_for(&f.out);
        let req = DownloadRequest {
            audio_only: true,
            ..request("https://example.com/v")
        };

        let response = f.interactor.execute(&req, &config).unwrap();

        assert_eq!(f.encoder.calls(), vec!["audio"]);
        assert_eq!(response.output.extension().unwrap(), "mp3");
        assert_eq!(f.downloader.requests()[1], "download 251");
    }

    #[test]
    fn test_audio_only_with_clip_trims_then_converts() {
        let f = fixture(FakeClipboard::empty());
        let config = config_for(&f.out);
        let req = DownloadRequest {
            audio_only: true,
            clip: ClipSpec::parse("0:10-0:40").unwrap(),
            ..request("https://example.com/v")
        };

        f.interactor.execute(&req, &config).unwrap();

        assert_eq!(f.encoder.calls(), vec!["extract 0:10-0:40", "audio"]);
    }

    #[test]
    fn test_audio_already_in_target_format_is_not_converted() {
        let f = fixture(FakeClipboard::empty());
        let config = Config {
            audio_format: "webm".to_string(),
            ..config_for(&f.out)
        };
        let req = DownloadRequest {
            audio_only: true,
            ..request("https://example.com/v")
        };

        let response = f.interactor.execute(&req, &config).unwrap();

        assert!(f.encoder.calls().is_empty());
        assert_eq!(response.output.extension().unwrap(), "webm");
    }

    #[test]
    fn test_missing_source_fails_before_download() {
        let f = fixture(FakeClipboard::empty());
        let config = config_for(&f.out);

        let err = f
            .interactor
            .execute(&DownloadRequest::new(), &config)
            .unwrap_err();

        assert!(matches!(err, DomainError::NoSourceProvided));
        assert!(f.downloader.requests().is_empty());
        assert!(listing(f.out.path()).is_empty());
    }

    #[test]
    fn test_note_written_next_to_output() {
        let f = fixture(FakeClipboard::with_text("https://example.com/v"));
        let config = config_for(&f.out);
        let req = DownloadRequest {
            note: Some("great intro".to_string()),
            ..DownloadRequest::new()
        };

        let response = f.interactor.execute(&req, &config).unwrap();

        let note = response.note.unwrap();
        assert_eq!(note, f.out.path().join("Rust_ The Talk_.md"));
        let text = std::fs::read_to_string(note).unwrap();
        assert!(text.contains("[Source](https://example.com/v)"));
        assert!(text.contains("great intro"));
    }

    #[test]
    fn test_existing_note_is_kept_without_overwrite() {
        let f = fixture(FakeClipboard::empty());
        let config = config_for(&f.out);
        let own_notes = f.out.path().join("Talk.md");
        std::fs::write(&own_notes, "my own notes").unwrap();
        let req = DownloadRequest {
            name: Some("Talk".to_string()),
            note: Some("c".to_string()),
            ..request("https://example.com/v")
        };

        let err = f.interactor.execute(&req, &config).unwrap_err();

        assert!(matches!(err, DomainError::FilesystemError { ref path, .. } if path == &own_notes));
        assert_eq!(std::fs::read_to_string(&own_notes).unwrap(), "my own notes");
        assert_eq!(listing(f.out.path()), vec!["Talk.md"]);
    }

    #[test]
    fn test_existing_note_replaced_with_overwrite() {
        let f = fixture(FakeClipboard::empty());
        let config = config_for(&f.out);
        let own_notes = f.out.path().join("Talk.md");
        std::fs::write(&own_notes, "my own notes").unwrap();
        let req = DownloadRequest {
            name: Some("Talk".to_string()),
            note: Some("c".to_string()),
            overwrite: true,
            ..request("https://example.com/v")
        };

        let response = f.interactor.execute(&req, &config).unwrap();

        assert_eq!(response.note.as_deref(), Some(own_notes.as_path()));
        assert!(std::fs::read_to_string(&own_notes).unwrap().contains("[Source]"));
    }

    #[test]
    fn test_long_multibyte_title_fits_file_name_limit() {
        let downloader = Arc::new(FakeDownloader::new(VideoInfo {
            title: "動".repeat(100),
            ..create_test_info()
        }));
        let interactor = DownloadInteractor::new(
            downloader,
            Arc::new(FakeClipboard::empty()),
            Arc::new(RecordingEncoder::new()),
        );
        let out = TempDir::new().unwrap();
        let config = Config {
            write_note: true,
            ..config_for(&out)
        };

        let response = interactor
            .execute(&request("https://example.com/v"), &config)
            .unwrap();

        let media_name = response.output.file_name().unwrap().to_string_lossy().into_owned();
        let note_path = response.note.unwrap();
        let note_name = note_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(media_name.len() <= 255);
        assert!(media_name.ends_with(".mp4"));
        assert!(note_name.len() <= 255);
        assert!(response.output.exists());
        assert!(note_path.exists());
    }

    #[test]
    fn test_only_empty_ranges_fail_before_download() {
        let f = fixture(FakeClipboard::empty());
        let config = config_for(&f.out);
        let req = DownloadRequest {
            clip: ClipSpec::parse("0:05-0:05").unwrap(),
            ..request("https://example.com/v")
        };

        let err = f.interactor.execute(&req, &config).unwrap_err();

        assert!(matches!(err, DomainError::MalformedClipSpec { .. }));
        assert!(f.downloader.requests().is_empty());
    }

    #[test]
    fn test_encoder_failure_cleans_up_work_dir() {
        let downloader = Arc::new(FakeDownloader::new(create_test_info()));
        let interactor = DownloadInteractor::new(
            downloader,
            Arc::new(FakeClipboard::empty()),
            Arc::new(RecordingEncoder::failing_on("extract 0:10-0:20")),
        );
        let out = TempDir::new().unwrap();
        let config = config_for(&out);
        let req = DownloadRequest {
            clip: ClipSpec::parse("0:10-0:20").unwrap(),
            ..request("https://example.com/v")
        };

        let err = interactor.execute(&req, &config).unwrap_err();

        assert!(matches!(err, DomainError::EncodingFailed { .. }));
        assert!(listing(out.path()).is_empty());
    }

    #[test]
    fn test_existing_output_requires_overwrite() {
        let f = fixture(FakeClipboard::empty());
        let config = config_for(&f.out);
        std::fs::write(f.out.path().join("Rust_ The Talk_.mp4"), b"old").unwrap();

        let err = f
            .interactor
            .execute(&request("https://example.com/v"), &config)
            .unwrap_err();
        assert!(matches!(err, DomainError::FilesystemError { .. }));

        let req = DownloadRequest {
            overwrite: true,
            ..request("https://example.com/v")
        };
        let response = f.interactor.execute(&req, &config).unwrap();
        assert_eq!(std::fs::read(response.output).unwrap(), b"22");
    }
}
