// Acquire interactor - Resolves the source and materializes one local media file

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Stem of the file separate video and audio streams are muxed into
pub const MERGED_STEM: &str = "merged";

/// Result of a successful acquisition
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub url: String,
    pub info: VideoInfo,
    pub media: MediaFile,
}

/// Interactor for getting a remote video onto local disk
pub struct AcquireInteractor {
    downloader: Arc<dyn DownloadPort>,
    clipboard: Arc<dyn ClipboardPort>,
    encoder: Arc<dyn EncodePort>,
}

impl AcquireInteractor {
    /// Create new acquire interactor with injected ports
    pub fn new(
        downloader: Arc<dyn DownloadPort>,
        clipboard: Arc<dyn ClipboardPort>,
        encoder: Arc<dyn EncodePort>,
    ) -> Self {
        Self {
            downloader,
            clipboard,
            encoder,
        }
    }

    /// Work out which URL to download
    ///
    /// The clipboard is only read when no explicit URL was given.
    pub fn resolve_source(&self, explicit: Option<&str>) -> DomainResult<String> {
        let clipboard = match explicit {
            Some(_) => None,
            None => self.clipboard.read_text(),
        };

        let url = SourceValidator::resolve(explicit, clipboard.as_deref())?;
        if explicit.is_none() {
            info!("Using URL from clipboard: {}", url);
        }
        Ok(url)
    }

    /// Fetch metadata, pick streams and download them into `work_dir`
    pub fn acquire(
        &self,
        url: &str,
        audio_only: bool,
        max_height: Option<u32>,
        work_dir: &Path,
    ) -> DomainResult<Acquisition> {
        info!("Fetching metadata for {}", url);
        let info = self.downloader.fetch_info(url)?;
        debug!("'{}' offers {} stream(s)", info.title, info.streams.len());

        let selection = StreamSelector::select(&info, audio_only, max_height)?;
        let media = match selection {
            StreamSelection::Single(stream) => {
                info!("Downloading format {} ({})", stream.format_id, stream.container);
                let path = self.downloader.download(url, &stream, work_dir)?;
                MediaFile::new(path, stream.media_kind())
            }
            StreamSelection::Separate { video, audio } => {
                info!(
                    "Downloading formats {} + {} separately",
                    video.format_id, audio.format_id
                );
                let video_path = self.downloader.download(url, &video, work_dir)?;
                let audio_path = self.downloader.download(url, &audio, work_dir)?;

                let merged = work_dir.join(format!("{}.mkv", MERGED_STEM));
                self.encoder.mux(&video_path, &audio_path, &merged)?;

                for part in [&video_path, &audio_path] {
                    if let Err(e) = std::fs::remove_file(part) {
                        warn!("Could not remove {}: {}", part.display(), e);
                    }
                }
                MediaFile::new(merged, MediaKind::Video)
            }
        };

        Ok(Acquisition {
            url: url.to_string(),
            info,
            media,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{FakeClipboard, FakeDownloader, RecordingEncoder};
    use tempfile::TempDir;

    fn info_with(streams: Vec<StreamHandle>) -> VideoInfo {
        VideoInfo {
            id: "abc".to_string(),
            title: "Sample".to_string(),
            streams,
            ..VideoInfo::default()
        }
    }

    fn interactor(
        downloader: Arc<FakeDownloader>,
        clipboard: FakeClipboard,
        encoder: Arc<RecordingEncoder>,
    ) -> AcquireInteractor {
        AcquireInteractor::new(downloader, Arc::new(clipboard), encoder)
    }

    #[test]
    fn test_no_source_never_reaches_downloader() {
        let downloader = Arc::new(FakeDownloader::new(VideoInfo::default()));
        let acquire = interactor(
            Arc::clone(&downloader),
            FakeClipboard::with_text("shopping list"),
            Arc::new(RecordingEncoder::new()),
        );

        let err = acquire.resolve_source(None).unwrap_err();

        assert!(matches!(err, DomainError::NoSourceProvided));
        assert!(downloader.requests().is_empty());
    }

    #[test]
    fn test_clipboard_url_is_used_without_explicit_url() {
        let acquire = interactor(
            Arc::new(FakeDownloader::new(VideoInfo::default())),
            FakeClipboard::with_text(" https://example.com/watch?v=1 \n"),
            Arc::new(RecordingEncoder::new()),
        );

        let url = acquire.resolve_source(None).unwrap();
        assert_eq!(url, "https://example.com/watch?v=1");
    }

    #[test]
    fn test_single_stream_download() {
        let work = TempDir::new().unwrap();
        let downloader = Arc::new(FakeDownloader::new(info_with(vec![
            StreamHandle::new("22", StreamKind::Combined, "mp4").with_height(720),
        ])));
        let encoder = Arc::new(RecordingEncoder::new());
        let acquire = interactor(
            Arc::clone(&downloader),
            FakeClipboard::empty(),
            Arc::clone(&encoder),
        );

        let result = acquire
            .acquire("https://example.com/v", false, None, work.path())
            .unwrap();

        assert_eq!(result.media.path, work.path().join("22.mp4"));
        assert_eq!(result.media.kind, MediaKind::Video);
        assert_eq!(
            downloader.requests(),
            vec!["info https://example.com/v", "download 22"]
        );
        assert!(encoder.calls().is_empty());
    }

    #[test]
    fn test_separate_streams_are_muxed() {
        let work = TempDir::new().unwrap();
        let downloader = Arc::new(FakeDownloader::new(info_with(vec![
            StreamHandle::new("18", StreamKind::Combined, "mp4").with_height(360),
            StreamHandle::new("137", StreamKind::VideoOnly, "mp4").with_height(1080),
            StreamHandle::new("140", StreamKind::AudioOnly, "m4a").with_bitrate(129.0),
        ])));
        let encoder = Arc::new(RecordingEncoder::new());
        let acquire = interactor(
            Arc::clone(&downloader),
            FakeClipboard::empty(),
            Arc::clone(&encoder),
        );

        let result = acquire
            .acquire("https://example.com/v", false, None, work.path())
            .unwrap();

        assert_eq!(result.media.path, work.path().join("merged.mkv"));
        assert_eq!(encoder.calls(), vec!["mux"]);
        assert!(!work.path().join("137.mp4").exists());
        assert!(!work.path().join("140.m4a").exists());
    }

    #[test]
    fn test_audio_only_downloads_audio_stream() {
        let work = TempDir::new().unwrap();
        let downloader = Arc::new(FakeDownloader::new(info_with(vec![
            StreamHandle::new("22", StreamKind::Combined, "mp4").with_height(720),
            StreamHandle::new("251", StreamKind::AudioOnly, "webm").with_bitrate(160.0),
        ])));
        let acquire = interactor(
            Arc::clone(&downloader),
            FakeClipboard::empty(),
            Arc::new(RecordingEncoder::new()),
        );

        let result = acquire
            .acquire("https://example.com/v", true, None, work.path())
            .unwrap();

        assert_eq!(result.media.kind, MediaKind::Audio);
        assert_eq!(downloader.requests()[1], "download 251");
    }

    #[test]
    fn test_download_failure_propagates() {
        let work = TempDir::new().unwrap();
        let acquire = interactor(
            Arc::new(FakeDownloader::failing("video is private")),
            FakeClipboard::empty(),
            Arc::new(RecordingEncoder::new()),
        );

        let err = acquire
            .acquire("https://example.com/v", false, None, work.path())
            .unwrap_err();
        assert!(matches!(err, DomainError::DownloadFailed(reason) if reason == "video is private"));
    }
}
