use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, SystemClipboard, YtDlpAdapter};
use crate::app::download_interactor::DownloadInteractor;
use crate::config::Config;
use crate::ports::{ClipboardPort, DownloadPort, EncodePort};

pub trait AppContainer: Send + Sync {
    fn download_interactor(&self) -> Arc<DownloadInteractor>;
}

pub struct DefaultAppContainer {
    download_interactor: Arc<DownloadInteractor>,
}

impl DefaultAppContainer {
    /// Wire the system adapters configured in `config`
    pub fn new(config: &Config) -> Self {
        let download_port = Arc::new(YtDlpAdapter::new(config.downloader_path.clone()));
        let clipboard_port = Arc::new(SystemClipboard::new());
        let encode_port = Arc::new(
            FFmpegAdapter::new(config.ffmpeg_path.clone()).with_copy_segments(config.copy_segments),
        );

        Self::with_ports(download_port, clipboard_port, encode_port)
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        download_port: Arc<dyn DownloadPort>,
        clipboard_port: Arc<dyn ClipboardPort>,
        encode_port: Arc<dyn EncodePort>,
    ) -> Self {
        let download_interactor = Arc::new(DownloadInteractor::new(
            download_port,
            clipboard_port,
            encode_port,
        ));

        Self {
            download_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn download_interactor(&self) -> Arc<DownloadInteractor> {
        Arc::clone(&self.download_interactor)
    }
}
