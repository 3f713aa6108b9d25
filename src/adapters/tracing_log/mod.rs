// Tracing log adapter - Structured logging using tracing crate

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::Config;

/// Logging options resolved from config and flags
#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    /// Mirror logs to stderr and lower the default level to debug
    pub debug: bool,
    pub file: Option<PathBuf>,
    pub json: bool,
}

impl LogSettings {
    pub fn from_config(config: &Config, debug: bool) -> Self {
        Self {
            debug,
            file: config.log_file.clone(),
            json: config.log_json,
        }
    }

    /// Directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> &'static str {
        if self.debug {
            "dylt=debug,info"
        } else {
            "dylt=info,warn"
        }
    }
}

/// Tracing log adapter
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    /// Install the global subscriber
    ///
    /// Returns the log file in use, if it could be opened. Calling this twice
    /// is harmless; the first subscriber stays installed.
    pub fn init(settings: &LogSettings) -> Option<PathBuf> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(settings.default_directive()));

        let (file_layer, file_path) = match Self::open_log_file(settings) {
            Some((file, path)) => (Some(Self::file_layer(file, settings.json)), Some(path)),
            None => (None, None),
        };

        let stderr_layer = settings.debug.then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
        });

        let _ = tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .with(filter)
            .try_init();

        file_path
    }

    /// Truncate and open the configured log file
    fn open_log_file(settings: &LogSettings) -> Option<(File, PathBuf)> {
        let path = settings.file.as_ref()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).ok()?;
        }
        File::create(path).ok().map(|file| (file, path.clone()))
    }

    fn file_layer(file: File, json: bool) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false);

        if json {
            layer.json().boxed()
        } else {
            layer.boxed()
        }
    }
}
