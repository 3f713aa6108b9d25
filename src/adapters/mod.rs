// Adapters - External system implementations

pub mod clipboard;
pub mod exec_ffmpeg;
pub mod mock;
pub mod toml_config;
pub mod tracing_log;
pub mod ytdlp;

// Re-export adapters
pub use clipboard::SystemClipboard;
pub use exec_ffmpeg::FFmpegAdapter;
pub use toml_config::TomlConfigAdapter;
pub use tracing_log::{LogSettings, TracingLogAdapter};
pub use ytdlp::YtDlpAdapter;
