// Domain errors - Error types for the domain layer

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types
///
/// Every variant is terminal for the current invocation; nothing is retried.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Neither an explicit URL nor a URL-like clipboard value was available
    #[error("No source provided: pass --url or copy a video link to the clipboard")]
    NoSourceProvided,

    /// Clip ranges could not be parsed
    #[error("Malformed clip spec '{token}': {reason}")]
    MalformedClipSpec { token: String, reason: String },

    /// The download capability reported a failure
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    /// The external encoder exited unsuccessfully or could not be started
    #[error("Encoding failed during {stage}: {message}")]
    EncodingFailed { stage: String, message: String },

    /// Output directory or file operation failed
    #[error("Filesystem error at {}: {message}", path.display())]
    FilesystemError { path: PathBuf, message: String },

    /// Configuration file could not be read or is invalid
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DomainError {
    /// Build a malformed clip spec error for a token
    pub fn malformed(token: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::MalformedClipSpec {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Build a filesystem error from an I/O failure
    pub fn fs(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        DomainError::FilesystemError {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Short name of the stage that failed, used in user-facing messages
    pub fn stage(&self) -> &'static str {
        match self {
            DomainError::NoSourceProvided => "source",
            DomainError::MalformedClipSpec { .. } => "clip spec",
            DomainError::DownloadFailed(_) => "download",
            DomainError::EncodingFailed { .. } => "encode",
            DomainError::FilesystemError { .. } => "filesystem",
            DomainError::Config(_) => "config",
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = std::result::Result<T, DomainError>;
