//! Final artifact placement

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::MediaFile;
use crate::output::OverwritePolicy;
use crate::utils::path::{ensure_dir, move_file, output_path};

/// Moves the finished file to its user-facing name
pub struct OutputWriter {
    output_dir: PathBuf,
    overwrite: OverwritePolicy,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(output_dir: impl Into<PathBuf>, overwrite: OverwritePolicy) -> Self {
        Self {
            output_dir: output_dir.into(),
            overwrite,
        }
    }

    /// Path the artifact will end up at
    pub fn target_for(&self, media: &MediaFile, base_name: &str) -> PathBuf {
        let ext = media.extension().unwrap_or_default();
        output_path(&self.output_dir, base_name, &ext)
    }

    /// Fail early when the target exists and may not be replaced
    pub fn check_target(&self, target: &Path) -> DomainResult<()> {
        if target.exists() && self.overwrite == OverwritePolicy::Never {
            return Err(DomainError::FilesystemError {
                path: target.to_path_buf(),
                message: "output already exists (pass --overwrite to replace it)".to_string(),
            });
        }
        Ok(())
    }

    /// Move `media` into the output directory as `<base_name>.<ext>`
    pub fn finalize(&self, media: &MediaFile, base_name: &str) -> DomainResult<PathBuf> {
        ensure_dir(&self.output_dir)?;

        let target = self.target_for(media, base_name);
        self.check_target(&target)?;

        info!("Saving {} -> {}", media.path.display(), target.display());
        move_file(&media.path, &target)?;
        Ok(target)
    }
}
