//! Path and file move helpers

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};

/// Create a directory and its parents if missing
pub fn ensure_dir(dir: &Path) -> DomainResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| DomainError::fs(dir, e))
}

/// Move a file, copying across filesystems when a rename is not possible
pub fn move_file(from: &Path, to: &Path) -> DomainResult<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            debug!(
                "Rename {} -> {} failed ({}), copying instead",
                from.display(),
                to.display(),
                rename_err
            );
            std::fs::copy(from, to).map_err(|e| DomainError::fs(to, e))?;
            std::fs::remove_file(from).map_err(|e| DomainError::fs(from, e))
        }
    }
}

/// `dir/<stem>.<ext>`
pub fn output_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    if ext.is_empty() {
        dir.join(stem)
    } else {
        dir.join(format!("{}.{}", stem, ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path() {
        let dir = Path::new("/out");
        assert_eq!(output_path(dir, "My Video", "mp4"), PathBuf::from("/out/My Video.mp4"));
        assert_eq!(output_path(dir, "v1.2", "mkv"), PathBuf::from("/out/v1.2.mkv"));
        assert_eq!(output_path(dir, "raw", ""), PathBuf::from("/out/raw"));
    }

    #[test]
    fn test_move_file() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("a.bin");
        let to = temp_dir.path().join("nested").join("b.bin");
        std::fs::write(&from, b"data").unwrap();

        ensure_dir(to.parent().unwrap()).unwrap();
        move_file(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"data");
    }

    #[test]
    fn test_move_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = move_file(&temp_dir.path().join("missing"), &temp_dir.path().join("x"))
            .unwrap_err();
        assert!(matches!(err, DomainError::FilesystemError { .. }));
    }
}
