//! Output placement
//!
//! Moves finished artifacts into the output directory and writes the
//! optional markdown note that goes with them.

pub mod note;
pub mod writer;

pub use note::{PreparedNote, SourceNote};
pub use writer::OutputWriter;

/// What to do when the final file name is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Fail with a filesystem error
    #[default]
    Never,
    /// Replace the existing file
    Always,
}

impl OverwritePolicy {
    pub fn from_flag(overwrite: bool) -> Self {
        if overwrite {
            Self::Always
        } else {
            Self::Never
        }
    }
}
