// Application layer - Use case interactors

pub mod acquire_interactor;
pub mod container;
pub mod download_interactor;

// Re-export interactors
pub use acquire_interactor::{Acquisition, AcquireInteractor};
pub use container::{AppContainer, DefaultAppContainer};
pub use download_interactor::{DownloadInteractor, DownloadResponse};
