//! Tracked download lifecycle engine: cache, correlator and classifiers.

mod cache;
mod correlator;
mod imported;
mod models;

pub use cache::TrackedDownloadCache;
pub use correlator::{CorrelationError, DownloadTracker};
pub use imported::is_imported;
pub use models::{TrackedDownload, TrackedDownloadState, TrackedDownloadStatus};
