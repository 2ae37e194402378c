//! Trackarr Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod download_client;
pub mod events;
pub mod history;
pub mod library;
pub mod media;
pub mod parser;
pub mod queue;
pub mod refresh;
pub mod tracked;

// Re-export commonly used types for convenience
pub use events::{EngineEvent, EventBus};
pub use queue::{QueueRow, QueueService};
pub use tracked::{DownloadTracker, TrackedDownload, TrackedDownloadCache};
