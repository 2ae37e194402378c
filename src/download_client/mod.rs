//! Download client integration: the trait the refresh loop polls, plus the
//! Transmission implementation.

mod models;
mod transmission;

use anyhow::Result;
use async_trait::async_trait;

pub use models::{DownloadClientItem, DownloadItemStatus, DownloadProtocol};
pub use transmission::TransmissionClient;

/// A configured download client the engine polls for in-progress items.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait DownloadClient: Send + Sync {
    /// Configured client id, referenced by tracked downloads and queue rows.
    fn id(&self) -> i32;

    /// Display name, used in logs.
    fn name(&self) -> &str;

    fn protocol(&self) -> DownloadProtocol;

    /// All items the client currently knows about.
    async fn list_items(&self) -> Result<Vec<DownloadClientItem>>;
}
