//! Correlates download-client items with grab history and the library.
//!
//! This is the write path of the engine: every item reported by a download
//! client passes through [`DownloadTracker::track_download`] once per poll
//! cycle, producing or refreshing the cached [`TrackedDownload`].

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::download_client::{DownloadClient, DownloadClientItem, DownloadProtocol};
use crate::history::HistoryStore;
use crate::library::RemoteItemMapper;
use crate::media::RemoteItem;
use crate::parser::ReleaseParser;

use super::cache::TrackedDownloadCache;
use super::models::{TrackedDownload, TrackedDownloadState, TrackedDownloadStatus};

/// Why an item could not be correlated this cycle.
///
/// These never escape [`DownloadTracker::track_download`]; they exist so the
/// internal flow is explicit about which step gave up.
#[derive(Debug, Error)]
pub enum CorrelationError {
    #[error("title could not be parsed: {0}")]
    UnparsableTitle(String),
    #[error("no library match for: {0}")]
    NoLibraryMatch(String),
    #[error("history lookup failed: {0}")]
    History(#[source] anyhow::Error),
    #[error("library mapping failed: {0}")]
    Mapping(#[source] anyhow::Error),
}

pub struct DownloadTracker {
    cache: Arc<TrackedDownloadCache>,
    parser: Arc<dyn ReleaseParser>,
    mapper: Arc<dyn RemoteItemMapper>,
    history: Arc<dyn HistoryStore>,
}

impl DownloadTracker {
    pub fn new(
        cache: Arc<TrackedDownloadCache>,
        parser: Arc<dyn ReleaseParser>,
        mapper: Arc<dyn RemoteItemMapper>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            cache,
            parser,
            mapper,
            history,
        }
    }

    /// Produce or refresh the tracked download for one client item.
    ///
    /// Returns None when the item cannot be correlated to a library entity
    /// this cycle (including on history or mapping failures); the caller
    /// skips the item and retries on the next poll. Nothing is cached for
    /// a None result.
    pub fn track_download(
        &self,
        client: &dyn DownloadClient,
        item: DownloadClientItem,
    ) -> Option<TrackedDownload> {
        let title = item.title.clone();
        match self.try_track(client.id(), client.protocol(), item) {
            Ok(tracked) => Some(tracked),
            Err(err) => {
                debug!("Failed to track download '{}': {}", title, err);
                None
            }
        }
    }

    fn try_track(
        &self,
        client_id: i32,
        protocol: DownloadProtocol,
        item: DownloadClientItem,
    ) -> Result<TrackedDownload, CorrelationError> {
        let existing = self.cache.find(&item.download_id);

        // Past the downloading stage, identity is settled; only the client
        // snapshot is refreshed so transient status flips cannot demote a
        // terminal state.
        let mut prior_messages = Vec::new();
        if let Some(mut existing) = existing {
            if existing.state != TrackedDownloadState::Downloading {
                existing.merge_item(item);
                self.cache.set(existing.clone());
                return Ok(existing);
            }
            prior_messages = existing.status_messages;
        }

        let live_parsed = self.parser.parse(&item.title, true);
        let mut remote = match &live_parsed {
            Some(parsed) => self.resolve(parsed, &item.title)?,
            None => None,
        };

        let records = self
            .history
            .find_by_download_id(&item.download_id)
            .map_err(CorrelationError::History)?;
        let latest = records.iter().max_by_key(|r| r.date);
        let state = TrackedDownloadState::from_history_event(latest.map(|r| r.event_type));

        // Client-reported names are often mangled; the title grabbed and
        // logged to history is usually cleaner, so fall back to it.
        if remote.is_none() {
            if let Some(latest) = latest {
                if let Some(parsed) = self.parser.parse(&latest.source_title, true) {
                    remote = self.resolve(&parsed, &latest.source_title)?;
                }
            }
        }

        let Some(remote_item) = remote else {
            return Err(match live_parsed {
                None => CorrelationError::UnparsableTitle(item.title),
                Some(_) => CorrelationError::NoLibraryMatch(item.title),
            });
        };

        let mut tracked = TrackedDownload {
            download_client_id: client_id,
            protocol,
            state,
            status: TrackedDownloadStatus::from_item_status(item.status),
            remote_item,
            status_messages: prior_messages,
            download_item: item,
        };
        if let Some(message) = tracked.download_item.message.clone() {
            tracked.add_status_message(message);
        }

        self.cache.set(tracked.clone());
        Ok(tracked)
    }

    /// Map a parsed title, treating "no library match" as None rather than
    /// a resolved item with no media.
    fn resolve(
        &self,
        parsed: &crate::media::ParsedRelease,
        release_title: &str,
    ) -> Result<Option<RemoteItem>, CorrelationError> {
        let item = self
            .mapper
            .map(parsed, release_title)
            .map_err(CorrelationError::Mapping)?;
        Ok(item.is_resolved().then_some(item))
    }
}
