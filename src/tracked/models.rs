//! Tracked download aggregate.

use serde::{Deserialize, Serialize};

use crate::download_client::{DownloadClientItem, DownloadItemStatus, DownloadProtocol};
use crate::history::HistoryEventType;
use crate::media::RemoteItem;

/// Coarse lifecycle stage of a tracked download.
///
/// Only `Downloading`, `Imported` and `Failed` are derived from history
/// here; the finer import states are assigned by the import pipeline
/// mutating the cached entry directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackedDownloadState {
    Downloading,
    ImportPending,
    Importing,
    ImportFailed,
    Imported,
    FailedPending,
    Failed,
}

impl TrackedDownloadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedDownloadState::Downloading => "DOWNLOADING",
            TrackedDownloadState::ImportPending => "IMPORT_PENDING",
            TrackedDownloadState::Importing => "IMPORTING",
            TrackedDownloadState::ImportFailed => "IMPORT_FAILED",
            TrackedDownloadState::Imported => "IMPORTED",
            TrackedDownloadState::FailedPending => "FAILED_PENDING",
            TrackedDownloadState::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DOWNLOADING" => Some(TrackedDownloadState::Downloading),
            "IMPORT_PENDING" => Some(TrackedDownloadState::ImportPending),
            "IMPORTING" => Some(TrackedDownloadState::Importing),
            "IMPORT_FAILED" => Some(TrackedDownloadState::ImportFailed),
            "IMPORTED" => Some(TrackedDownloadState::Imported),
            "FAILED_PENDING" => Some(TrackedDownloadState::FailedPending),
            "FAILED" => Some(TrackedDownloadState::Failed),
            _ => None,
        }
    }

    /// State derived from the most recent history event. Anything other
    /// than an import or failure means the download is still in flight.
    pub fn from_history_event(event: Option<HistoryEventType>) -> Self {
        match event {
            Some(HistoryEventType::DownloadFolderImported) => TrackedDownloadState::Imported,
            Some(HistoryEventType::DownloadFailed) => TrackedDownloadState::Failed,
            _ => TrackedDownloadState::Downloading,
        }
    }
}

/// Health overlay on top of the lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackedDownloadStatus {
    Ok,
    Warning,
    Error,
}

impl TrackedDownloadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedDownloadStatus::Ok => "OK",
            TrackedDownloadStatus::Warning => "WARNING",
            TrackedDownloadStatus::Error => "ERROR",
        }
    }

    pub fn from_item_status(status: DownloadItemStatus) -> Self {
        match status {
            DownloadItemStatus::Warning => TrackedDownloadStatus::Warning,
            DownloadItemStatus::Failed => TrackedDownloadStatus::Error,
            _ => TrackedDownloadStatus::Ok,
        }
    }
}

/// The core aggregate: one download-client item correlated with a resolved
/// library entity and a derived lifecycle state.
///
/// An aggregate is only ever constructed with a resolved `remote_item`;
/// downloads that cannot be correlated are not tracked at all.
#[derive(Debug, Clone)]
pub struct TrackedDownload {
    /// Id of the configured download client this item came from.
    pub download_client_id: i32,
    pub protocol: DownloadProtocol,
    /// Current client snapshot, replaced wholesale on each poll.
    pub download_item: DownloadClientItem,
    pub remote_item: RemoteItem,
    pub state: TrackedDownloadState,
    pub status: TrackedDownloadStatus,
    /// Diagnostic strings accumulated across refreshes, deduplicated.
    pub status_messages: Vec<String>,
}

impl TrackedDownload {
    /// Cache identity key.
    pub fn download_id(&self) -> &str {
        &self.download_item.download_id
    }

    /// Append a diagnostic message unless it is already present.
    pub fn add_status_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.status_messages.contains(&message) {
            self.status_messages.push(message);
        }
    }

    /// Replace the client snapshot, keeping state and accumulated messages.
    pub fn merge_item(&mut self, item: DownloadClientItem) {
        if let Some(message) = &item.message {
            self.add_status_message(message.clone());
        }
        self.status = TrackedDownloadStatus::from_item_status(item.status);
        self.download_item = item;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrip() {
        for state in [
            TrackedDownloadState::Downloading,
            TrackedDownloadState::ImportPending,
            TrackedDownloadState::Importing,
            TrackedDownloadState::ImportFailed,
            TrackedDownloadState::Imported,
            TrackedDownloadState::FailedPending,
            TrackedDownloadState::Failed,
        ] {
            assert_eq!(TrackedDownloadState::parse(state.as_str()), Some(state));
        }
        assert_eq!(TrackedDownloadState::parse("DONE"), None);
    }

    #[test]
    fn test_state_from_history_event() {
        assert_eq!(
            TrackedDownloadState::from_history_event(Some(
                HistoryEventType::DownloadFolderImported
            )),
            TrackedDownloadState::Imported
        );
        assert_eq!(
            TrackedDownloadState::from_history_event(Some(HistoryEventType::DownloadFailed)),
            TrackedDownloadState::Failed
        );
        assert_eq!(
            TrackedDownloadState::from_history_event(Some(HistoryEventType::Grabbed)),
            TrackedDownloadState::Downloading
        );
        assert_eq!(
            TrackedDownloadState::from_history_event(Some(HistoryEventType::DownloadIgnored)),
            TrackedDownloadState::Downloading
        );
        assert_eq!(
            TrackedDownloadState::from_history_event(None),
            TrackedDownloadState::Downloading
        );
    }

    #[test]
    fn test_status_from_item_status() {
        assert_eq!(
            TrackedDownloadStatus::from_item_status(DownloadItemStatus::Downloading),
            TrackedDownloadStatus::Ok
        );
        assert_eq!(
            TrackedDownloadStatus::from_item_status(DownloadItemStatus::Warning),
            TrackedDownloadStatus::Warning
        );
        assert_eq!(
            TrackedDownloadStatus::from_item_status(DownloadItemStatus::Failed),
            TrackedDownloadStatus::Error
        );
    }

    #[test]
    fn test_status_messages_deduplicated() {
        let mut tracked = TrackedDownload {
            download_client_id: 1,
            protocol: DownloadProtocol::Torrent,
            download_item: DownloadClientItem::new("abc", "A Movie 1998"),
            remote_item: RemoteItem {
                media: None,
                parsed: Default::default(),
                release: None,
            },
            state: TrackedDownloadState::Downloading,
            status: TrackedDownloadStatus::Ok,
            status_messages: Vec::new(),
        };

        tracked.add_status_message("No files found");
        tracked.add_status_message("No files found");
        tracked.add_status_message("Tracker timeout");
        assert_eq!(tracked.status_messages.len(), 2);
    }
}
