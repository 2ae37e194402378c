//! Download client item models.

use serde::{Deserialize, Serialize};

/// Transfer protocol of a download client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DownloadProtocol {
    Torrent,
    Usenet,
}

impl DownloadProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadProtocol::Torrent => "TORRENT",
            DownloadProtocol::Usenet => "USENET",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TORRENT" => Some(DownloadProtocol::Torrent),
            "USENET" => Some(DownloadProtocol::Usenet),
            _ => None,
        }
    }
}

/// Status reported by the download client for one of its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DownloadItemStatus {
    Queued,
    Paused,
    Downloading,
    Completed,
    Failed,
    Warning,
}

impl DownloadItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadItemStatus::Queued => "QUEUED",
            DownloadItemStatus::Paused => "PAUSED",
            DownloadItemStatus::Downloading => "DOWNLOADING",
            DownloadItemStatus::Completed => "COMPLETED",
            DownloadItemStatus::Failed => "FAILED",
            DownloadItemStatus::Warning => "WARNING",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "QUEUED" => Some(DownloadItemStatus::Queued),
            "PAUSED" => Some(DownloadItemStatus::Paused),
            "DOWNLOADING" => Some(DownloadItemStatus::Downloading),
            "COMPLETED" => Some(DownloadItemStatus::Completed),
            "FAILED" => Some(DownloadItemStatus::Failed),
            "WARNING" => Some(DownloadItemStatus::Warning),
            _ => None,
        }
    }
}

/// One item currently known to a download client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadClientItem {
    /// Client-assigned id, stable for the lifetime of the item (torrent
    /// info-hash for torrent clients).
    pub download_id: String,
    /// Free-text release name as the client reports it.
    pub title: String,
    /// Total size in bytes.
    pub total_size: i64,
    /// Bytes left to download.
    pub remaining_size: i64,
    /// Estimated seconds until completion, when the client can estimate it.
    pub remaining_time_secs: Option<u64>,
    pub status: DownloadItemStatus,
    /// Client-reported diagnostic for warning/failed items.
    pub message: Option<String>,
    /// Directory the client writes the item's files into.
    pub output_path: Option<String>,
    /// The client allows removing this item.
    pub can_be_removed: bool,
    /// The item's files are complete and can be moved out.
    pub can_move_files: bool,
}

impl DownloadClientItem {
    pub fn new(download_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            download_id: download_id.into(),
            title: title.into(),
            total_size: 0,
            remaining_size: 0,
            remaining_time_secs: None,
            status: DownloadItemStatus::Downloading,
            message: None,
            output_path: None,
            can_be_removed: false,
            can_move_files: false,
        }
    }

    pub fn with_status(mut self, status: DownloadItemStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_sizes(mut self, total_size: i64, remaining_size: i64) -> Self {
        self.total_size = total_size;
        self.remaining_size = remaining_size;
        self
    }

    pub fn with_remaining_time_secs(mut self, secs: Option<u64>) -> Self {
        self.remaining_time_secs = secs;
        self
    }
}
