//! History record models.

use serde::{Deserialize, Serialize};

/// Lifecycle event type recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryEventType {
    /// A release was sent to a download client.
    Grabbed,
    /// A completed download folder was imported into the library.
    DownloadFolderImported,
    /// The download failed.
    DownloadFailed,
    /// The download was manually ignored.
    DownloadIgnored,
}

impl HistoryEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryEventType::Grabbed => "GRABBED",
            HistoryEventType::DownloadFolderImported => "DOWNLOAD_FOLDER_IMPORTED",
            HistoryEventType::DownloadFailed => "DOWNLOAD_FAILED",
            HistoryEventType::DownloadIgnored => "DOWNLOAD_IGNORED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GRABBED" => Some(HistoryEventType::Grabbed),
            "DOWNLOAD_FOLDER_IMPORTED" => Some(HistoryEventType::DownloadFolderImported),
            "DOWNLOAD_FAILED" => Some(HistoryEventType::DownloadFailed),
            "DOWNLOAD_IGNORED" => Some(HistoryEventType::DownloadIgnored),
            _ => None,
        }
    }
}

/// One persisted lifecycle event for a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Row id (0 until inserted).
    pub id: i64,
    /// External download-client id this event belongs to.
    pub download_id: String,
    /// Library entity the event concerns.
    pub media_id: i64,
    /// What happened.
    pub event_type: HistoryEventType,
    /// When it happened (Unix timestamp, seconds).
    pub date: i64,
    /// Release title at the time of the event. For grab events this is the
    /// indexer-published title, usually cleaner than what the download
    /// client later reports.
    pub source_title: String,
}

impl HistoryRecord {
    /// Create a new record dated now.
    pub fn new(
        download_id: impl Into<String>,
        media_id: i64,
        event_type: HistoryEventType,
        source_title: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            download_id: download_id.into(),
            media_id,
            event_type,
            date: chrono::Utc::now().timestamp(),
            source_title: source_title.into(),
        }
    }

    /// Override the event date (Unix timestamp, seconds).
    pub fn with_date(mut self, date: i64) -> Self {
        self.date = date;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_roundtrip() {
        for event in [
            HistoryEventType::Grabbed,
            HistoryEventType::DownloadFolderImported,
            HistoryEventType::DownloadFailed,
            HistoryEventType::DownloadIgnored,
        ] {
            assert_eq!(HistoryEventType::parse(event.as_str()), Some(event));
        }
        assert_eq!(HistoryEventType::parse("RENAMED"), None);
    }

    #[test]
    fn test_record_creation() {
        let record = HistoryRecord::new("abc123", 42, HistoryEventType::Grabbed, "A Movie 1998")
            .with_date(1_700_000_000);

        assert_eq!(record.id, 0);
        assert_eq!(record.download_id, "abc123");
        assert_eq!(record.media_id, 42);
        assert_eq!(record.event_type, HistoryEventType::Grabbed);
        assert_eq!(record.date, 1_700_000_000);
        assert_eq!(record.source_title, "A Movie 1998");
    }
}
