//! Already-imported classification.

use crate::history::{HistoryEventType, HistoryRecord};

use super::TrackedDownload;

/// Whether the tracked download's files were already imported on a previous
/// pass, so the import pipeline can skip it instead of duplicating file
/// moves and notifications.
///
/// Records are sorted by date descending internally before taking the first
/// match for the download's media id, so callers may pass them in any order
/// and the verdict always reflects the most recent event.
pub fn is_imported(tracked: &TrackedDownload, history: &[HistoryRecord]) -> bool {
    if history.is_empty() {
        return false;
    }
    let Some(media) = &tracked.remote_item.media else {
        return false;
    };
    let media_id = media.media_id();

    let mut relevant: Vec<&HistoryRecord> =
        history.iter().filter(|r| r.media_id == media_id).collect();
    relevant.sort_by_key(|r| std::cmp::Reverse(r.date));

    match relevant.first() {
        Some(record) => record.event_type == HistoryEventType::DownloadFolderImported,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download_client::{DownloadClientItem, DownloadProtocol};
    use crate::media::{Movie, ParsedRelease, RemoteItem, RemoteMedia};
    use crate::tracked::{TrackedDownloadState, TrackedDownloadStatus};

    fn tracked(media_id: i64) -> TrackedDownload {
        TrackedDownload {
            download_client_id: 1,
            protocol: DownloadProtocol::Torrent,
            download_item: DownloadClientItem::new("abc", "A Movie 1998"),
            remote_item: RemoteItem {
                media: Some(RemoteMedia::Movie(Movie {
                    id: media_id,
                    title: "A Movie".to_string(),
                    year: Some(1998),
                })),
                parsed: ParsedRelease::default(),
                release: None,
            },
            state: TrackedDownloadState::Downloading,
            status: TrackedDownloadStatus::Ok,
            status_messages: Vec::new(),
        }
    }

    fn record(media_id: i64, event_type: HistoryEventType, date: i64) -> HistoryRecord {
        HistoryRecord::new("abc", media_id, event_type, "A Movie 1998").with_date(date)
    }

    #[test]
    fn test_empty_history_is_not_imported() {
        assert!(!is_imported(&tracked(3), &[]));
    }

    #[test]
    fn test_imported_record_for_media() {
        let history = vec![
            record(3, HistoryEventType::Grabbed, 100),
            record(3, HistoryEventType::DownloadFolderImported, 200),
        ];
        assert!(is_imported(&tracked(3), &history));
    }

    #[test]
    fn test_grabbed_only_is_not_imported() {
        let history = vec![record(3, HistoryEventType::Grabbed, 100)];
        assert!(!is_imported(&tracked(3), &history));
    }

    #[test]
    fn test_no_record_for_media_id() {
        let history = vec![record(99, HistoryEventType::DownloadFolderImported, 100)];
        assert!(!is_imported(&tracked(3), &history));
    }

    #[test]
    fn test_most_recent_event_wins_regardless_of_input_order() {
        // A re-grab after an import means the download is active again.
        let history = vec![
            record(3, HistoryEventType::DownloadFolderImported, 100),
            record(3, HistoryEventType::Grabbed, 200),
        ];
        assert!(!is_imported(&tracked(3), &history));

        let reversed: Vec<HistoryRecord> = history.into_iter().rev().collect();
        assert!(!is_imported(&tracked(3), &reversed));

        let history = vec![
            record(3, HistoryEventType::Grabbed, 100),
            record(3, HistoryEventType::DownloadFolderImported, 200),
        ];
        let reversed: Vec<HistoryRecord> = history.iter().cloned().rev().collect();
        assert!(is_imported(&tracked(3), &history));
        assert!(is_imported(&tracked(3), &reversed));
    }
}
