//! Flattened queue row model.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::download_client::DownloadProtocol;
use crate::media::Quality;

/// One UI-facing row: a single media unit inside a tracked download.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRow {
    /// Synthetic id, stable for the same (download id, unit) across
    /// refreshes and process restarts.
    pub id: i32,
    /// Owning library entity id.
    pub media_id: i64,
    /// Per-unit id for multi-unit downloads (episode id).
    pub unit_id: Option<i64>,
    /// Release name as reported by the download client.
    pub title: String,
    /// Display title of the media unit.
    pub media_title: String,
    pub quality: Quality,
    pub size: i64,
    pub sizeleft: i64,
    pub timeleft_secs: Option<u64>,
    /// Unix timestamp of the projected completion, when an estimate exists.
    pub estimated_completion_at: Option<i64>,
    /// String form of the client-reported item status.
    pub status: String,
    pub tracked_download_status: String,
    pub tracked_download_state: String,
    pub status_messages: Vec<String>,
    pub download_id: String,
    pub protocol: DownloadProtocol,
    pub download_client_id: i32,
}

/// Deterministic row id from the download id and optional unit id.
///
/// First four big-endian digest bytes, so the same logical row keeps its id
/// across refreshes and restarts.
pub fn queue_row_id(download_id: &str, unit_id: Option<i64>) -> i32 {
    let key = match unit_id {
        Some(unit_id) => format!("trackedDownload-{}-{}", download_id, unit_id),
        None => format!("trackedDownload-{}", download_id),
    };
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let digest = hasher.finalize();
    i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_id_is_deterministic() {
        assert_eq!(queue_row_id("35238", None), queue_row_id("35238", None));
        assert_eq!(
            queue_row_id("35238", Some(71)),
            queue_row_id("35238", Some(71))
        );
    }

    #[test]
    fn test_row_id_varies_by_key() {
        assert_ne!(queue_row_id("35238", None), queue_row_id("35239", None));
        assert_ne!(queue_row_id("35238", None), queue_row_id("35238", Some(71)));
        assert_ne!(
            queue_row_id("35238", Some(71)),
            queue_row_id("35238", Some(72))
        );
    }
}
