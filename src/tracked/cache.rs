use std::collections::HashSet;

use dashmap::DashMap;

use super::TrackedDownload;

/// Concurrent cache of live tracked downloads, keyed by download id.
///
/// Entries have no TTL; they live until the refresh sweep stops seeing the
/// id at every configured client. Same-key races between concurrent pollers
/// resolve last-writer-wins, which is acceptable because one client item id
/// is not legitimately polled from two sources.
#[derive(Default)]
pub struct TrackedDownloadCache {
    entries: DashMap<String, TrackedDownload>,
}

impl TrackedDownloadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, download_id: &str) -> Option<TrackedDownload> {
        self.entries.get(download_id).map(|e| e.clone())
    }

    pub fn set(&self, tracked: TrackedDownload) {
        self.entries
            .insert(tracked.download_id().to_string(), tracked);
    }

    pub fn remove(&self, download_id: &str) -> Option<TrackedDownload> {
        self.entries.remove(download_id).map(|(_, e)| e)
    }

    /// Snapshot of all current entries, in no particular order.
    pub fn all(&self) -> Vec<TrackedDownload> {
        self.entries.iter().map(|e| e.value().clone()).collect()
    }

    /// Drop every entry whose id is not in `live_ids`. Used by the refresh
    /// sweep once a full poll across all clients has succeeded.
    pub fn retain_ids(&self, live_ids: &HashSet<String>) {
        self.entries.retain(|id, _| live_ids.contains(id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download_client::{DownloadClientItem, DownloadProtocol};
    use crate::media::{Movie, ParsedRelease, RemoteItem, RemoteMedia};
    use crate::tracked::{TrackedDownloadState, TrackedDownloadStatus};

    fn tracked(download_id: &str) -> TrackedDownload {
        TrackedDownload {
            download_client_id: 1,
            protocol: DownloadProtocol::Torrent,
            download_item: DownloadClientItem::new(download_id, "A Movie 1998"),
            remote_item: RemoteItem {
                media: Some(RemoteMedia::Movie(Movie {
                    id: 3,
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

    #[test]
    fn test_set_and_find() {
        let cache = TrackedDownloadCache::new();
        assert!(cache.find("abc").is_none());
        assert!(cache.is_empty());

        cache.set(tracked("abc"));
        let found = cache.find("abc").unwrap();
        assert_eq!(found.download_id(), "abc");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let cache = TrackedDownloadCache::new();
        cache.set(tracked("abc"));

        let mut updated = tracked("abc");
        updated.state = TrackedDownloadState::Imported;
        cache.set(updated);

        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.find("abc").unwrap().state,
            TrackedDownloadState::Imported
        );
    }

    #[test]
    fn test_retain_ids() {
        let cache = TrackedDownloadCache::new();
        cache.set(tracked("a"));
        cache.set(tracked("b"));
        cache.set(tracked("c"));

        let live: HashSet<String> = ["a".to_string(), "c".to_string()].into_iter().collect();
        cache.retain_ids(&live);

        assert_eq!(cache.len(), 2);
        assert!(cache.find("a").is_some());
        assert!(cache.find("b").is_none());
        assert!(cache.find("c").is_some());
    }

    #[test]
    fn test_remove() {
        let cache = TrackedDownloadCache::new();
        cache.set(tracked("abc"));
        assert!(cache.remove("abc").is_some());
        assert!(cache.remove("abc").is_none());
        assert!(cache.is_empty());
    }
}
