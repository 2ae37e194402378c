//! Periodic refresh loop.
//!
//! Polls every configured download client, runs each reported item through
//! the correlator, sweeps cache entries no client reports anymore, and
//! publishes the refreshed snapshot for the queue projection.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::download_client::DownloadClient;
use crate::events::{EngineEvent, EventBus};
use crate::tracked::{DownloadTracker, TrackedDownloadCache};

/// Outcome of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    /// Items reported across all clients.
    pub items_seen: usize,
    /// Items successfully correlated this cycle.
    pub items_tracked: usize,
    /// Clients whose poll failed.
    pub failed_clients: usize,
}

pub struct RefreshMonitor {
    clients: Vec<Arc<dyn DownloadClient>>,
    tracker: Arc<DownloadTracker>,
    cache: Arc<TrackedDownloadCache>,
    bus: EventBus,
    interval: Duration,
}

impl RefreshMonitor {
    pub fn new(
        clients: Vec<Arc<dyn DownloadClient>>,
        tracker: Arc<DownloadTracker>,
        cache: Arc<TrackedDownloadCache>,
        bus: EventBus,
        interval: Duration,
    ) -> Self {
        Self {
            clients,
            tracker,
            cache,
            bus,
            interval,
        }
    }

    /// Poll all clients once and publish the refreshed snapshot.
    ///
    /// A failing client is skipped with a warning; its items keep their
    /// cached entries because the sweep only runs when every client
    /// answered, otherwise a flaky client would evict still-live downloads.
    pub async fn refresh_once(&self) -> RefreshReport {
        let mut live_ids: HashSet<String> = HashSet::new();
        let mut items_seen = 0;
        let mut items_tracked = 0;
        let mut failed_clients = 0;

        for client in &self.clients {
            let items = match client.list_items().await {
                Ok(items) => items,
                Err(err) => {
                    warn!("Failed to poll download client {}: {}", client.name(), err);
                    failed_clients += 1;
                    continue;
                }
            };

            debug!("Client {} reported {} items", client.name(), items.len());
            items_seen += items.len();
            for item in items {
                live_ids.insert(item.download_id.clone());
                if self.tracker.track_download(client.as_ref(), item).is_some() {
                    items_tracked += 1;
                }
            }
        }

        if failed_clients == 0 {
            self.cache.retain_ids(&live_ids);
        }

        self.bus
            .publish(EngineEvent::TrackedDownloadsRefreshed(self.cache.all()));

        RefreshReport {
            items_seen,
            items_tracked,
            failed_clients,
        }
    }

    /// Poll on a fixed interval until cancelled.
    pub async fn run(&self, cancellation_token: CancellationToken) {
        info!(
            "Refresh monitor started, polling {} clients every {:?}",
            self.clients.len(),
            self.interval
        );
        let mut interval = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    info!("Refresh monitor stopping");
                    break;
                }
                _ = interval.tick() => {
                    let report = self.refresh_once().await;
                    debug!(
                        "Refresh cycle: {} seen, {} tracked, {} failed clients",
                        report.items_seen, report.items_tracked, report.failed_clients
                    );
                }
            }
        }
    }
}
