//! Queue projection: flattens the tracked set into per-unit rows.

use std::sync::RwLock;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::{EngineEvent, EventBus};
use crate::tracked::TrackedDownload;

use super::models::{queue_row_id, QueueRow};

/// Holds the current flattened queue, rebuilt on every refresh event.
///
/// Readers always see a complete snapshot from a single rebuild, never a
/// partially updated one.
pub struct QueueService {
    rows: RwLock<Vec<QueueRow>>,
    bus: EventBus,
}

impl QueueService {
    pub fn new(bus: EventBus) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            bus,
        }
    }

    pub fn get_queue(&self) -> Vec<QueueRow> {
        self.rows.read().unwrap().clone()
    }

    pub fn find_row(&self, id: i32) -> Option<QueueRow> {
        self.rows.read().unwrap().iter().find(|r| r.id == id).cloned()
    }

    /// Rebuild the queue from a full tracked-download snapshot and publish
    /// the queue-updated signal.
    pub fn rebuild(&self, mut snapshot: Vec<TrackedDownload>) {
        // Closest to completion first; unknown remaining time sorts last.
        snapshot.sort_by_key(|t| {
            (
                t.download_item.remaining_time_secs.is_none(),
                t.download_item.remaining_time_secs.unwrap_or(0),
            )
        });

        let now = chrono::Utc::now().timestamp();
        let mut rows = Vec::new();
        for tracked in &snapshot {
            // A row that cannot be attributed to a library entity is not
            // shown; the correlator normally prevents this, but entries
            // mutated externally are not trusted here.
            let Some(media) = &tracked.remote_item.media else {
                debug!(
                    "Skipping unresolved tracked download in queue: {}",
                    tracked.download_id()
                );
                continue;
            };

            for unit in media.units() {
                rows.push(QueueRow {
                    id: queue_row_id(tracked.download_id(), unit.unit_id),
                    media_id: unit.media_id,
                    unit_id: unit.unit_id,
                    title: tracked.download_item.title.clone(),
                    media_title: unit.title,
                    quality: tracked.remote_item.parsed.quality,
                    size: tracked.download_item.total_size,
                    sizeleft: tracked.download_item.remaining_size,
                    timeleft_secs: tracked.download_item.remaining_time_secs,
                    estimated_completion_at: tracked
                        .download_item
                        .remaining_time_secs
                        .map(|secs| now + secs as i64),
                    status: tracked.download_item.status.as_str().to_string(),
                    tracked_download_status: tracked.status.as_str().to_string(),
                    tracked_download_state: tracked.state.as_str().to_string(),
                    status_messages: tracked.status_messages.clone(),
                    download_id: tracked.download_id().to_string(),
                    protocol: tracked.protocol,
                    download_client_id: tracked.download_client_id,
                });
            }
        }

        *self.rows.write().unwrap() = rows;
        self.bus.publish(EngineEvent::QueueUpdated);
    }

    /// Rebuild on every refreshed event until cancelled.
    pub async fn run(&self, cancellation_token: CancellationToken) {
        let mut rx = self.bus.subscribe();
        info!("Queue projection started");
        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    info!("Queue projection stopping");
                    break;
                }
                event = rx.recv() => match event {
                    Ok(EngineEvent::TrackedDownloadsRefreshed(snapshot)) => {
                        self.rebuild(snapshot);
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        // Only the latest snapshot matters; dropped
                        // intermediate ones are harmless.
                        warn!("Queue projection lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => {
                        info!("Event bus closed, queue projection stopping");
                        break;
                    }
                },
            }
        }
    }
}
