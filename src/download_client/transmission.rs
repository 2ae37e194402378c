//! Transmission RPC client.
//!
//! Speaks the Transmission JSON-RPC protocol, including the CSRF session-id
//! handshake (a 409 response carries the session id to retry with).

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::models::{DownloadClientItem, DownloadItemStatus, DownloadProtocol};
use super::DownloadClient;

const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";

const TORRENT_GET_FIELDS: &[&str] = &[
    "hashString",
    "name",
    "totalSize",
    "leftUntilDone",
    "eta",
    "status",
    "downloadDir",
    "isFinished",
    "error",
    "errorString",
];

// Transmission status codes (transmission.h: tr_torrent_activity).
const TR_STATUS_STOPPED: i32 = 0;
const TR_STATUS_QUEUED_VERIFY: i32 = 1;
const TR_STATUS_VERIFYING: i32 = 2;
const TR_STATUS_QUEUED_DOWNLOAD: i32 = 3;
const TR_STATUS_DOWNLOADING: i32 = 4;
const TR_STATUS_QUEUED_SEED: i32 = 5;
const TR_STATUS_SEEDING: i32 = 6;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: String,
    #[serde(default)]
    arguments: Option<TorrentGetArguments>,
}

#[derive(Debug, Deserialize)]
struct TorrentGetArguments {
    #[serde(default)]
    torrents: Vec<TransmissionTorrent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransmissionTorrent {
    hash_string: String,
    name: String,
    total_size: i64,
    left_until_done: i64,
    /// Seconds until done; -1 unavailable, -2 unknown.
    eta: i64,
    status: i32,
    download_dir: Option<String>,
    #[serde(default)]
    is_finished: bool,
    #[serde(default)]
    error: i32,
    #[serde(default)]
    error_string: String,
}

/// Download client backed by a Transmission daemon.
pub struct TransmissionClient {
    id: i32,
    name: String,
    client: Client,
    rpc_url: String,
    session_id: Mutex<Option<String>>,
}

impl TransmissionClient {
    /// Create a new TransmissionClient.
    ///
    /// `base_url` is the daemon root (e.g. "http://localhost:9091"); the RPC
    /// endpoint path is appended here.
    pub fn new(id: i32, name: String, base_url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            id,
            name,
            client,
            rpc_url: format!("{}/transmission/rpc", base_url.trim_end_matches('/')),
            session_id: Mutex::new(None),
        })
    }

    async fn rpc(&self, body: &serde_json::Value) -> Result<RpcResponse> {
        let session_id = self.session_id.lock().unwrap().clone();

        let mut request = self.client.post(&self.rpc_url).json(body);
        if let Some(id) = &session_id {
            request = request.header(SESSION_ID_HEADER, id);
        }
        let response = request.send().await?;

        // A 409 carries the session id to use; retry once with it.
        let response = if response.status() == StatusCode::CONFLICT {
            let new_session_id = response
                .headers()
                .get(SESSION_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| anyhow!("Transmission 409 response missing session id header"))?
                .to_string();
            debug!("Transmission session id refreshed");
            *self.session_id.lock().unwrap() = Some(new_session_id.clone());

            self.client
                .post(&self.rpc_url)
                .header(SESSION_ID_HEADER, new_session_id)
                .json(body)
                .send()
                .await?
        } else {
            response
        };

        if !response.status().is_success() {
            return Err(anyhow!(
                "Transmission RPC request failed with status: {}",
                response.status()
            ));
        }

        let rpc_response: RpcResponse = response.json().await?;
        if rpc_response.result != "success" {
            return Err(anyhow!(
                "Transmission RPC returned error: {}",
                rpc_response.result
            ));
        }
        Ok(rpc_response)
    }

    fn torrent_to_item(torrent: TransmissionTorrent) -> DownloadClientItem {
        let status = if torrent.error != 0 {
            DownloadItemStatus::Warning
        } else {
            match torrent.status {
                TR_STATUS_STOPPED => DownloadItemStatus::Paused,
                TR_STATUS_QUEUED_VERIFY | TR_STATUS_VERIFYING | TR_STATUS_QUEUED_DOWNLOAD => {
                    DownloadItemStatus::Queued
                }
                TR_STATUS_DOWNLOADING => DownloadItemStatus::Downloading,
                TR_STATUS_QUEUED_SEED | TR_STATUS_SEEDING => DownloadItemStatus::Completed,
                _ if torrent.left_until_done == 0 && torrent.is_finished => {
                    DownloadItemStatus::Completed
                }
                _ => DownloadItemStatus::Downloading,
            }
        };

        let remaining_time_secs = if torrent.eta >= 0 {
            Some(torrent.eta as u64)
        } else {
            None
        };

        let message = if torrent.error != 0 && !torrent.error_string.is_empty() {
            Some(torrent.error_string)
        } else {
            None
        };

        let complete = torrent.left_until_done == 0 && torrent.total_size > 0;
        DownloadClientItem {
            // Transmission reports lowercase info-hashes; history records
            // store them uppercased, so normalize here.
            download_id: torrent.hash_string.to_uppercase(),
            title: torrent.name,
            total_size: torrent.total_size,
            remaining_size: torrent.left_until_done,
            remaining_time_secs,
            status,
            message,
            output_path: torrent.download_dir,
            can_be_removed: torrent.status == TR_STATUS_STOPPED || complete,
            can_move_files: complete,
        }
    }
}

#[async_trait]
impl DownloadClient for TransmissionClient {
    fn id(&self) -> i32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn protocol(&self) -> DownloadProtocol {
        DownloadProtocol::Torrent
    }

    async fn list_items(&self) -> Result<Vec<DownloadClientItem>> {
        let body = serde_json::json!({
            "method": "torrent-get",
            "arguments": { "fields": TORRENT_GET_FIELDS },
        });
        let response = self.rpc(&body).await?;
        let torrents = response.arguments.map(|a| a.torrents).unwrap_or_default();
        Ok(torrents.into_iter().map(Self::torrent_to_item).collect())
    }
}
