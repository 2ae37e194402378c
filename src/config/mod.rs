mod file_config;

pub use file_config::{DownloadClientConfig, FileConfig};

use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub library_file: Option<PathBuf>,
    pub refresh_interval_secs: u64,
    pub client_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub library_file: Option<PathBuf>,
    pub refresh_interval_secs: u64,
    pub client_timeout_secs: u64,
    pub download_clients: Vec<DownloadClientConfig>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let library_file = file
            .library_file
            .map(PathBuf::from)
            .or_else(|| cli.library_file.clone());

        let refresh_interval_secs = file
            .refresh_interval_secs
            .unwrap_or(cli.refresh_interval_secs);
        if refresh_interval_secs == 0 {
            bail!("refresh_interval_secs must be greater than zero");
        }
        let client_timeout_secs = file.client_timeout_secs.unwrap_or(cli.client_timeout_secs);

        let download_clients = file.download_clients.unwrap_or_default();
        for client in &download_clients {
            if client.kind != "transmission" {
                bail!(
                    "Unsupported download client kind '{}' for client '{}'",
                    client.kind,
                    client.name
                );
            }
        }
        let mut ids: Vec<i32> = download_clients.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != download_clients.len() {
            bail!("Download client ids must be unique");
        }

        Ok(Self {
            db_dir,
            library_file,
            refresh_interval_secs,
            client_timeout_secs,
            download_clients,
        })
    }

    pub fn history_db_path(&self) -> PathBuf {
        self.db_dir.join("history.db")
    }
}
