use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_dir: Option<String>,
    pub library_file: Option<String>,
    pub refresh_interval_secs: Option<u64>,
    pub client_timeout_secs: Option<u64>,

    // Configured download clients
    pub download_clients: Option<Vec<DownloadClientConfig>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DownloadClientConfig {
    pub id: i32,
    pub name: String,
    /// Client kind; only "transmission" is supported.
    pub kind: String,
    pub url: String,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
