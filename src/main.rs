use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tokio_util::sync::CancellationToken;
use trackarr::config::{AppConfig, CliConfig, FileConfig};
use trackarr::download_client::{DownloadClient, TransmissionClient};
use trackarr::events::EventBus;
use trackarr::history::SqliteHistoryStore;
use trackarr::library::{LibraryMapper, MemoryLibraryStore};
use trackarr::parser::StandardReleaseParser;
use trackarr::queue::QueueService;
use trackarr::refresh::RefreshMonitor;
use trackarr::tracked::{DownloadTracker, TrackedDownloadCache};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values in it override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding the SQLite databases.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// Path to the TOML library seed file.
    #[clap(long, value_parser = parse_path)]
    pub library_file: Option<PathBuf>,

    /// Seconds between download client polls.
    #[clap(long, default_value_t = 30)]
    pub refresh_interval_secs: u64,

    /// Timeout in seconds for download client requests.
    #[clap(long, default_value_t = 30)]
    pub client_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        db_dir: cli_args.db_dir,
        library_file: cli_args.library_file,
        refresh_interval_secs: cli_args.refresh_interval_secs,
        client_timeout_secs: cli_args.client_timeout_secs,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!(
        "Opening SQLite history database at {:?}...",
        config.history_db_path()
    );
    let history = Arc::new(SqliteHistoryStore::new(config.history_db_path())?);

    let library = match &config.library_file {
        Some(path) => {
            info!("Loading library from {:?}...", path);
            Arc::new(MemoryLibraryStore::from_toml_file(path)?)
        }
        None => Arc::new(MemoryLibraryStore::new()),
    };

    let mut clients: Vec<Arc<dyn DownloadClient>> = Vec::new();
    for client_config in &config.download_clients {
        info!(
            "Configuring download client '{}' at {}",
            client_config.name, client_config.url
        );
        clients.push(Arc::new(TransmissionClient::new(
            client_config.id,
            client_config.name.clone(),
            client_config.url.clone(),
            config.client_timeout_secs,
        )?));
    }

    let bus = EventBus::new();
    let cache = Arc::new(TrackedDownloadCache::new());
    let tracker = Arc::new(DownloadTracker::new(
        cache.clone(),
        Arc::new(StandardReleaseParser::new()),
        Arc::new(LibraryMapper::new(library)),
        history,
    ));
    let queue_service = Arc::new(QueueService::new(bus.clone()));
    let refresh_monitor = Arc::new(RefreshMonitor::new(
        clients,
        tracker,
        cache,
        bus,
        Duration::from_secs(config.refresh_interval_secs),
    ));

    let cancellation_token = CancellationToken::new();

    let queue_token = cancellation_token.clone();
    let queue_for_run = queue_service.clone();
    let queue_task = tokio::spawn(async move { queue_for_run.run(queue_token).await });

    let refresh_token = cancellation_token.clone();
    let refresh_task = tokio::spawn(async move { refresh_monitor.run(refresh_token).await });

    info!(
        "Tracking started, polling every {}s",
        config.refresh_interval_secs
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");
    cancellation_token.cancel();

    let _ = refresh_task.await;
    let _ = queue_task.await;
    info!("Stopped with {} queue rows", queue_service.get_queue().len());
    Ok(())
}
