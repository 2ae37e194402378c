//! Database schema for history.db.

use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use tracing::info;

/// Current schema version, written to `PRAGMA user_version`.
pub const HISTORY_SCHEMA_VERSION: i64 = 1;

const CREATE_HISTORY_TABLE: &str = r#"
CREATE TABLE history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    download_id TEXT NOT NULL,
    media_id INTEGER NOT NULL,
    event_type TEXT NOT NULL,
    date INTEGER NOT NULL,
    source_title TEXT NOT NULL
);
CREATE INDEX idx_history_download_id ON history(download_id);
"#;

/// Create the schema on a fresh database.
pub fn create(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_HISTORY_TABLE)
        .context("Failed to create history schema")?;
    conn.execute(
        &format!("PRAGMA user_version = {}", HISTORY_SCHEMA_VERSION),
        [],
    )?;
    Ok(())
}

/// Verify an existing database is at a supported schema version.
///
/// Version 0 means a pre-versioning or empty database; anything newer than
/// the current version belongs to a newer build and is refused rather than
/// guessed at.
pub fn check_version(conn: &Connection) -> Result<()> {
    let version: i64 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .context("Failed to read history database version")?;

    if version == 0 {
        info!("Initializing history schema");
        create(conn)?;
        return Ok(());
    }
    if version > HISTORY_SCHEMA_VERSION {
        bail!(
            "History database version {} is too new (max supported: {})",
            version,
            HISTORY_SCHEMA_VERSION
        );
    }
    Ok(())
}
