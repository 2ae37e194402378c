use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use super::models::{HistoryEventType, HistoryRecord};
use super::schema;

/// Read/write access to download history events.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait HistoryStore: Send + Sync {
    /// All events recorded for a download id, in no particular order.
    fn find_by_download_id(&self, download_id: &str) -> Result<Vec<HistoryRecord>>;

    /// Append an event. The record's `id` field is ignored on insert.
    fn record(&self, record: &HistoryRecord) -> Result<()>;
}

/// SQLite-backed [`HistoryStore`].
pub struct SqliteHistoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteHistoryStore {
    pub fn new<P: AsRef<Path>>(db_file_path: P) -> Result<Self> {
        let connection =
            Connection::open(db_file_path).context("Failed to open history database")?;
        schema::check_version(&connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        schema::create(&connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn row_to_record(row: &Row) -> rusqlite::Result<HistoryRecord> {
        let event_type: String = row.get("event_type")?;
        Ok(HistoryRecord {
            id: row.get("id")?,
            download_id: row.get("download_id")?,
            media_id: row.get("media_id")?,
            event_type: HistoryEventType::parse(&event_type).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    format!("Unknown history event type: {event_type}").into(),
                )
            })?,
            date: row.get("date")?,
            source_title: row.get("source_title")?,
        })
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn find_by_download_id(&self, download_id: &str) -> Result<Vec<HistoryRecord>> {
        let connection = self.connection.lock().unwrap();
        let mut statement = connection.prepare(
            "SELECT id, download_id, media_id, event_type, date, source_title
             FROM history WHERE download_id = ?1",
        )?;
        let records = statement
            .query_map(params![download_id], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn record(&self, record: &HistoryRecord) -> Result<()> {
        let connection = self.connection.lock().unwrap();
        connection.execute(
            "INSERT INTO history (download_id, media_id, event_type, date, source_title)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.download_id,
                record.media_id,
                record.event_type.as_str(),
                record.date,
                record.source_title,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_find_by_download_id() {
        let store = SqliteHistoryStore::in_memory().unwrap();

        let grab = HistoryRecord::new("abc123", 3, HistoryEventType::Grabbed, "A Movie 1998")
            .with_date(100);
        let import = HistoryRecord::new(
            "abc123",
            3,
            HistoryEventType::DownloadFolderImported,
            "A Movie 1998",
        )
        .with_date(200);
        store.record(&grab).unwrap();
        store.record(&import).unwrap();
        store
            .record(&HistoryRecord::new(
                "other",
                9,
                HistoryEventType::Grabbed,
                "Another Movie 2001",
            ))
            .unwrap();

        let records = store.find_by_download_id("abc123").unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.download_id == "abc123"));
        assert!(records.iter().all(|r| r.id > 0));
        assert!(store.find_by_download_id("missing").unwrap().is_empty());
    }

    #[test]
    fn test_events_for_one_download_do_not_leak_into_another() {
        let store = SqliteHistoryStore::in_memory().unwrap();

        store
            .record(
                &HistoryRecord::new("dl1", 3, HistoryEventType::Grabbed, "A Movie 1998")
                    .with_date(100),
            )
            .unwrap();
        store
            .record(
                &HistoryRecord::new("dl2", 3, HistoryEventType::Grabbed, "A Movie 1998 PROPER")
                    .with_date(300),
            )
            .unwrap();

        let records = store.find_by_download_id("dl2").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_title, "A Movie 1998 PROPER");
    }
}
