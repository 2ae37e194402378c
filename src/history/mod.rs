//! Download history: past lifecycle events per download id.

mod models;
mod schema;
mod store;

pub use models::{HistoryEventType, HistoryRecord};
pub use store::{HistoryStore, SqliteHistoryStore};
