//! Flattened queue view over the tracked download cache.

mod models;
mod projection;

pub use models::{queue_row_id, QueueRow};
pub use projection::QueueService;
