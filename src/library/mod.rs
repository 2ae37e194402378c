//! Library lookup and release-to-library mapping.

mod mapper;
mod store;

pub use mapper::{LibraryMapper, RemoteItemMapper};
pub use store::{LibraryStore, MemoryLibraryStore};
