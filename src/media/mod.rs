//! Library entity and release metadata models.

mod models;

pub use models::{
    Album, Book, Episode, MediaKind, MediaUnit, Movie, ParsedRelease, Quality, ReleaseInfo,
    RemoteItem, RemoteMedia, Series,
};
