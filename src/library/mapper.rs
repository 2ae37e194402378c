use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::media::{ParsedRelease, ReleaseInfo, RemoteItem, RemoteMedia};

use super::LibraryStore;

/// Maps parsed release tokens onto a concrete library entity.
///
/// "No library match" is a valid result (`RemoteItem.media == None`), not an
/// error; `Err` is reserved for infrastructure failures in the underlying
/// store.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RemoteItemMapper: Send + Sync {
    fn map(&self, parsed: &ParsedRelease, release_title: &str) -> Result<RemoteItem>;
}

/// [`RemoteItemMapper`] backed by a [`LibraryStore`].
pub struct LibraryMapper {
    store: Arc<dyn LibraryStore>,
}

impl LibraryMapper {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// Resolution order: a season marker means a series; an artist marker
    /// means an album, then a book; otherwise movie, album, book in turn.
    fn resolve(&self, parsed: &ParsedRelease) -> Result<Option<RemoteMedia>> {
        if let Some(season) = parsed.season {
            if let Some(series) = self.store.find_series(&parsed.title)? {
                let episodes = self.store.season_episodes(series.id, season)?;
                return Ok(Some(RemoteMedia::Episodes { series, episodes }));
            }
            return Ok(None);
        }

        if let Some(artist) = &parsed.artist {
            if let Some(album) = self.store.find_album(Some(artist), &parsed.title)? {
                return Ok(Some(RemoteMedia::Album(album)));
            }
            if let Some(book) = self.store.find_book(Some(artist), &parsed.title)? {
                return Ok(Some(RemoteMedia::Book(book)));
            }
            return Ok(None);
        }

        if let Some(movie) = self.store.find_movie(&parsed.title, parsed.year)? {
            return Ok(Some(RemoteMedia::Movie(movie)));
        }
        if let Some(album) = self.store.find_album(None, &parsed.title)? {
            return Ok(Some(RemoteMedia::Album(album)));
        }
        if let Some(book) = self.store.find_book(None, &parsed.title)? {
            return Ok(Some(RemoteMedia::Book(book)));
        }
        Ok(None)
    }
}

impl RemoteItemMapper for LibraryMapper {
    fn map(&self, parsed: &ParsedRelease, release_title: &str) -> Result<RemoteItem> {
        let media = self.resolve(parsed)?;
        if media.is_none() {
            debug!("No library match for release: {}", release_title);
        }
        Ok(RemoteItem {
            media,
            parsed: parsed.clone(),
            release: Some(ReleaseInfo::new(release_title)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::MemoryLibraryStore;
    use crate::media::{Album, Book, Episode, Movie, Series};

    fn mapper_with_store() -> (LibraryMapper, Arc<MemoryLibraryStore>) {
        let store = Arc::new(MemoryLibraryStore::new());
        (LibraryMapper::new(store.clone()), store)
    }

    fn parsed(title: &str) -> ParsedRelease {
        ParsedRelease {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_map_movie() {
        let (mapper, store) = mapper_with_store();
        store.add_movie(Movie {
            id: 3,
            title: "A Movie".to_string(),
            year: Some(1998),
        });

        let mut p = parsed("A Movie");
        p.year = Some(1998);
        let item = mapper.map(&p, "A.Movie.1998").unwrap();
        match item.media {
            Some(RemoteMedia::Movie(m)) => assert_eq!(m.id, 3),
            other => panic!("Unexpected mapping: {:?}", other),
        }
        assert_eq!(item.release.unwrap().title, "A.Movie.1998");
    }

    #[test]
    fn test_map_album_before_book_for_artist_releases() {
        let (mapper, store) = mapper_with_store();
        store.add_album(Album {
            id: 10,
            artist: "A Name".to_string(),
            title: "Shared Title".to_string(),
            year: None,
        });
        store.add_book(Book {
            id: 20,
            author: "A Name".to_string(),
            title: "Shared Title".to_string(),
        });

        let mut p = parsed("Shared Title");
        p.artist = Some("A Name".to_string());
        let item = mapper.map(&p, "A Name - Shared Title").unwrap();
        match item.media {
            Some(RemoteMedia::Album(a)) => assert_eq!(a.id, 10),
            other => panic!("Unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn test_map_season_pack() {
        let (mapper, store) = mapper_with_store();
        store.add_series(
            Series {
                id: 7,
                title: "A Show".to_string(),
            },
            vec![Episode {
                id: 71,
                season: 2,
                number: 1,
                title: None,
            }],
        );

        let mut p = parsed("A Show");
        p.season = Some(2);
        let item = mapper.map(&p, "A.Show.S02.1080p").unwrap();
        match item.media {
            Some(RemoteMedia::Episodes { series, episodes }) => {
                assert_eq!(series.id, 7);
                assert_eq!(episodes.len(), 1);
            }
            other => panic!("Unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn test_no_match_is_ok_none() {
        let (mapper, _) = mapper_with_store();
        let item = mapper.map(&parsed("Unknown Thing"), "Unknown.Thing.2020").unwrap();
        assert!(item.media.is_none());
        assert!(!item.is_resolved());
    }
}
