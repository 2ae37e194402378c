use std::path::Path;
use std::sync::RwLock;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::media::{Album, Book, Episode, Movie, Series};

/// Title-based lookup into the managed library.
///
/// Lookups match on normalized titles (lowercased, punctuation stripped) so
/// that release-name spellings like "A.Movies.Title" still resolve. A miss
/// is `Ok(None)`, never an error.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait LibraryStore: Send + Sync {
    fn find_movie(&self, title: &str, year: Option<i32>) -> Result<Option<Movie>>;

    fn find_album(&self, artist: Option<&str>, title: &str) -> Result<Option<Album>>;

    fn find_book(&self, author: Option<&str>, title: &str) -> Result<Option<Book>>;

    fn find_series(&self, title: &str) -> Result<Option<Series>>;

    fn season_episodes(&self, series_id: i64, season: i32) -> Result<Vec<Episode>>;
}

#[derive(Debug, Deserialize)]
struct SeriesSeed {
    id: i64,
    title: String,
    #[serde(default)]
    episodes: Vec<EpisodeSeed>,
}

#[derive(Debug, Deserialize)]
struct EpisodeSeed {
    id: i64,
    season: i32,
    number: i32,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LibrarySeed {
    #[serde(default)]
    movies: Vec<Movie>,
    #[serde(default)]
    albums: Vec<Album>,
    #[serde(default)]
    books: Vec<Book>,
    #[serde(default)]
    series: Vec<SeriesSeed>,
}

#[derive(Debug, Default)]
struct LibraryContent {
    movies: Vec<Movie>,
    albums: Vec<Album>,
    books: Vec<Book>,
    series: Vec<Series>,
    episodes: Vec<(i64, Episode)>,
}

/// In-memory [`LibraryStore`], seeded from a TOML file or built up in tests.
#[derive(Default)]
pub struct MemoryLibraryStore {
    content: RwLock<LibraryContent>,
}

/// Lowercase and strip everything but alphanumerics, collapsing runs into
/// single spaces.
fn normalize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_space = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    out
}

impl MemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load library content from a TOML seed file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read library file {}", path.as_ref().display())
        })?;
        let seed: LibrarySeed = toml::from_str(&content).with_context(|| {
            format!("Failed to parse library file {}", path.as_ref().display())
        })?;

        let store = Self::new();
        {
            let mut inner = store.content.write().unwrap();
            inner.movies = seed.movies;
            inner.albums = seed.albums;
            inner.books = seed.books;
            for series in seed.series {
                inner.series.push(Series {
                    id: series.id,
                    title: series.title,
                });
                for ep in series.episodes {
                    inner.episodes.push((
                        series.id,
                        Episode {
                            id: ep.id,
                            season: ep.season,
                            number: ep.number,
                            title: ep.title,
                        },
                    ));
                }
            }
        }
        let inner = store.content.read().unwrap();
        info!(
            "Library loaded: {} movies, {} albums, {} books, {} series",
            inner.movies.len(),
            inner.albums.len(),
            inner.books.len(),
            inner.series.len()
        );
        drop(inner);
        Ok(store)
    }

    pub fn add_movie(&self, movie: Movie) {
        self.content.write().unwrap().movies.push(movie);
    }

    pub fn add_album(&self, album: Album) {
        self.content.write().unwrap().albums.push(album);
    }

    pub fn add_book(&self, book: Book) {
        self.content.write().unwrap().books.push(book);
    }

    pub fn add_series(&self, series: Series, episodes: Vec<Episode>) {
        let mut inner = self.content.write().unwrap();
        for ep in episodes {
            inner.episodes.push((series.id, ep));
        }
        inner.series.push(series);
    }
}

impl LibraryStore for MemoryLibraryStore {
    fn find_movie(&self, title: &str, year: Option<i32>) -> Result<Option<Movie>> {
        let wanted = normalize_title(title);
        let inner = self.content.read().unwrap();
        let matches: Vec<&Movie> = inner
            .movies
            .iter()
            .filter(|m| normalize_title(&m.title) == wanted)
            .collect();
        // Year disambiguates remakes; without one, only a unique title match
        // is trusted.
        let found = match year {
            Some(y) => matches
                .iter()
                .find(|m| m.year == Some(y))
                .or(if matches.len() == 1 {
                    matches.first()
                } else {
                    None
                })
                .copied(),
            None => {
                if matches.len() == 1 {
                    Some(matches[0])
                } else {
                    None
                }
            }
        };
        Ok(found.cloned())
    }

    fn find_album(&self, artist: Option<&str>, title: &str) -> Result<Option<Album>> {
        let wanted = normalize_title(title);
        let inner = self.content.read().unwrap();
        let found = inner.albums.iter().find(|a| {
            normalize_title(&a.title) == wanted
                && artist
                    .map(|artist| normalize_title(&a.artist) == normalize_title(artist))
                    .unwrap_or(true)
        });
        Ok(found.cloned())
    }

    fn find_book(&self, author: Option<&str>, title: &str) -> Result<Option<Book>> {
        let wanted = normalize_title(title);
        let inner = self.content.read().unwrap();
        let found = inner.books.iter().find(|b| {
            normalize_title(&b.title) == wanted
                && author
                    .map(|author| normalize_title(&b.author) == normalize_title(author))
                    .unwrap_or(true)
        });
        Ok(found.cloned())
    }

    fn find_series(&self, title: &str) -> Result<Option<Series>> {
        let wanted = normalize_title(title);
        let inner = self.content.read().unwrap();
        let found = inner
            .series
            .iter()
            .find(|s| normalize_title(&s.title) == wanted);
        Ok(found.cloned())
    }

    fn season_episodes(&self, series_id: i64, season: i32) -> Result<Vec<Episode>> {
        let inner = self.content.read().unwrap();
        let mut episodes: Vec<Episode> = inner
            .episodes
            .iter()
            .filter(|(sid, ep)| *sid == series_id && ep.season == season)
            .map(|(_, ep)| ep.clone())
            .collect();
        episodes.sort_by_key(|ep| ep.number);
        Ok(episodes)
    }
}
