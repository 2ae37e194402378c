//! Data models shared across the tracking engine.
//!
//! A release title is parsed into a [`ParsedRelease`], which the mapping
//! service resolves against the library into a [`RemoteItem`]. The resolved
//! media entity is a closed set of variants ([`RemoteMedia`]) rather than a
//! polymorphic hierarchy, so downstream code dispatches with an explicit
//! match instead of runtime type inspection.

use serde::{Deserialize, Serialize};

/// Kind of library media a release resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaKind {
    Movie,
    Album,
    Book,
    Episode,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "MOVIE",
            MediaKind::Album => "ALBUM",
            MediaKind::Book => "BOOK",
            MediaKind::Episode => "EPISODE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MOVIE" => Some(MediaKind::Movie),
            "ALBUM" => Some(MediaKind::Album),
            "BOOK" => Some(MediaKind::Book),
            "EPISODE" => Some(MediaKind::Episode),
            _ => None,
        }
    }
}

/// A movie in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
}

/// An album in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub artist: String,
    pub title: String,
    pub year: Option<i32>,
}

/// A book in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub author: String,
    pub title: String,
}

/// A TV series in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub id: i64,
    pub title: String,
}

/// A single episode of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: i64,
    pub season: i32,
    pub number: i32,
    pub title: Option<String>,
}

/// The resolved library entity for a release.
///
/// Movies, albums and books occupy a single queue row each; a season pack
/// fans out to one row per episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemoteMedia {
    Movie(Movie),
    Album(Album),
    Book(Book),
    Episodes {
        series: Series,
        episodes: Vec<Episode>,
    },
}

impl RemoteMedia {
    /// Id of the owning library entity (series id for episode bundles).
    pub fn media_id(&self) -> i64 {
        match self {
            RemoteMedia::Movie(m) => m.id,
            RemoteMedia::Album(a) => a.id,
            RemoteMedia::Book(b) => b.id,
            RemoteMedia::Episodes { series, .. } => series.id,
        }
    }

    /// Display title of the owning entity.
    pub fn title(&self) -> &str {
        match self {
            RemoteMedia::Movie(m) => &m.title,
            RemoteMedia::Album(a) => &a.title,
            RemoteMedia::Book(b) => &b.title,
            RemoteMedia::Episodes { series, .. } => &series.title,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            RemoteMedia::Movie(_) => MediaKind::Movie,
            RemoteMedia::Album(_) => MediaKind::Album,
            RemoteMedia::Book(_) => MediaKind::Book,
            RemoteMedia::Episodes { .. } => MediaKind::Episode,
        }
    }

    /// Fan out to the constituent media units.
    ///
    /// A season pack with no episode list resolves to no units at all, which
    /// the queue projection treats as "nothing to show".
    pub fn units(&self) -> Vec<MediaUnit> {
        match self {
            RemoteMedia::Movie(m) => vec![MediaUnit {
                media_id: m.id,
                unit_id: None,
                title: m.title.clone(),
            }],
            RemoteMedia::Album(a) => vec![MediaUnit {
                media_id: a.id,
                unit_id: None,
                title: format!("{} - {}", a.artist, a.title),
            }],
            RemoteMedia::Book(b) => vec![MediaUnit {
                media_id: b.id,
                unit_id: None,
                title: format!("{} - {}", b.author, b.title),
            }],
            RemoteMedia::Episodes { series, episodes } => episodes
                .iter()
                .map(|ep| MediaUnit {
                    media_id: series.id,
                    unit_id: Some(ep.id),
                    title: format!("{} S{:02}E{:02}", series.title, ep.season, ep.number),
                })
                .collect(),
        }
    }
}

/// One displayable unit inside a resolved media entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUnit {
    /// Id of the owning library entity.
    pub media_id: i64,
    /// Per-unit id for multi-unit media (episode id), None for single-unit.
    pub unit_id: Option<i64>,
    /// Display title for the unit.
    pub title: String,
}

/// Release quality derived from title tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quality {
    #[default]
    Unknown,
    Sdtv,
    Dvd,
    Hdtv720,
    Hdtv1080,
    Webdl720,
    Webdl1080,
    Bluray720,
    Bluray1080,
    Bluray2160,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Unknown => "UNKNOWN",
            Quality::Sdtv => "SDTV",
            Quality::Dvd => "DVD",
            Quality::Hdtv720 => "HDTV_720",
            Quality::Hdtv1080 => "HDTV_1080",
            Quality::Webdl720 => "WEBDL_720",
            Quality::Webdl1080 => "WEBDL_1080",
            Quality::Bluray720 => "BLURAY_720",
            Quality::Bluray1080 => "BLURAY_1080",
            Quality::Bluray2160 => "BLURAY_2160",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UNKNOWN" => Some(Quality::Unknown),
            "SDTV" => Some(Quality::Sdtv),
            "DVD" => Some(Quality::Dvd),
            "HDTV_720" => Some(Quality::Hdtv720),
            "HDTV_1080" => Some(Quality::Hdtv1080),
            "WEBDL_720" => Some(Quality::Webdl720),
            "WEBDL_1080" => Some(Quality::Webdl1080),
            "BLURAY_720" => Some(Quality::Bluray720),
            "BLURAY_1080" => Some(Quality::Bluray1080),
            "BLURAY_2160" => Some(Quality::Bluray2160),
            _ => None,
        }
    }
}

/// Structured tokens extracted from a free-text release name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRelease {
    /// Primary entity title (movie/album/book/series name).
    pub title: String,
    /// Artist or author, for "Artist - Title" style names.
    pub artist: Option<String>,
    /// Release year, if present in the name.
    pub year: Option<i32>,
    /// Season number, for season packs.
    pub season: Option<i32>,
    /// Quality derived from title tokens.
    pub quality: Quality,
    /// Language tokens found in the name (empty = unspecified).
    pub languages: Vec<String>,
}

/// The originating release, when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Release title as published by the indexer.
    pub title: String,
    /// Indexer the release came from.
    pub indexer: Option<String>,
    /// Release size in bytes, if reported.
    pub size_bytes: Option<i64>,
}

impl ReleaseInfo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            indexer: None,
            size_bytes: None,
        }
    }
}

/// Result of mapping a parsed release onto the library.
///
/// `media` is None when the release parsed cleanly but matched nothing in
/// the library; that is a valid "no match" outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    pub media: Option<RemoteMedia>,
    pub parsed: ParsedRelease,
    pub release: Option<ReleaseInfo>,
}

impl RemoteItem {
    /// Returns true if the mapping resolved to a concrete library entity.
    pub fn is_resolved(&self) -> bool {
        self.media.is_some()
    }
}
