//! Release name parsing.

mod standard;

use crate::media::ParsedRelease;

pub use standard::StandardReleaseParser;

/// Extracts structured tokens from a free-text release name.
///
/// Must not fail on malformed input; None signals "could not parse". In
/// lenient mode a bare title with no year/season/artist markers is accepted,
/// which is what download-client-reported names often look like.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ReleaseParser: Send + Sync {
    fn parse(&self, title: &str, lenient: bool) -> Option<ParsedRelease>;
}
