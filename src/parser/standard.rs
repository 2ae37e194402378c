//! Token-based release name parser.
//!
//! Release names in the wild look like "A.Movie.1998.1080p.BluRay.x264-GRP",
//! "Artist - Album (2004) [FLAC]" or "A Show S02 1080p WEB-DL". The parser
//! normalizes separators to spaces, scans for year/season/quality/language
//! markers, and treats everything before the first marker as the title.

use regex::Regex;

use crate::media::{ParsedRelease, Quality};

use super::ReleaseParser;

const LANGUAGE_TOKENS: &[&str] = &[
    "FRENCH", "GERMAN", "ITALIAN", "SPANISH", "NORDIC", "DANISH", "DUTCH", "JAPANESE", "KOREAN",
    "MULTI",
];

pub struct StandardReleaseParser {
    season_regex: Regex,
    year_regex: Regex,
}

impl Default for StandardReleaseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardReleaseParser {
    pub fn new() -> Self {
        Self {
            season_regex: Regex::new(r"(?i)\bS(\d{1,2})(?:E\d{1,3})?\b")
                .expect("Invalid Regex, this should be fixed at runtime."),
            year_regex: Regex::new(r"\b((?:19|20)\d{2})\b")
                .expect("Invalid Regex, this should be fixed at runtime."),
        }
    }

    /// Map a single normalized token to a quality, if it is a quality marker.
    fn quality_token(token: &str) -> Option<Quality> {
        let upper = token.to_uppercase();
        match upper.as_str() {
            "SDTV" | "PDTV" => Some(Quality::Sdtv),
            "DVD" | "DVDRIP" => Some(Quality::Dvd),
            _ => None,
        }
    }

    /// Resolve quality from resolution and source markers scattered through
    /// the name. Resolution plus source beats either alone.
    fn scan_quality(tokens: &[&str]) -> Quality {
        let mut resolution: Option<u32> = None;
        let mut bluray = false;
        let mut webdl = false;
        let mut hdtv = false;
        let mut single: Option<Quality> = None;

        for token in tokens {
            let upper = token.to_uppercase();
            match upper.as_str() {
                "2160P" | "4K" | "UHD" => resolution = Some(2160),
                "1080P" | "1080I" => resolution = Some(1080),
                "720P" => resolution = Some(720),
                "BLURAY" | "BLU-RAY" | "BDRIP" | "BRRIP" | "REMUX" => bluray = true,
                "WEB-DL" | "WEBDL" | "WEB" | "WEBRIP" => webdl = true,
                "HDTV" => hdtv = true,
                _ => {
                    if single.is_none() {
                        single = Self::quality_token(token);
                    }
                }
            }
        }

        match (resolution, bluray, webdl, hdtv) {
            (Some(2160), _, _, _) => Quality::Bluray2160,
            (Some(1080), true, _, _) => Quality::Bluray1080,
            (Some(720), true, _, _) => Quality::Bluray720,
            (Some(1080), _, true, _) => Quality::Webdl1080,
            (Some(720), _, true, _) => Quality::Webdl720,
            (Some(1080), _, _, _) => Quality::Hdtv1080,
            (Some(720), _, _, _) => Quality::Hdtv720,
            (None, true, _, _) => Quality::Bluray1080,
            (None, _, true, _) => Quality::Webdl1080,
            (None, _, _, true) => Quality::Sdtv,
            _ => single.unwrap_or(Quality::Unknown),
        }
    }

    /// Index of the first marker token (year, season, quality, language),
    /// which bounds the title portion of the name. A year in the leading
    /// position is part of the title ("2001 A Space Odyssey"), not a marker.
    fn first_marker_index(&self, tokens: &[&str]) -> Option<usize> {
        tokens.iter().enumerate().position(|(i, token)| {
            let upper = token.to_uppercase();
            (i > 0 && self.year_regex.is_match(token))
                || self.season_regex.is_match(token)
                || Self::quality_token(token).is_some()
                || LANGUAGE_TOKENS.contains(&upper.as_str())
                || matches!(
                    upper.as_str(),
                    "2160P"
                        | "4K"
                        | "UHD"
                        | "1080P"
                        | "1080I"
                        | "720P"
                        | "BLURAY"
                        | "BLU-RAY"
                        | "BDRIP"
                        | "BRRIP"
                        | "REMUX"
                        | "WEB-DL"
                        | "WEBDL"
                        | "WEBRIP"
                        | "HDTV"
                        | "FLAC"
                        | "MP3"
                        | "EPUB"
                )
        })
    }
}

impl ReleaseParser for StandardReleaseParser {
    fn parse(&self, title: &str, lenient: bool) -> Option<ParsedRelease> {
        let normalized = title
            .replace(['.', '_'], " ")
            .replace(['[', ']', '(', ')'], " ");
        let normalized = normalized.trim();
        if normalized.is_empty() {
            return None;
        }

        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let season = self
            .season_regex
            .captures(normalized)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<i32>().ok());

        // The last plausible year wins; titles themselves often contain one
        // ("2001 A Space Odyssey 1968").
        let year = self
            .year_regex
            .captures_iter(normalized)
            .filter_map(|c| c.get(1))
            .filter_map(|m| m.as_str().parse::<i32>().ok())
            .last();

        let quality = Self::scan_quality(&tokens);

        let languages: Vec<String> = tokens
            .iter()
            .map(|t| t.to_uppercase())
            .filter(|t| LANGUAGE_TOKENS.contains(&t.as_str()))
            .collect();

        let title_end = self.first_marker_index(&tokens).unwrap_or(tokens.len());
        let title_part = tokens[..title_end].join(" ");
        let title_part = title_part.trim().trim_end_matches('-').trim();
        if title_part.is_empty() {
            return None;
        }

        // "Artist - Title" names carry the artist before a dash separator.
        let (artist, main_title) = match title_part.split_once(" - ") {
            Some((artist, rest)) if !artist.trim().is_empty() && !rest.trim().is_empty() => {
                (Some(artist.trim().to_string()), rest.trim().to_string())
            }
            _ => (None, title_part.to_string()),
        };

        // Strict mode requires at least one release marker so that arbitrary
        // prose is not mistaken for a release name.
        if !lenient && year.is_none() && season.is_none() && artist.is_none() {
            return None;
        }

        Some(ParsedRelease {
            title: main_title,
            artist,
            year,
            season,
            quality,
            languages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(title: &str) -> Option<ParsedRelease> {
        StandardReleaseParser::new().parse(title, false)
    }

    #[test]
    fn test_parse_movie_release() {
        let parsed = parse("A.Movie.1998.1080p.BluRay.x264-GRP").unwrap();
        assert_eq!(parsed.title, "A Movie");
        assert_eq!(parsed.year, Some(1998));
        assert_eq!(parsed.season, None);
        assert_eq!(parsed.quality, Quality::Bluray1080);
    }

    #[test]
    fn test_parse_album_release() {
        let parsed = parse("An Artist - An Album (2004) [FLAC]").unwrap();
        assert_eq!(parsed.artist.as_deref(), Some("An Artist"));
        assert_eq!(parsed.title, "An Album");
        assert_eq!(parsed.year, Some(2004));
    }

    #[test]
    fn test_parse_season_pack() {
        let parsed = parse("A Show S02 1080p WEB-DL").unwrap();
        assert_eq!(parsed.title, "A Show");
        assert_eq!(parsed.season, Some(2));
        assert_eq!(parsed.quality, Quality::Webdl1080);
    }

    #[test]
    fn test_last_year_wins() {
        let parsed = parse("2001 A Space Odyssey 1968 720p BluRay").unwrap();
        assert_eq!(parsed.title, "2001 A Space Odyssey");
        assert_eq!(parsed.year, Some(1968));
        assert_eq!(parsed.quality, Quality::Bluray720);
    }

    #[test]
    fn test_language_tokens() {
        let parsed = parse("A.Movie.1998.FRENCH.1080p.BluRay").unwrap();
        assert_eq!(parsed.languages, vec!["FRENCH".to_string()]);
    }

    #[test]
    fn test_strict_rejects_bare_title() {
        assert!(parse("A Movie").is_none());
        let lenient = StandardReleaseParser::new().parse("A Movie", true).unwrap();
        assert_eq!(lenient.title, "A Movie");
        assert_eq!(lenient.year, None);
        assert_eq!(lenient.quality, Quality::Unknown);
    }

    #[test]
    fn test_empty_and_junk_input() {
        let parser = StandardReleaseParser::new();
        assert!(parser.parse("", true).is_none());
        assert!(parser.parse("   ", true).is_none());
        assert!(parser.parse("...", true).is_none());
    }

    #[test]
    fn test_lenient_parse_of_client_reported_title() {
        // Download clients often report names with no year, which strict
        // parsing rejects but the history-fallback path accepts.
        let parser = StandardReleaseParser::new();
        assert!(parser.parse("a movie", false).is_none());
        assert!(parser.parse("a movie", true).is_some());
    }
}
