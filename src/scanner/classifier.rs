//! Filename classification.
//!
//! Decides whether a filename names a TV episode or a movie and extracts the
//! raw title plus season/episode numbers. Two episode shapes are recognized:
//!
//! - A `S01E02`-style token (case-insensitive, 1-2 digits each).
//! - A standalone 1-3 digit number flanked by separators, the common anime
//!   numbering style (`Show - 02`).
//!
//! Bracketed release tags (`[SubGroup]`, `[1080p]`) are stripped before
//! detection so they cannot fake or mask an episode token, but title
//! extraction always runs against the original name. Classification cannot
//! fail; anything that matches neither shape is a movie.

use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

/// What kind of media a filename refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Episode { season: u32, episode: u32 },
}

/// Structured reference parsed from a filename.
///
/// `title` is the raw parsed title with `.`/`_` normalized to spaces and
/// surrounding whitespace trimmed. It is never empty: when no episode
/// pattern matches, the whole normalized stem is the title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaReference {
    pub title: String,
    #[serde(flatten)]
    pub kind: MediaKind,
}

// Detection runs against the bracket-stripped name, extraction against the
// original stem. The capture regexes are greedy so the last matching token
// wins, mirroring how release names put the episode marker after the title.
static BRACKET_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static SEASON_EPISODE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)s\d{1,2}e\d{1,2}").unwrap());
static SEASON_EPISODE_CAPTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(.+)[. _-]s(\d{1,2})e(\d{1,2})").unwrap());
static BARE_NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_ ]\d{1,3}([-_ ]|$)").unwrap());
static BARE_NUMBER_CAPTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+)[-_ ](\d{1,3})([-_ ]|$)").unwrap());

/// Classify a filename into a [`MediaReference`].
///
/// The extension (final `.xxx` component) is stripped before matching.
/// Always returns a result; movie is the fallback.
pub fn classify(filename: &str) -> MediaReference {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let detectable = BRACKET_TAG.replace_all(stem, "");

    if SEASON_EPISODE_TOKEN.is_match(&detectable) {
        if let Some(reference) = extract_season_episode(stem) {
            return reference;
        }
    }

    if BARE_NUMBER_TOKEN.is_match(&detectable) {
        if let Some(reference) = extract_bare_number(stem) {
            return reference;
        }
    }

    MediaReference {
        title: title_or_stem(String::new(), stem),
        kind: MediaKind::Movie,
    }
}

fn extract_season_episode(stem: &str) -> Option<MediaReference> {
    let caps = SEASON_EPISODE_CAPTURE.captures(stem)?;
    let season: u32 = caps[2].parse().ok()?;
    let episode: u32 = caps[3].parse().ok()?;
    if season == 0 || episode == 0 {
        return None;
    }
    Some(MediaReference {
        title: title_or_stem(normalize_title(&caps[1]), stem),
        kind: MediaKind::Episode { season, episode },
    })
}

/// Anime-style numbering carries no season token; season defaults to 1.
fn extract_bare_number(stem: &str) -> Option<MediaReference> {
    let caps = BARE_NUMBER_CAPTURE.captures(stem)?;
    let episode: u32 = caps[2].parse().ok()?;
    if episode == 0 {
        return None;
    }
    Some(MediaReference {
        title: title_or_stem(normalize_title(&caps[1]), stem),
        kind: MediaKind::Episode { season: 1, episode },
    })
}

/// Replace `.`/`_` separators with spaces, trim, and drop any separator
/// characters the capture left dangling at the end of the raw title.
fn normalize_title(raw: &str) -> String {
    raw.trim_end_matches(['.', '_', '-', ' '])
        .replace(['.', '_'], " ")
        .trim()
        .to_string()
}

/// `title` must never be empty; fall back to the normalized stem, then the
/// stem itself.
fn title_or_stem(candidate: String, stem: &str) -> String {
    if !candidate.is_empty() {
        return candidate;
    }
    let normalized = normalize_title(stem);
    if normalized.is_empty() {
        stem.to_string()
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_episode_token() {
        let r = classify("Show.Name.S01E02.mkv");
        assert_eq!(r.title, "Show Name");
        assert_eq!(
            r.kind,
            MediaKind::Episode {
                season: 1,
                episode: 2
            }
        );
    }

    #[test]
    fn episode_token_is_case_insensitive() {
        let r = classify("show.name.s01e02.mkv");
        assert_eq!(r.title, "show name");
        assert_eq!(
            r.kind,
            MediaKind::Episode {
                season: 1,
                episode: 2
            }
        );
    }

    #[test]
    fn single_digit_season_and_episode() {
        let r = classify("Show_Name_S1E2.avi");
        assert_eq!(r.title, "Show Name");
        assert_eq!(
            r.kind,
            MediaKind::Episode {
                season: 1,
                episode: 2
            }
        );
    }

    #[test]
    fn hyphen_separated_episode_drops_trailing_separator() {
        let r = classify("Show Name - S03E11.mkv");
        assert_eq!(r.title, "Show Name");
        assert_eq!(
            r.kind,
            MediaKind::Episode {
                season: 3,
                episode: 11
            }
        );
    }

    #[test]
    fn anime_numbering_defaults_to_season_one() {
        let r = classify("Unknown Show - 02.mkv");
        assert_eq!(r.title, "Unknown Show");
        assert_eq!(
            r.kind,
            MediaKind::Episode {
                season: 1,
                episode: 2
            }
        );
    }

    #[test]
    fn bracket_tags_only_affect_detection() {
        // The [1080p] tag would otherwise hide the trailing number from the
        // bare-number rule; the title still comes from the unstripped name.
        let r = classify("[SubGroup] Anime Title - 05 [1080p].mkv");
        assert_eq!(r.title, "[SubGroup] Anime Title");
        assert_eq!(
            r.kind,
            MediaKind::Episode {
                season: 1,
                episode: 5
            }
        );
    }

    #[test]
    fn movie_with_dotted_name() {
        let r = classify("Some.Movie.2020.mp4");
        assert_eq!(r.title, "Some Movie 2020");
        assert_eq!(r.kind, MediaKind::Movie);
    }

    #[test]
    fn four_digit_year_is_not_an_episode_number() {
        let r = classify("Blade Runner 2049.mkv");
        assert_eq!(r.title, "Blade Runner 2049");
        assert_eq!(r.kind, MediaKind::Movie);
    }

    #[test]
    fn filename_without_separators() {
        let r = classify("inception.mkv");
        assert_eq!(r.title, "inception");
        assert_eq!(r.kind, MediaKind::Movie);
    }

    #[test]
    fn title_falls_back_to_stem_when_nothing_precedes_the_token() {
        // Detection sees an episode token but there is no title to extract,
        // so the movie fallback keeps the whole stem as the title.
        let r = classify("S01E02.mkv");
        assert_eq!(r.title, "S01E02");
        assert_eq!(r.kind, MediaKind::Movie);
    }

    #[test]
    fn zero_season_is_not_a_valid_episode_token() {
        let r = classify("Specials.S00E03.mkv");
        assert_eq!(r.kind, MediaKind::Movie);
        assert_eq!(r.title, "Specials S00E03");
    }

    #[test]
    fn last_episode_token_wins() {
        let r = classify("Show.S01E01.S02E03.mkv");
        assert_eq!(r.title, "Show S01E01");
        assert_eq!(
            r.kind,
            MediaKind::Episode {
                season: 2,
                episode: 3
            }
        );
    }

    #[test]
    fn season_episode_rule_takes_priority_over_bare_number() {
        let r = classify("Show 5 - S02E04.mkv");
        assert_eq!(r.title, "Show 5");
        assert_eq!(
            r.kind,
            MediaKind::Episode {
                season: 2,
                episode: 4
            }
        );
    }

    #[test]
    fn classification_is_deterministic() {
        let a = classify("Show.Name.S01E02.mkv");
        let b = classify("Show.Name.S01E02.mkv");
        assert_eq!(a, b);
    }
}
