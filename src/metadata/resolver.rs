//! Resolution of classified filenames against a metadata provider.
//!
//! The resolver trusts the provider's relevance ranking: the first search
//! result is the match. A movie costs one provider call; an episode costs
//! two (show search, then episode detail). Show-search failure is terminal
//! for the file, episode-detail failure only degrades the episode title.

use std::sync::Arc;

use tracing::debug;

use crate::metadata::provider::MetadataProvider;
use crate::scanner::{MediaKind, MediaReference};

/// Canonical metadata for a classified file, ready for path planning.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedMedia {
    Movie {
        /// The provider's canonical title.
        title: String,
        /// Four-digit release year, `"0000"` when unknown.
        year: String,
        provider_id: u64,
    },
    Episode {
        /// The provider's canonical show title.
        show_title: String,
        /// Show-level provider identifier.
        provider_id: u64,
        season: u32,
        episode: u32,
        /// Episode title from the detail lookup, or `Ep<n>` when that
        /// lookup yields nothing.
        episode_title: String,
    },
}

/// Resolves [`MediaReference`]s through a [`MetadataProvider`].
pub struct MetadataResolver {
    provider: Arc<dyn MetadataProvider>,
}

impl MetadataResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Resolve a reference to canonical metadata.
    ///
    /// Returns `Ok(None)` when the provider has no match for the title.
    /// Errors are provider transport failures; per the error model the
    /// caller treats them the same as a missing match.
    pub async fn resolve(&self, reference: &MediaReference) -> anyhow::Result<Option<ResolvedMedia>> {
        match reference.kind {
            MediaKind::Movie => self.resolve_movie(&reference.title).await,
            MediaKind::Episode { season, episode } => {
                self.resolve_episode(&reference.title, season, episode).await
            }
        }
    }

    async fn resolve_movie(&self, title: &str) -> anyhow::Result<Option<ResolvedMedia>> {
        let mut results = self.provider.search_movie(title).await?;
        if results.is_empty() {
            return Ok(None);
        }
        let first = results.remove(0);
        debug!(
            provider = self.provider.name(),
            id = first.id,
            title = %first.title,
            "movie match"
        );
        Ok(Some(ResolvedMedia::Movie {
            year: release_year(first.release_date.as_deref()),
            title: first.title,
            provider_id: first.id,
        }))
    }

    async fn resolve_episode(
        &self,
        title: &str,
        season: u32,
        episode: u32,
    ) -> anyhow::Result<Option<ResolvedMedia>> {
        let mut shows = self.provider.search_tv(title).await?;
        if shows.is_empty() {
            return Ok(None);
        }
        let show = shows.remove(0);
        debug!(
            provider = self.provider.name(),
            id = show.id,
            show = %show.name,
            "show match"
        );

        let episode_title = match self.provider.episode_detail(show.id, season, episode).await {
            Ok(detail) => match detail.name {
                Some(name) if !name.is_empty() => name,
                _ => fallback_episode_title(episode),
            },
            Err(e) => {
                debug!(
                    show = %show.name,
                    season,
                    episode,
                    "episode detail lookup failed, synthesizing title: {e:#}"
                );
                fallback_episode_title(episode)
            }
        };

        Ok(Some(ResolvedMedia::Episode {
            show_title: show.name,
            provider_id: show.id,
            season,
            episode,
            episode_title,
        }))
    }
}

/// Synthesized episode title when the detail lookup yields none. The number
/// keeps its natural width: episode 7 becomes `Ep7`.
fn fallback_episode_title(episode: u32) -> String {
    format!("Ep{episode}")
}

/// First four characters of a release date, `"0000"` when absent or malformed.
fn release_year(date: Option<&str>) -> String {
    date.and_then(|d| d.get(..4))
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
        .unwrap_or_else(|| "0000".to_string())
}
