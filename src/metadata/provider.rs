//! Trait definition and types for metadata providers.
//!
//! This module defines the [`MetadataProvider`] trait that metadata backends
//! must implement, along with the data types returned by provider queries.

use async_trait::async_trait;

/// A single entry from a provider's movie search.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieResult {
    /// Provider-specific identifier for the movie.
    pub id: u64,
    /// The provider's display title.
    pub title: String,
    /// Release date as an ISO-8601 string (YYYY-MM-DD), if known.
    pub release_date: Option<String>,
}

/// A single entry from a provider's TV search.
#[derive(Debug, Clone, PartialEq)]
pub struct TvResult {
    /// Provider-specific identifier for the show.
    pub id: u64,
    /// The provider's display name for the show.
    pub name: String,
}

/// Detail record for a single episode of a show.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeDetail {
    /// Episode title, if the provider has one.
    pub name: Option<String>,
}

/// Async trait that metadata providers implement.
///
/// Search results are returned in the provider's own relevance order; the
/// resolver takes the first entry and does not second-guess that ranking.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Returns `true` when the provider has been configured with valid
    /// credentials and is ready to serve requests.
    fn is_available(&self) -> bool;

    /// Search for movies matching `title`.
    async fn search_movie(&self, title: &str) -> anyhow::Result<Vec<MovieResult>>;

    /// Search for TV shows matching `title`.
    async fn search_tv(&self, title: &str) -> anyhow::Result<Vec<TvResult>>;

    /// Fetch the detail record for one episode of the show `show_id`.
    async fn episode_detail(
        &self,
        show_id: u64,
        season: u32,
        episode: u32,
    ) -> anyhow::Result<EpisodeDetail>;
}
