//! TMDB (The Movie Database) metadata provider.
//!
//! Implements [`MetadataProvider`] by querying the TMDB v3 REST API:
//! free-text movie and TV search plus per-episode detail lookup. Requests
//! carry the API key as a query parameter and use a 30-second timeout.
//! There is no caching and no retry; a failed request surfaces as an error
//! for the resolver to handle.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::metadata::provider::{EpisodeDetail, MetadataProvider, MovieResult, TvResult};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieSearchResult {
    id: u64,
    title: Option<String>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvSearchResult {
    id: u64,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbEpisodeDetail {
    name: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB metadata provider.
///
/// # Examples
///
/// ```no_run
/// use reelsort::metadata::providers::TmdbProvider;
///
/// let provider = TmdbProvider::new("your-api-key".into(), "en-US".into());
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    api_key: String,
    language: String,
    base_url: String,
}

impl TmdbProvider {
    /// Create a new TMDB provider with the given API key and language.
    ///
    /// The `language` parameter should be an ISO-639-1 language tag such as
    /// `"en-US"`.
    pub fn new(api_key: String, language: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            api_key,
            language,
            base_url: TMDB_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Execute a GET request and fail on non-success status codes.
    async fn get(&self, url: &str) -> anyhow::Result<reqwest::Response> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("TMDB request failed: {url}"))?;

        resp.error_for_status()
            .with_context(|| format!("TMDB request returned error: {url}"))
    }

    /// Build a full API URL with the API key and language query parameters.
    fn url(&self, path: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}{path}?api_key={}&language={}",
            self.base_url, self.api_key, self.language
        );
        for (key, value) in extra_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoded(value));
        }
        url
    }
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";

#[async_trait]
impl MetadataProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search_movie(&self, title: &str) -> anyhow::Result<Vec<MovieResult>> {
        let url = self.url("/search/movie", &[("query", title)]);
        debug!(url = %url, "TMDB search movie");

        let body: TmdbSearchResponse<TmdbMovieSearchResult> = self
            .get(&url)
            .await?
            .json()
            .await
            .context("failed to parse TMDB movie search response")?;

        Ok(body
            .results
            .into_iter()
            .map(|r| MovieResult {
                id: r.id,
                title: r.title.unwrap_or_default(),
                release_date: r.release_date,
            })
            .collect())
    }

    async fn search_tv(&self, title: &str) -> anyhow::Result<Vec<TvResult>> {
        let url = self.url("/search/tv", &[("query", title)]);
        debug!(url = %url, "TMDB search TV");

        let body: TmdbSearchResponse<TmdbTvSearchResult> = self
            .get(&url)
            .await?
            .json()
            .await
            .context("failed to parse TMDB TV search response")?;

        Ok(body
            .results
            .into_iter()
            .map(|r| TvResult {
                id: r.id,
                name: r.name.unwrap_or_default(),
            })
            .collect())
    }

    async fn episode_detail(
        &self,
        show_id: u64,
        season: u32,
        episode: u32,
    ) -> anyhow::Result<EpisodeDetail> {
        let url = self.url(&format!("/tv/{show_id}/season/{season}/episode/{episode}"), &[]);
        debug!(url = %url, "TMDB episode detail");

        let detail: TmdbEpisodeDetail = self
            .get(&url)
            .await?
            .json()
            .await
            .context("failed to parse TMDB episode detail response")?;

        Ok(EpisodeDetail { name: detail.name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_includes_credentials_and_query() {
        let provider = TmdbProvider::new("key123".into(), "en-US".into());
        let url = provider.url("/search/movie", &[("query", "Some Movie")]);
        assert_eq!(
            url,
            "https://api.themoviedb.org/3/search/movie?api_key=key123&language=en-US&query=Some%20Movie"
        );
    }

    #[test]
    fn base_url_override_trims_trailing_slash() {
        let provider =
            TmdbProvider::new("k".into(), "en-US".into()).with_base_url("http://localhost:9999/");
        let url = provider.url("/search/tv", &[("query", "x")]);
        assert!(url.starts_with("http://localhost:9999/search/tv?"));
    }

    #[test]
    fn url_encoding() {
        assert_eq!(urlencoded("hello world"), "hello%20world");
        assert_eq!(urlencoded("foo&bar"), "foo%26bar");
        assert_eq!(urlencoded("simple"), "simple");
        assert_eq!(urlencoded("name.with-safe_chars~"), "name.with-safe_chars~");
    }

    #[test]
    fn provider_is_available() {
        let provider = TmdbProvider::new("test-key".into(), "en-US".into());
        assert!(provider.is_available());

        let empty = TmdbProvider::new(String::new(), "en-US".into());
        assert!(!empty.is_available());
    }

    #[test]
    fn provider_name() {
        let provider = TmdbProvider::new("key".into(), "en-US".into());
        assert_eq!(provider.name(), "tmdb");
    }
}
