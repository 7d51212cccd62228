use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::relocate::CollisionPolicy;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,

    #[serde(default)]
    pub relocate: RelocateConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Root directories files are organized into.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    #[serde(default = "default_movies_dir")]
    pub movies_dir: PathBuf,

    #[serde(default = "default_series_dir")]
    pub series_dir: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            movies_dir: default_movies_dir(),
            series_dir: default_series_dir(),
        }
    }
}

fn default_movies_dir() -> PathBuf {
    PathBuf::from("./library/Movies")
}
fn default_series_dir() -> PathBuf {
    PathBuf::from("./library/Series")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    /// Directory watched (non-recursively) for incoming files.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Extensions treated as video files; empty means the built-in list.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// How long a file must stop changing before it is processed.
    #[serde(default = "default_settle_time")]
    pub settle_time_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            extensions: Vec::new(),
            settle_time_secs: default_settle_time(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("./incoming")
}
fn default_settle_time() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// API key; the `TMDB_API_KEY` environment variable overrides this.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// API root; only tests should need to change this.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: default_language(),
            base_url: default_base_url(),
        }
    }
}

fn default_language() -> String {
    "en-US".to_string()
}
fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelocateConfig {
    /// Size-stability checks before moving a file.
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    /// Pause between stability checks.
    #[serde(default = "default_poll_delay")]
    pub poll_delay_secs: u64,

    #[serde(default)]
    pub on_collision: CollisionPolicy,
}

impl Default for RelocateConfig {
    fn default() -> Self {
        Self {
            poll_attempts: default_poll_attempts(),
            poll_delay_secs: default_poll_delay(),
            on_collision: CollisionPolicy::default(),
        }
    }
}

fn default_poll_attempts() -> u32 {
    5
}
fn default_poll_delay() -> u64 {
    2
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LogConfig {
    /// Log file path; unset means console only.
    #[serde(default)]
    pub file: Option<PathBuf>,
}
