mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    let config = apply_env_overrides(config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./reelsort.toml",
        "~/.config/reelsort/config.toml",
        "/etc/reelsort/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let config = apply_env_overrides(Config::default());
    validate_config(&config)?;
    Ok(config)
}

/// The API credential is usually supplied out of band rather than written
/// into the config file.
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(key) = std::env::var("TMDB_API_KEY") {
        if !key.is_empty() {
            config.tmdb.api_key = key;
        }
    }
    config
}

/// Validate configuration.
fn validate_config(config: &Config) -> Result<()> {
    if config.relocate.poll_attempts == 0 {
        anyhow::bail!("relocate.poll_attempts must be at least 1");
    }

    if !config.watch.input_dir.exists() {
        tracing::warn!(
            "Watch input directory does not exist: {:?}",
            config.watch.input_dir
        );
    }

    for dir in [&config.library.movies_dir, &config.library.series_dir] {
        if !dir.exists() {
            tracing::warn!("Library directory does not exist yet: {:?}", dir);
        }
    }

    Ok(())
}
