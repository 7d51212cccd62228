//! The per-file pipeline: classify, resolve, plan, relocate.
//!
//! One [`Organizer`] is built at startup from the loaded config and handles
//! every file the same way. Runs are independent: nothing is cached or
//! shared between files, and a failure only affects the file it happened to.
//!
//! Error semantics follow the per-file model: a missing provider match and
//! an unreachable provider are both logged as warnings and leave the file in
//! place; only relocation I/O failures surface as errors to the caller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::library::{DestinationPlan, LibraryLayout};
use crate::metadata::providers::TmdbProvider;
use crate::metadata::{MetadataProvider, MetadataResolver, ResolvedMedia};
use crate::relocate::Relocator;
use crate::scanner::{classify, MediaReference};

/// What happened to a processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file was moved to this destination.
    Moved(PathBuf),
    /// The provider had no match (or was unreachable); file left in place.
    NoMatch,
    /// The collision policy skipped the move; file left in place.
    SkippedExisting(PathBuf),
}

/// A fully resolved move, ready to execute.
#[derive(Debug, Clone)]
pub struct PlannedMove {
    pub reference: MediaReference,
    pub resolved: ResolvedMedia,
    pub destination: DestinationPlan,
}

/// Runs the classify/resolve/plan/relocate pipeline for single files.
pub struct Organizer {
    layout: LibraryLayout,
    resolver: MetadataResolver,
    relocator: Relocator,
}

impl Organizer {
    /// Build an organizer backed by the TMDB provider from `config`.
    pub fn from_config(config: &Config) -> Self {
        let provider = TmdbProvider::new(
            config.tmdb.api_key.clone(),
            config.tmdb.language.clone(),
        )
        .with_base_url(config.tmdb.base_url.clone());

        Self::with_provider(config, Arc::new(provider))
    }

    /// Build an organizer with an explicit provider.
    pub fn with_provider(config: &Config, provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            layout: LibraryLayout::new(
                config.library.movies_dir.clone(),
                config.library.series_dir.clone(),
            ),
            resolver: MetadataResolver::new(provider),
            relocator: Relocator::new(&config.relocate),
        }
    }

    /// Classify, resolve, and plan a move without touching the filesystem.
    ///
    /// Returns `Ok(None)` when the provider has no match for the file.
    pub async fn plan_move(&self, source: &Path) -> Result<Option<PlannedMove>> {
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("source has no usable file name: {:?}", source))?;

        let reference = classify(file_name);
        debug!("classified {:?} as {:?}", file_name, reference);

        let Some(resolved) = self.resolver.resolve(&reference).await? else {
            return Ok(None);
        };

        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let destination = self.layout.plan(&resolved, &extension);

        Ok(Some(PlannedMove {
            reference,
            resolved,
            destination,
        }))
    }

    /// Run the full pipeline for one file.
    pub async fn process(&self, source: &Path) -> Result<Outcome> {
        info!("Processing file: {:?}", source);

        let planned = match self.plan_move(source).await {
            Ok(Some(planned)) => planned,
            Ok(None) => {
                warn!("No provider match for {:?}, leaving in place", source);
                return Ok(Outcome::NoMatch);
            }
            Err(e) => {
                warn!("Metadata lookup failed for {:?}: {e:#}", source);
                return Ok(Outcome::NoMatch);
            }
        };

        match self.relocator.relocate(source, &planned.destination).await? {
            Some(destination) => {
                info!("Moved {:?} -> {:?}", source, destination);
                Ok(Outcome::Moved(destination))
            }
            None => Ok(Outcome::SkippedExisting(planned.destination.full_path())),
        }
    }
}
