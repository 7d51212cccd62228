//! Metadata lookup against external providers.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and the data types providers return.
//! - [`providers`] -- Concrete provider implementations (TMDB).
//! - [`resolver`] -- Turns a classified [`MediaReference`] into resolved,
//!   canonical metadata by querying a provider.
//!
//! [`MediaReference`]: crate::scanner::MediaReference

pub mod provider;
pub mod providers;
pub mod resolver;

pub use provider::{EpisodeDetail, MetadataProvider, MovieResult, TvResult};
pub use resolver::{MetadataResolver, ResolvedMedia};
