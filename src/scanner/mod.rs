//! Filename scanning and classification.
//!
//! This module turns raw video filenames into structured media references
//! that the metadata resolver can act on. Classification is purely lexical;
//! it never touches the filesystem or the network.

pub mod classifier;

pub use classifier::{classify, MediaKind, MediaReference};
