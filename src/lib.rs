//! Reelsort - watch-folder media organizer
//!
//! Watches a directory for newly arrived video files, classifies each
//! filename as a movie or TV episode, resolves the guess against TMDB, and
//! moves the file into a media-server library layout.

pub mod config;
pub mod library;
pub mod metadata;
pub mod organize;
pub mod relocate;
pub mod scanner;
pub mod watch;
