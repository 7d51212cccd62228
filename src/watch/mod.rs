//! Directory watching for incoming video files.
//!
//! The watcher monitors the configured input directory (non-recursively)
//! and forwards each new or modified video file once it has settled, i.e.
//! stopped changing for the configured window. Consumers receive settled
//! paths over a channel and are responsible for sequencing the work.

pub mod settle;

pub use settle::FileSettleTracker;

use crate::config::WatchConfig;
use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// File watcher that feeds settled video files to a channel.
pub struct FileWatcher {
    config: WatchConfig,
    watcher: Option<RecommendedWatcher>,
}

impl FileWatcher {
    pub fn new(config: WatchConfig) -> Self {
        Self {
            config,
            watcher: None,
        }
    }

    /// Start watching the input directory.
    ///
    /// Returns the receiver of settled file paths. The watcher stops when
    /// this `FileWatcher` is dropped.
    pub fn start(&mut self) -> Result<mpsc::Receiver<PathBuf>> {
        let (event_tx, mut event_rx) = mpsc::channel::<PathBuf>(100);
        let (settled_tx, settled_rx) = mpsc::channel::<PathBuf>(100);

        let mut settle_tracker = FileSettleTracker::new(
            Duration::from_secs(self.config.settle_time_secs),
            settled_tx,
        );

        let extensions = self.config.extensions.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    // Only care about creates and modifications
                    if event.kind.is_create() || event.kind.is_modify() {
                        for path in event.paths {
                            if is_video_file(&path, &extensions) {
                                let _ = event_tx.blocking_send(path);
                            }
                        }
                    }
                }
            },
            NotifyConfig::default(),
        )
        .context("Failed to create file watcher")?;

        let input_dir = &self.config.input_dir;
        watcher
            .watch(input_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch path: {:?}", input_dir))?;
        tracing::info!("Watching directory: {:?}", input_dir);

        self.watcher = Some(watcher);

        // Bridge raw events into the settle tracker and periodically flush
        // settled files to the consumer.
        tokio::spawn(async move {
            let mut check_interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                tokio::select! {
                    maybe_path = event_rx.recv() => match maybe_path {
                        Some(path) => {
                            tracing::debug!("File event: {:?}", path);
                            settle_tracker.file_changed(path);
                        }
                        None => break,
                    },

                    _ = check_interval.tick() => {
                        settle_tracker.check_settled().await;
                    }
                }
            }
        });

        Ok(settled_rx)
    }

    /// Stop watching.
    pub fn stop(&mut self) {
        self.watcher = None;
        tracing::info!("File watcher stopped");
    }
}

/// Check if a file has a video extension.
pub fn is_video_file(path: &Path, extensions: &[String]) -> bool {
    if let Some(ext) = path.extension() {
        let ext_str = ext.to_string_lossy().to_lowercase();

        if extensions.is_empty() {
            let default_exts = ["mp4", "mkv", "avi", "mov", "flv", "wmv", "m4v", "ts", "webm"];
            return default_exts.contains(&ext_str.as_str());
        }

        return extensions.iter().any(|e| e.to_lowercase() == ext_str);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_extension_list_is_case_insensitive() {
        assert!(is_video_file(Path::new("/in/a.mkv"), &[]));
        assert!(is_video_file(Path::new("/in/a.MKV"), &[]));
        assert!(is_video_file(Path::new("/in/a.mp4"), &[]));
        assert!(!is_video_file(Path::new("/in/a.srt"), &[]));
        assert!(!is_video_file(Path::new("/in/noext"), &[]));
    }

    #[test]
    fn configured_extensions_replace_the_default_list() {
        let exts = vec!["mkv".to_string()];
        assert!(is_video_file(Path::new("/in/a.mkv"), &exts));
        assert!(!is_video_file(Path::new("/in/a.mp4"), &exts));
    }
}
