use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Tracks files and determines when they've "settled" (stopped changing).
///
/// Copies in progress emit a stream of modify events; a file is only
/// forwarded once no event has been seen for the settle window.
pub struct FileSettleTracker {
    /// Map of file path to the time of its last observed change.
    pending: HashMap<PathBuf, Instant>,
    settle_window: Duration,
    settled_tx: mpsc::Sender<PathBuf>,
}

impl FileSettleTracker {
    pub fn new(settle_window: Duration, settled_tx: mpsc::Sender<PathBuf>) -> Self {
        Self {
            pending: HashMap::new(),
            settle_window,
            settled_tx,
        }
    }

    /// Record that a file was created or modified.
    pub fn file_changed(&mut self, path: PathBuf) {
        self.pending.insert(path, Instant::now());
    }

    /// Forward every file whose settle window has elapsed.
    pub async fn check_settled(&mut self) {
        let now = Instant::now();
        let settled: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, last_change)| now.duration_since(**last_change) >= self.settle_window)
            .map(|(path, _)| path.clone())
            .collect();

        for path in settled {
            self.pending.remove(&path);
            if let Err(e) = self.settled_tx.send(path.clone()).await {
                tracing::error!("Failed to send settled file: {}", e);
            } else {
                tracing::info!("File settled: {:?}", path);
            }
        }
    }

    /// Number of files still waiting to settle.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_settles_after_window_elapses() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut tracker = FileSettleTracker::new(Duration::ZERO, tx);

        tracker.file_changed(PathBuf::from("/in/a.mkv"));
        assert_eq!(tracker.pending_len(), 1);

        tracker.check_settled().await;
        assert_eq!(tracker.pending_len(), 0);
        assert_eq!(rx.recv().await, Some(PathBuf::from("/in/a.mkv")));
    }

    #[tokio::test]
    async fn unsettled_file_is_held_back() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut tracker = FileSettleTracker::new(Duration::from_secs(3600), tx);

        tracker.file_changed(PathBuf::from("/in/b.mkv"));
        tracker.check_settled().await;

        assert_eq!(tracker.pending_len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn new_event_resets_the_clock() {
        let (tx, _rx) = mpsc::channel(8);
        let mut tracker = FileSettleTracker::new(Duration::from_secs(3600), tx);

        tracker.file_changed(PathBuf::from("/in/c.mkv"));
        tracker.file_changed(PathBuf::from("/in/c.mkv"));
        assert_eq!(tracker.pending_len(), 1);
    }
}
