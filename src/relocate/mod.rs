//! Moving files into their planned destinations.
//!
//! Before moving, the relocator polls the source until it exists with a
//! non-zero size, tolerating files an upstream copy is still writing. The
//! check is a heuristic: a file that is non-empty but still growing can be
//! moved prematurely, and exhausting the poll budget proceeds anyway rather
//! than aborting.
//!
//! The move itself is a rename, falling back to copy + delete when source
//! and destination are on different filesystems.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RelocateConfig;
use crate::library::DestinationPlan;

/// What to do when a file already occupies the destination path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file.
    #[default]
    Overwrite,
    /// Leave both files where they are.
    Skip,
    /// Report an error and leave the source in place.
    Fail,
}

/// Errors raised while relocating a file.
#[derive(Debug, thiserror::Error)]
pub enum RelocateError {
    #[error("destination already exists: {0:?}")]
    DestinationExists(PathBuf),

    #[error("failed to create destination directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move {from:?} to {to:?}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Moves source files to their planned destination.
pub struct Relocator {
    poll_attempts: u32,
    poll_delay: Duration,
    on_collision: CollisionPolicy,
}

impl Relocator {
    pub fn new(config: &RelocateConfig) -> Self {
        Self {
            poll_attempts: config.poll_attempts.max(1),
            poll_delay: Duration::from_secs(config.poll_delay_secs),
            on_collision: config.on_collision,
        }
    }

    /// Move `source` to the planned destination, creating directories as
    /// needed.
    ///
    /// Returns the destination path, or `Ok(None)` when the collision policy
    /// skipped the move. On any error the source file is left untouched.
    pub async fn relocate(
        &self,
        source: &Path,
        plan: &DestinationPlan,
    ) -> Result<Option<PathBuf>, RelocateError> {
        self.wait_for_stable(source).await;

        std::fs::create_dir_all(&plan.directory).map_err(|e| RelocateError::CreateDir {
            path: plan.directory.clone(),
            source: e,
        })?;

        let destination = plan.full_path();
        if destination.exists() {
            match self.on_collision {
                CollisionPolicy::Overwrite => {
                    debug!("overwriting existing destination: {:?}", destination);
                }
                CollisionPolicy::Skip => {
                    info!("destination already exists, skipping: {:?}", destination);
                    return Ok(None);
                }
                CollisionPolicy::Fail => {
                    return Err(RelocateError::DestinationExists(destination));
                }
            }
        }

        move_file(source, &destination).map_err(|e| RelocateError::Move {
            from: source.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

        Ok(Some(destination))
    }

    /// Poll until the file exists with a non-zero size.
    ///
    /// Returns `false` when the poll budget is exhausted; the caller
    /// proceeds either way.
    pub async fn wait_for_stable(&self, path: &Path) -> bool {
        for attempt in 1..=self.poll_attempts {
            match std::fs::metadata(path) {
                Ok(meta) if meta.len() > 0 => return true,
                Ok(_) => debug!("file still empty (attempt {attempt}): {:?}", path),
                Err(_) => debug!("file not yet present (attempt {attempt}): {:?}", path),
            }
            if attempt < self.poll_attempts {
                tokio::time::sleep(self.poll_delay).await;
            }
        }
        warn!(
            "file did not stabilize after {} checks, proceeding anyway: {:?}",
            self.poll_attempts, path
        );
        false
    }
}

/// Rename, with a copy + delete fallback for cross-filesystem moves.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn relocator(on_collision: CollisionPolicy) -> Relocator {
        Relocator::new(&RelocateConfig {
            poll_attempts: 2,
            poll_delay_secs: 0,
            on_collision,
        })
    }

    fn plan_in(dir: &TempDir) -> DestinationPlan {
        DestinationPlan {
            directory: dir.path().join("Movies").join("A Movie (2020) - [id-1]"),
            file_name: "A Movie (2020) - [id-1].mkv".to_string(),
        }
    }

    #[tokio::test]
    async fn moves_file_and_creates_directories() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.movie.2020.mkv");
        std::fs::write(&source, b"data").unwrap();

        let plan = plan_in(&dir);
        let moved = relocator(CollisionPolicy::Overwrite)
            .relocate(&source, &plan)
            .await
            .unwrap();

        assert_eq!(moved, Some(plan.full_path()));
        assert!(plan.full_path().is_file());
        assert!(!source.exists());
    }

    #[tokio::test]
    async fn overwrite_policy_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.mkv");
        std::fs::write(&source, b"new contents").unwrap();

        let plan = plan_in(&dir);
        std::fs::create_dir_all(&plan.directory).unwrap();
        std::fs::write(plan.full_path(), b"old").unwrap();

        let moved = relocator(CollisionPolicy::Overwrite)
            .relocate(&source, &plan)
            .await
            .unwrap();

        assert_eq!(moved, Some(plan.full_path()));
        assert_eq!(std::fs::read(plan.full_path()).unwrap(), b"new contents");
        assert!(!source.exists());
    }

    #[tokio::test]
    async fn skip_policy_leaves_both_files() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.mkv");
        std::fs::write(&source, b"new").unwrap();

        let plan = plan_in(&dir);
        std::fs::create_dir_all(&plan.directory).unwrap();
        std::fs::write(plan.full_path(), b"old").unwrap();

        let moved = relocator(CollisionPolicy::Skip)
            .relocate(&source, &plan)
            .await
            .unwrap();

        assert_eq!(moved, None);
        assert!(source.exists());
        assert_eq!(std::fs::read(plan.full_path()).unwrap(), b"old");
    }

    #[tokio::test]
    async fn fail_policy_reports_collision() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.mkv");
        std::fs::write(&source, b"new").unwrap();

        let plan = plan_in(&dir);
        std::fs::create_dir_all(&plan.directory).unwrap();
        std::fs::write(plan.full_path(), b"old").unwrap();

        let err = relocator(CollisionPolicy::Fail)
            .relocate(&source, &plan)
            .await
            .unwrap_err();

        assert_matches!(err, RelocateError::DestinationExists(_));
        assert!(source.exists());
    }

    #[tokio::test]
    async fn empty_file_is_moved_after_poll_budget() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("still-copying.mkv");
        std::fs::write(&source, b"").unwrap();

        let plan = plan_in(&dir);
        let moved = relocator(CollisionPolicy::Overwrite)
            .relocate(&source, &plan)
            .await
            .unwrap();

        assert_eq!(moved, Some(plan.full_path()));
        assert!(!source.exists());
    }

    #[tokio::test]
    async fn stability_poll_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("never-arrives.mkv");
        assert!(!relocator(CollisionPolicy::Overwrite).wait_for_stable(&missing).await);
    }

    #[tokio::test]
    async fn stability_poll_accepts_nonempty_file() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("ready.mkv");
        std::fs::write(&present, b"bytes").unwrap();
        assert!(relocator(CollisionPolicy::Overwrite).wait_for_stable(&present).await);
    }
}
