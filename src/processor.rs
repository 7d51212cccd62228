use anyhow::Result;
use std::path::Path;

use reelsort::config::Config;
use reelsort::organize::Organizer;
use reelsort::watch::{is_video_file, FileWatcher};

/// Scan the input directory once, then process files as the watcher reports
/// them settled. Files are handled strictly one at a time; the next settled
/// path waits in the channel until the current pipeline run finishes.
pub async fn run(config: Config) -> Result<()> {
    let organizer = Organizer::from_config(&config);

    initial_scan(&config, &organizer).await;

    let mut watcher = FileWatcher::new(config.watch.clone());
    let mut settled = watcher.start()?;

    tracing::info!(
        "Startup complete, waiting for new files in {:?}",
        config.watch.input_dir
    );

    loop {
        tokio::select! {
            maybe_path = settled.recv() => match maybe_path {
                Some(path) => handle_file(&organizer, &path).await,
                None => break,
            },

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                break;
            }
        }
    }

    watcher.stop();
    Ok(())
}

/// Process files already sitting in the input directory at startup.
async fn initial_scan(config: &Config, organizer: &Organizer) {
    let input_dir = &config.watch.input_dir;
    if !input_dir.is_dir() {
        tracing::warn!(
            "Input directory does not exist, skipping initial scan: {:?}",
            input_dir
        );
        return;
    }

    tracing::info!("Scanning input directory: {:?}", input_dir);

    let entries = match std::fs::read_dir(input_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to read input directory {:?}: {}", input_dir, e);
            return;
        }
    };

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_video_file(path, &config.watch.extensions))
        .collect();
    paths.sort();

    for path in paths {
        handle_file(organizer, &path).await;
    }

    tracing::info!("Initial scan complete");
}

/// The organizer logs its own outcomes; only real failures are reported
/// here, and none of them stop the loop.
async fn handle_file(organizer: &Organizer, path: &Path) {
    if let Err(e) = organizer.process(path).await {
        tracing::error!("Failed to process {:?}: {e:#}", path);
    }
}
