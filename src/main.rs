mod cli;
mod processor;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

use reelsort::config::{self, Config};
use reelsort::organize::{Organizer, Outcome};
use reelsort::scanner::{classify, MediaKind};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            init_logging(cli.verbose, config.log.file.as_deref());
            ensure_api_key(&config)?;

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(processor::run(config))
        }
        Commands::Run { input, dry_run } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            init_logging(cli.verbose, config.log.file.as_deref());
            ensure_api_key(&config)?;

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_file(&config, &input, dry_run))
        }
        Commands::Classify { name, json } => {
            init_logging(cli.verbose, None);
            classify_name(&name, json)
        }
        Commands::Validate {
            config: config_path,
        } => {
            init_logging(cli.verbose, None);
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("reelsort {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize logging to the console and, when configured, a log file.
///
/// Respects RUST_LOG if set, otherwise picks a default based on the verbose
/// flag. A log file that cannot be opened downgrades to console-only.
fn init_logging(verbose: bool, log_file: Option<&Path>) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "reelsort=debug".to_string()
        } else {
            "reelsort=info".to_string()
        }
    });

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::new(&env_filter))
        .with(fmt::layer());

    match log_file.map(open_log_file) {
        Some(Ok(file)) => {
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
                .init();
        }
        Some(Err(e)) => {
            registry.init();
            tracing::warn!("Failed to open log file, logging to console only: {e:#}");
        }
        None => registry.init(),
    }
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {:?}", parent))?;
        }
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {:?}", path))
}

fn ensure_api_key(config: &Config) -> Result<()> {
    if config.tmdb.api_key.is_empty() {
        anyhow::bail!(
            "No TMDB API key configured; set tmdb.api_key in the config file \
             or the TMDB_API_KEY environment variable"
        );
    }
    Ok(())
}

async fn run_file(config: &Config, input: &Path, dry_run: bool) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let organizer = Organizer::from_config(config);

    if dry_run {
        match organizer.plan_move(input).await? {
            Some(planned) => {
                println!("Classified: {}", describe(&planned.reference.title, planned.reference.kind));
                println!("Destination: {}", planned.destination.full_path().display());
                println!("\n[DRY RUN] No files were moved");
            }
            None => println!("No provider match; file would be left in place"),
        }
        return Ok(());
    }

    match organizer.process(input).await? {
        Outcome::Moved(destination) => println!("Moved to {}", destination.display()),
        Outcome::NoMatch => println!("No provider match; file left in place"),
        Outcome::SkippedExisting(destination) => {
            println!("Destination already exists, skipped: {}", destination.display())
        }
    }
    Ok(())
}

fn classify_name(name: &str, json: bool) -> Result<()> {
    let reference = classify(name);

    if json {
        println!("{}", serde_json::to_string_pretty(&reference)?);
    } else {
        println!("{}", describe(&reference.title, reference.kind));
    }
    Ok(())
}

fn describe(title: &str, kind: MediaKind) -> String {
    match kind {
        MediaKind::Movie => format!("Movie: {title}"),
        MediaKind::Episode { season, episode } => {
            format!("Episode: {title} S{season:02}E{episode:02}")
        }
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Input dir: {:?}", config.watch.input_dir);
    println!("  Movies dir: {:?}", config.library.movies_dir);
    println!("  Series dir: {:?}", config.library.series_dir);
    println!("  Settle time: {}s", config.watch.settle_time_secs);
    println!(
        "  Extensions: {}",
        if config.watch.extensions.is_empty() {
            "(default list)".to_string()
        } else {
            config.watch.extensions.join(", ")
        }
    );
    println!(
        "  TMDB API key: {}",
        if config.tmdb.api_key.is_empty() {
            "not set"
        } else {
            "set"
        }
    );
    println!("  On collision: {:?}", config.relocate.on_collision);

    Ok(())
}
