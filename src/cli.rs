use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelsort")]
#[command(author, version, about = "Watch-folder media organizer")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the input folder, then watch it for new files
    Watch,

    /// Process a single file through the pipeline
    Run {
        /// Input file to process
        #[arg(required = true)]
        input: PathBuf,

        /// Show the planned move without executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Classify a filename and print the result
    Classify {
        /// Filename to classify (extension included)
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
