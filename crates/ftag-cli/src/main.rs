//! ftag CLI
//!
//! Tag files and find them again:
//! - `ftag add <path> -t <tag>...` records tags for a path in the sidecar
//! - `ftag query <tag>` lists every tagged path carrying `<tag>`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use ftag_index::{FsBlobStore, Record};
use std::path::PathBuf;

mod settings;

use settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "ftag")]
#[command(author, version, about = "ftag: tag files, query them by tag")]
struct Cli {
    /// Use a non-default ftag index file
    #[arg(
        short = 'f',
        long = "file",
        env = "FTAG_FILE",
        default_value = ftag_index::DEFAULT_INDEX_FILE,
        global = true
    )]
    file: PathBuf,

    /// Log debug output to stderr (overrides `RUST_LOG`)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a file to ftag
    Add {
        /// Path to the file to be added to ftag
        path: String,
        /// Tags to tag the file with
        #[arg(short = 't', long = "tag", required = true)]
        tags: Vec<String>,
    },

    /// Search for a tag
    Query {
        /// Tag to search for
        tag: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::from_cli(&cli);
    tracing::debug!(index = %settings.index_path.display(), "resolved settings");

    match cli.command {
        Commands::Add { path, tags } => cmd_add(&settings, path, tags),
        Commands::Query { tag } => cmd_query(&settings, &tag),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("ftag=debug,ftag_index=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Load the index, warning (not failing) when it was never created.
///
/// Malformed content is an error: continuing would let `add` overwrite it.
fn load_index(settings: &Settings) -> Result<ftag_index::TagIndex> {
    let loaded = ftag_index::load_or_default(&FsBlobStore, &settings.index_path)
        .with_context(|| format!("failed to load {}", settings.index_path.display()))?;
    if !loaded.initialized {
        eprintln!(
            "{} ftag not initialized in this directory",
            "warning:".yellow().bold()
        );
    }
    Ok(loaded.index)
}

fn cmd_add(settings: &Settings, path: String, tags: Vec<String>) -> Result<()> {
    let mut index = load_index(settings)?;
    let record = index.add_or_merge(Record::new(path, tags)).clone();

    ftag_index::save(&mut FsBlobStore, &settings.index_path, &index)
        .with_context(|| format!("failed to save {}", settings.index_path.display()))?;

    eprintln!("{} {}", "Tagged".green().bold(), record);
    Ok(())
}

fn cmd_query(settings: &Settings, tag: &str) -> Result<()> {
    let index = load_index(settings)?;
    for record in index.query(tag) {
        println!("{record}");
    }
    Ok(())
}
