//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `index`: Walk media roots and register new tracks
//! - `list`: Print the indexed library

mod index;
mod list;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config;
use crate::error::{Error, Result};
use crate::resolver::{FailFast, FixedAnswers, InteractivePrompt, ResolutionStrategy, SkipMissing};

pub use index::cmd_index;
pub use list::cmd_list;

/// Music Indexer CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: the OS config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Index media directories into the library
    Index(IndexArgs),
    /// List all tracks in the library
    List,
}

/// What to do when a file lacks a required tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnMissing {
    /// Ask on the terminal
    Prompt,
    /// Use the --default-* values, skip fields without one
    Fixed,
    /// Skip the file
    Skip,
    /// Fail the file
    Fail,
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Directories to index (default: media_dirs from the config file)
    pub roots: Vec<PathBuf>,

    /// Last.fm API key (or set LASTFM_API_KEY env var)
    #[arg(short, long, env = "LASTFM_API_KEY")]
    pub api_key: Option<String>,

    /// Strategy for files missing artist, album or title
    #[arg(long, value_enum, default_value = "prompt")]
    pub on_missing: OnMissing,

    /// Artist for untagged files (with --on-missing fixed)
    #[arg(long)]
    pub default_artist: Option<String>,

    /// Album for untagged files (with --on-missing fixed)
    #[arg(long)]
    pub default_album: Option<String>,

    /// Title for untagged files (with --on-missing fixed)
    #[arg(long)]
    pub default_title: Option<String>,

    /// Walk directories in file-name order
    #[arg(long)]
    pub sorted: bool,
}

impl IndexArgs {
    /// The resolution strategy selected by `--on-missing`.
    pub fn strategy(&self) -> Result<Box<dyn ResolutionStrategy>> {
        Ok(match self.on_missing {
            OnMissing::Prompt => Box::new(InteractivePrompt),
            OnMissing::Fixed => {
                let answers = FixedAnswers {
                    artist: self.default_artist.clone(),
                    album: self.default_album.clone(),
                    title: self.default_title.clone(),
                };
                if answers.artist.is_none() && answers.album.is_none() && answers.title.is_none() {
                    return Err(Error::config(
                        "--on-missing fixed needs at least one --default-* value",
                    ));
                }
                Box::new(answers)
            }
            OnMissing::Skip => Box::new(SkipMissing),
            OnMissing::Fail => Box::new(FailFast),
        })
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    let config = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load(),
    };
    let db_path = cli.db.clone().or_else(|| config.library.database.clone());

    match &cli.command {
        Commands::Index(args) => cmd_index(&rt, &config, db_path.as_deref(), args),
        Commands::List => cmd_list(&rt, db_path.as_deref()),
    }
}
