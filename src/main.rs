//! Music Indexer - builds a music library database from tagged audio files.
//!
//! Walks media directories, fills in missing artist/album/title tags (asking
//! the operator by default), looks up artist images, album covers and release
//! years on Last.fm, and records artists, albums and tracks in SQLite.

pub mod cli;
pub mod config;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod library;
pub mod metadata;
pub mod model;
pub mod resolver;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("music_indexer=info".parse()?))
        .init();

    cli::run_command(&args)
}
