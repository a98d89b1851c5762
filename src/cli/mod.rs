//! Command-line interface for music-indexer.
//!
//! This module provides the `index` and `list` commands.

mod commands;

pub use commands::{Cli, Commands, IndexArgs, OnMissing, run_command};
