//! Command-line interface for airfield.
//!
//! This module provides the CLI structure for the `airfield` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{AddCommand, ConfigCommand, ShowCommand, UpdateCommand};

use crate::logging::Verbosity;

/// airfield - Flight admission control
///
/// Applies daily capacity and minimum ground time rules to a CSV flight
/// schedule and keeps the file ordered by arrival time.
#[derive(Debug, Parser)]
#[command(name = "airfield")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recompute statuses and ordering of a flights CSV file
    #[command(alias = "update-dataset")]
    Update(UpdateCommand),

    /// Show a flight from the database
    Show(ShowCommand),

    /// Add a flight to the database
    Add(AddCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
