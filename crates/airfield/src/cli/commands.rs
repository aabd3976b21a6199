//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use clap::{Args, Subcommand};

use crate::codec;

/// Reprocess a flights CSV file.
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Flights CSV file to process
    pub source: PathBuf,

    /// Where to write the processed flights
    #[arg(required_unless_present = "rewrite")]
    pub target: Option<PathBuf>,

    /// Write the result back over SOURCE
    #[arg(short = 'f', long)]
    pub rewrite: bool,
}

impl UpdateCommand {
    /// The file the processed flights are written to.
    ///
    /// TARGET when given, otherwise SOURCE (only reachable with `--rewrite`).
    #[must_use]
    pub fn destination(&self) -> &Path {
        self.target.as_deref().unwrap_or(&self.source)
    }
}

/// Look up a single flight.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Flight identifier
    pub flight_id: String,

    /// Flights database (defaults to the configured database)
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Register a new flight.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Flight identifier
    pub flight_id: String,

    /// Arrival time (HH:MM)
    #[arg(value_parser = parse_time_arg)]
    pub arrival: NaiveTime,

    /// Departure time (HH:MM)
    #[arg(value_parser = parse_time_arg)]
    pub departure: NaiveTime,

    /// Flights database (defaults to the configured database)
    #[arg(short, long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn parse_time_arg(value: &str) -> Result<NaiveTime, String> {
    codec::parse_time(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_prefers_target() {
        let cmd = UpdateCommand {
            source: PathBuf::from("in.csv"),
            target: Some(PathBuf::from("out.csv")),
            rewrite: true,
        };
        assert_eq!(cmd.destination(), Path::new("out.csv"));
    }

    #[test]
    fn test_destination_rewrite_in_place() {
        let cmd = UpdateCommand {
            source: PathBuf::from("in.csv"),
            target: None,
            rewrite: true,
        };
        assert_eq!(cmd.destination(), Path::new("in.csv"));
    }

    #[test]
    fn test_parse_time_arg() {
        assert_eq!(
            parse_time_arg("07:45").unwrap(),
            NaiveTime::from_hms_opt(7, 45, 0).unwrap()
        );
        assert!(parse_time_arg("7.45").is_err());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
