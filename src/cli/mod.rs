//! Command-line interface for stint
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};

use crate::error::{Error, Result};
use crate::lifecycle::StartReport;
use crate::storage::Storage;

mod cancel;
mod config;
mod log;
mod precmd;
mod ps1;
mod start;
mod status;
mod stop;

/// stint - personal time tracking
///
/// Track one task at a time into per-day logs, optionally pushing the
/// elapsed time to Jira or GitLab as a work log.
#[derive(Parser, Debug)]
#[command(name = "stint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for stint state (defaults to ~/.stint)
    #[arg(long, global = true, env = "STINT_DIR")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start tracking time for a task identifier
    Start {
        /// Task identifier; an upstream issue key or free-form
        identifier: String,

        /// Backdate the start to a time of day today
        #[arg(long, value_name = "HH:MM")]
        at: Option<String>,
    },

    /// Stop tracking and append the elapsed interval to the day's log
    Stop {
        /// Backdate the end to a time of day today
        #[arg(long, value_name = "HH:MM")]
        at: Option<String>,
    },

    /// Discard the tracked task without logging its time
    Cancel,

    /// Show the current tracking state
    Status,

    /// Print the log of the current day, or of a date range
    Log {
        /// First day to print
        #[arg(short, long, value_name = "YYYY-MM-DD")]
        from: Option<String>,

        /// Last day to print, defaults to today
        #[arg(short, long, value_name = "YYYY-MM-DD")]
        to: Option<String>,
    },

    /// Print a one-line prompt complication
    Ps1,

    /// Check the working directory and offer to start tracking (shell
    /// precmd hook)
    Precmd,

    /// Dump the loaded configuration
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let root = Storage::resolve_root(self.dir)?;
        let storage = Storage::open(root)?;

        match self.command {
            Commands::Start { identifier, at } => {
                start::run(&storage, start::StartOptions { identifier, at })
            }
            Commands::Stop { at } => stop::run(&storage, stop::StopOptions { at }),
            Commands::Cancel => cancel::run(&storage),
            Commands::Status => status::run(&storage),
            Commands::Log { from, to } => log::run(&storage, log::LogOptions { from, to }),
            Commands::Ps1 => ps1::run(&storage),
            Commands::Precmd => precmd::run(&storage),
            Commands::Config => config::run(&storage),
        }
    }
}

/// Parse a `HH:MM` time-of-day argument.
fn parse_at(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| Error::InvalidTime(value.to_string()))
}

/// Parse a `YYYY-MM-DD` date argument.
fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

/// The user-facing line for a completed `start`, shared by `start` and
/// `precmd`.
fn started_message(report: &StartReport) -> String {
    format!(
        "Started {} at {}",
        report.identifier,
        report.started_at.format("%-I:%M%p")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_times_and_dates() {
        assert_eq!(
            parse_at("09:30").expect("time"),
            NaiveTime::from_hms_opt(9, 30, 0).expect("time")
        );
        assert!(matches!(parse_at("9:3pm"), Err(Error::InvalidTime(_))));

        assert_eq!(
            parse_date("2024-03-07").expect("date"),
            NaiveDate::from_ymd_opt(2024, 3, 7).expect("date")
        );
        assert!(matches!(parse_date("03/07/2024"), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn started_message_uses_wall_clock_time() {
        let report = StartReport {
            identifier: "PROJ-1".to_string(),
            started_at: chrono::DateTime::parse_from_rfc3339("2024-03-07T15:04:00+00:00")
                .expect("timestamp"),
        };
        assert_eq!(started_message(&report), "Started PROJ-1 at 3:04PM");
    }
}
