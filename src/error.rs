//! Error types for stint
//!
//! Exit codes:
//! - 0: Normal completion, including "nothing to do" outcomes
//! - 1: Usage, state, or persistence errors
//!
//! Upstream (Jira/GitLab) failures never appear here: they are handled at the
//! sync boundary and reported as warnings, see `integrations`.

use chrono::NaiveDate;
use thiserror::Error;

/// Exit codes for the stint CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

/// Main error type for stint operations
#[derive(Error, Debug)]
pub enum Error {
    // Usage errors
    #[error("no task identifier provided")]
    MissingIdentifier,

    #[error("cannot start a task in the future")]
    FutureStart,

    #[error("cannot stop a task before it started")]
    EndBeforeStart,

    #[error("invalid time of day: {0} (expected HH:MM)")]
    InvalidTime(String),

    #[error("invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("cannot log from {from} to {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    // State conflicts
    #[error("a task is already started")]
    AlreadyActive,

    #[error("no task started")]
    NoActiveTask,

    // Persistence failures
    #[error("status record is corrupt: {0}")]
    CorruptState(String),

    #[error("log for {day} is corrupt at line {line}")]
    CorruptLine { day: NaiveDate, line: usize },

    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        exit_codes::FAILURE
    }
}

/// Result type alias for stint operations
pub type Result<T> = std::result::Result<T, Error>;
