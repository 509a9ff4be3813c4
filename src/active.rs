//! Active task record store
//!
//! At most one task is tracked at a time. The record is a single line in the
//! status file, `identifier,RFC3339-start-timestamp`, created when tracking
//! starts and removed when it stops or is cancelled.
//!
//! Creation uses exclusive-create semantics so two concurrent `start`
//! invocations cannot both win: the loser surfaces `AlreadyActive` from the
//! filesystem rather than from a separate existence check.
//!
//! Identifiers must not contain a comma; the format has no escaping.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::error::{Error, Result};
use crate::storage::Storage;

/// The single in-progress tracked interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTask {
    pub identifier: String,
    pub started_at: DateTime<FixedOffset>,
}

/// Store for the single active-task record.
#[derive(Debug, Clone)]
pub struct ActiveTaskStore {
    path: PathBuf,
}

impl ActiveTaskStore {
    pub fn new(storage: &Storage) -> Self {
        Self {
            path: storage.status_file(),
        }
    }

    /// True iff a task is currently tracked.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the active task record.
    pub fn read(&self) -> Result<ActiveTask> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(Error::NoActiveTask),
            Err(err) => return Err(err.into()),
        };

        let Some((identifier, timestamp)) = raw.split_once(',') else {
            return Err(Error::CorruptState(format!(
                "expected identifier,timestamp, got {raw:?}"
            )));
        };

        let started_at = DateTime::parse_from_rfc3339(timestamp.trim())
            .map_err(|err| Error::CorruptState(format!("bad start timestamp: {err}")))?;

        Ok(ActiveTask {
            identifier: identifier.to_string(),
            started_at,
        })
    }

    /// Write a new active task record.
    ///
    /// The create is exclusive: if a record already exists, even one that
    /// appeared between the caller's `exists` check and this call, the
    /// result is `AlreadyActive` and the existing record is untouched.
    pub fn write(&self, task: &ActiveTask) -> Result<()> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::AlreadyActive)
            }
            Err(err) => return Err(err.into()),
        };

        let line = format!(
            "{},{}\n",
            task.identifier,
            task.started_at.to_rfc3339_opts(SecondsFormat::Secs, false)
        );
        file.write_all(line.as_bytes())?;

        Ok(())
    }

    /// Delete the active task record.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(Error::NoActiveTask),
            Err(err) => Err(err.into()),
        }
    }
}
