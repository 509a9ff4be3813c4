//! Storage layer for stint
//!
//! All state lives under a single per-user base directory:
//!
//! ```text
//! ~/.stint/                 # or --dir / STINT_DIR
//!   status                  # active task record: identifier,RFC3339-start
//!   config                  # key=value configuration
//!   wd                      # last working directory seen by the advisor
//!   logs/
//!     YYYY-MM-DD            # one ledger per day, one entry per line
//! ```
//!
//! The status and ledger wire formats are parsed and serialized only by
//! `active` and `daylog`; this module owns the directory layout.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use directories::UserDirs;

use crate::error::{Error, Result};

/// Name of the base directory under the user's home
pub const BASE_DIR: &str = ".stint";

/// Name of the ledger subdirectory
pub const LOGS_DIR: &str = "logs";

const STATUS_FILE: &str = "status";
const CONFIG_FILE: &str = "config";
const WORKING_DIR_FILE: &str = "wd";

const DEFAULT_CONFIG: &str = "billable_enable=no\n";

/// Storage manager for the stint base directory
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Resolve the base directory: an explicit override wins, otherwise
    /// `~/.stint`.
    pub fn resolve_root(dir: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = dir {
            return Ok(dir);
        }

        let dirs = UserDirs::new().ok_or(Error::NoHomeDir)?;
        Ok(dirs.home_dir().join(BASE_DIR))
    }

    /// Open the base directory, creating the layout on first run.
    ///
    /// First run also seeds a default config file so users have something to
    /// edit.
    pub fn open(root: PathBuf) -> Result<Self> {
        let storage = Self { root };

        std::fs::create_dir_all(storage.logs_dir())?;
        if !storage.config_file().exists() {
            tracing::debug!(root = %storage.root.display(), "seeding default config");
            std::fs::write(storage.config_file(), DEFAULT_CONFIG)?;
        }

        Ok(storage)
    }

    /// Path to the base directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the active task record
    pub fn status_file(&self) -> PathBuf {
        self.root.join(STATUS_FILE)
    }

    /// Path to the configuration file
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Path to the ledger directory
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    /// Path to one day's ledger
    pub fn day_file(&self, day: NaiveDate) -> PathBuf {
        self.logs_dir().join(day.format("%Y-%m-%d").to_string())
    }

    /// Last working directory recorded by the autostart advisor, if any.
    pub fn last_working_dir(&self) -> Result<Option<PathBuf>> {
        let path = self.root.join(WORKING_DIR_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        Ok(Some(PathBuf::from(trimmed)))
    }

    /// Record the advisor's last-seen working directory.
    pub fn set_working_dir(&self, path: &Path) -> Result<()> {
        std::fs::write(
            self.root.join(WORKING_DIR_FILE),
            format!("{}\n", path.display()),
        )?;
        Ok(())
    }
}
