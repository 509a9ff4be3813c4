//! Configuration loading and management
//!
//! Handles parsing of the `config` file in the stint base directory. The
//! format is one `key=value` pair per line; unknown keys are ignored so the
//! file can be shared across versions.
//!
//! Recognized keys:
//! - `billable_enable`: `yes`/`no`, gates the billable-status question
//! - `upstream_service`: `jira`, `gitlab`, or empty to disable sync
//! - `url`, `token`, `username`: credentials, interpreted by the active
//!   upstream service
//! - `default_gitlab_project_id`: project used to resolve GitLab issues

use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Which upstream issue tracker receives work logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamService {
    Jira,
    Gitlab,
}

impl fmt::Display for UpstreamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamService::Jira => write!(f, "jira"),
            UpstreamService::Gitlab => write!(f, "gitlab"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Ask the billable-status question at stop time
    pub billable_enable: bool,

    /// Active upstream service, if any
    pub upstream_service: Option<UpstreamService>,

    /// Upstream base URL (Jira REST base or GitLab host)
    pub url: String,

    /// Upstream credential (Jira API token or GitLab private token)
    pub token: String,

    /// Upstream account name (used by Jira basic auth)
    pub username: String,

    /// GitLab project used to resolve issue identifiers
    pub default_gitlab_project_id: String,
}

impl Config {
    /// Load configuration from the given file.
    ///
    /// A missing file yields the defaults; a present file is parsed line by
    /// line with malformed lines skipped.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        Ok(Self::parse(&raw))
    }

    fn parse(raw: &str) -> Self {
        let mut config = Self::default();

        for line in raw.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "billable_enable" => config.billable_enable = value == "yes",
                "upstream_service" => config.upstream_service = parse_service(value),
                "url" => config.url = value.to_string(),
                "token" => config.token = value.to_string(),
                "username" => config.username = value.to_string(),
                "default_gitlab_project_id" => {
                    config.default_gitlab_project_id = value.to_string();
                }
                _ => continue,
            }
        }

        config
    }
}

fn parse_service(value: &str) -> Option<UpstreamService> {
    match value {
        "jira" => Some(UpstreamService::Jira),
        "gitlab" => Some(UpstreamService::Gitlab),
        "" => None,
        other => {
            tracing::warn!(service = other, "unrecognized upstream_service, sync disabled");
            None
        }
    }
}
