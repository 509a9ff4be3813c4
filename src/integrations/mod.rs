//! Upstream issue tracker integrations
//!
//! When an upstream service is configured and a stopped task's identifier is
//! shaped like one of its issue keys, the elapsed time is pushed as a remote
//! work log. Sync is strictly best-effort: the local ledger entry has already
//! committed by the time any of this runs, and every failure here degrades to
//! a single printed warning.
//!
//! Each tracker implements the same capability (classify an identifier,
//! resolve it to a remote issue, submit a work log) and exactly one is
//! selected from configuration.

pub mod gitlab;
pub mod jira;

use std::cell::OnceCell;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config::{Config, UpstreamService};
use crate::survey::TaskDescription;

/// Bound on every upstream request; a slow tracker must not stall the CLI
/// long after the stop has been reported.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// A resolved remote issue. Lives for one stop invocation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueHandle {
    Jira { key: String },
    Gitlab { project_id: i64, issue_iid: i64 },
}

/// Failures at the sync boundary. Callers report these as warnings, never as
/// process errors.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream configuration is incomplete")]
    IncompleteConfig,

    #[error("identifier has no leading issue number")]
    NoIssueNumber,

    #[error("issue handle does not belong to this upstream")]
    ForeignHandle,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),
}

/// One upstream tracker's capability.
pub trait Upstream {
    /// Whether the identifier is shaped like this tracker's issue keys.
    fn classify(&self, identifier: &str) -> bool;

    /// Look up the remote issue for a classified identifier.
    fn resolve(&self, client: &Client, identifier: &str) -> Result<IssueHandle, UpstreamError>;

    /// Create a work log of `seconds` against the resolved issue.
    fn submit(
        &self,
        client: &Client,
        issue: &IssueHandle,
        seconds: i64,
        description: &TaskDescription,
    ) -> Result<(), UpstreamError>;
}

/// Result of a sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Identifier is not shaped like an issue key; nothing was attempted.
    Skipped,
    /// Work log created upstream.
    Submitted,
    /// Classification matched but resolution or submission failed.
    Failed,
}

/// Work-log sync engine for the configured upstream.
///
/// Owns the HTTP client, built lazily on the first request so commands that
/// never sync pay nothing for it.
pub struct UpstreamSync {
    service: UpstreamService,
    upstream: Box<dyn Upstream>,
    client: OnceCell<Client>,
}

impl UpstreamSync {
    /// Build the engine for the configured service, or `None` when no
    /// upstream is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let service = config.upstream_service?;
        let upstream: Box<dyn Upstream> = match service {
            UpstreamService::Jira => Box::new(jira::Jira::from_config(config)),
            UpstreamService::Gitlab => Box::new(gitlab::Gitlab::from_config(config)),
        };

        Some(Self {
            service,
            upstream,
            client: OnceCell::new(),
        })
    }

    /// Whether the identifier is shaped like the configured tracker's keys.
    pub fn classify(&self, identifier: &str) -> bool {
        self.upstream.classify(identifier)
    }

    /// Push a work log for a stopped interval, best-effort.
    pub fn sync(
        &self,
        identifier: &str,
        seconds: i64,
        description: &TaskDescription,
    ) -> SyncOutcome {
        if !self.upstream.classify(identifier) {
            return SyncOutcome::Skipped;
        }

        match self.try_sync(identifier, seconds, description) {
            Ok(()) => SyncOutcome::Submitted,
            Err(err) => {
                tracing::debug!(identifier, error = %err, "upstream sync failed");
                SyncOutcome::Failed
            }
        }
    }

    /// The single user-visible warning for a failed sync.
    pub fn warning(&self, identifier: &str) -> String {
        format!(
            "Warning: {identifier} looks like a {service} issue, but no {service} work log \
             was created for this time period.",
            service = self.service
        )
    }

    fn try_sync(
        &self,
        identifier: &str,
        seconds: i64,
        description: &TaskDescription,
    ) -> Result<(), UpstreamError> {
        let client = self.client()?;
        let issue = self.upstream.resolve(client, identifier)?;
        self.upstream.submit(client, &issue, seconds, description)
    }

    fn client(&self) -> Result<&Client, UpstreamError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let built = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(self.client.get_or_init(|| built))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn engine(service: &str) -> UpstreamSync {
        let config = Config {
            upstream_service: match service {
                "jira" => Some(UpstreamService::Jira),
                "gitlab" => Some(UpstreamService::Gitlab),
                _ => None,
            },
            ..Config::default()
        };
        UpstreamSync::from_config(&config).expect("engine")
    }

    #[test]
    fn no_service_means_no_engine() {
        assert!(UpstreamSync::from_config(&Config::default()).is_none());
    }

    #[test]
    fn classification_is_per_kind() {
        let jira = engine("jira");
        let gitlab = engine("gitlab");

        assert!(jira.classify("PROJ-123"));
        assert!(!gitlab.classify("PROJ-123"));

        assert!(gitlab.classify("123-ABC"));
        assert!(!jira.classify("123-ABC"));

        assert!(!jira.classify("notanissue"));
        assert!(!gitlab.classify("notanissue"));
    }

    #[test]
    fn unclassified_identifier_skips_silently() {
        let description = TaskDescription {
            job_type: "Research".to_string(),
            billable: None,
            free_text: String::new(),
        };

        // No HTTP happens for a skip, so an unconfigured engine is safe here.
        let outcome = engine("jira").sync("notanissue", 60, &description);
        assert_eq!(outcome, SyncOutcome::Skipped);
    }

    #[test]
    fn warning_names_identifier_and_service() {
        let warning = engine("jira").warning("PROJ-9");
        assert!(warning.contains("PROJ-9"));
        assert!(warning.contains("jira"));
        assert!(warning.contains("no jira work log"));
    }
}
