//! Jira work-log integration
//!
//! Issues are addressed by key (`PROJ-123`). Requests authenticate with HTTP
//! basic auth from the configured username and API token against the
//! configured REST base URL.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Config;
use crate::survey::TaskDescription;

use super::{IssueHandle, Upstream, UpstreamError};

/// Jira issue keys: a project prefix, a dash, a number.
static ISSUE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[A-Z0-9]+-[0-9]+").expect("issue key pattern"));

#[derive(Debug, Deserialize)]
struct JiraIssue {
    key: String,
}

pub struct Jira {
    url: String,
    username: String,
    token: String,
}

impl Jira {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.url.clone(),
            username: config.username.clone(),
            token: config.token.clone(),
        }
    }

    fn configured(&self) -> Result<(), UpstreamError> {
        if self.url.is_empty() || self.username.is_empty() || self.token.is_empty() {
            return Err(UpstreamError::IncompleteConfig);
        }
        Ok(())
    }
}

impl Upstream for Jira {
    fn classify(&self, identifier: &str) -> bool {
        ISSUE_KEY.is_match(identifier)
    }

    fn resolve(&self, client: &Client, identifier: &str) -> Result<IssueHandle, UpstreamError> {
        self.configured()?;

        let response = client
            .get(format!("{}/issue/{}", self.url, identifier))
            .basic_auth(&self.username, Some(&self.token))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let issue: JiraIssue = response.json()?;
        Ok(IssueHandle::Jira { key: issue.key })
    }

    fn submit(
        &self,
        client: &Client,
        issue: &IssueHandle,
        seconds: i64,
        description: &TaskDescription,
    ) -> Result<(), UpstreamError> {
        let IssueHandle::Jira { key } = issue else {
            return Err(UpstreamError::ForeignHandle);
        };
        self.configured()?;

        let response = client
            .post(format!("{}/issue/{}/worklog", self.url, key))
            .basic_auth(&self.username, Some(&self.token))
            .json(&serde_json::json!({
                "comment": description.summary(),
                "timeSpentSeconds": seconds,
            }))
            .send()?;

        match response.status() {
            StatusCode::CREATED => Ok(()),
            status => Err(UpstreamError::Status(status)),
        }
    }
}
