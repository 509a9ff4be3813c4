//! GitLab work-log integration
//!
//! Issues are addressed by iid within the configured default project;
//! identifiers look like GitLab branch names, `42-fix-login`, where the
//! leading number is the issue iid. Requests carry the private token header
//! against the configured host's v4 API.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Config;
use crate::survey::TaskDescription;

use super::{IssueHandle, Upstream, UpstreamError};

/// GitLab issue branches: the issue number, a dash, a slug.
static ISSUE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9]+-[A-Z0-9]+").expect("issue key pattern"));

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

#[derive(Debug, Deserialize)]
struct GitlabProject {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct GitlabIssue {
    iid: i64,
}

pub struct Gitlab {
    url: String,
    token: String,
    default_project: String,
}

impl Gitlab {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.url.clone(),
            token: config.token.clone(),
            default_project: config.default_gitlab_project_id.clone(),
        }
    }

    fn configured(&self) -> Result<(), UpstreamError> {
        if self.url.is_empty() || self.token.is_empty() || self.default_project.is_empty() {
            return Err(UpstreamError::IncompleteConfig);
        }
        Ok(())
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.url, path)
    }
}

/// The leading digit run of an identifier, which GitLab branch names carry as
/// the issue iid.
fn issue_number(identifier: &str) -> Result<i64, UpstreamError> {
    identifier
        .split('-')
        .next()
        .and_then(|leader| leader.parse().ok())
        .ok_or(UpstreamError::NoIssueNumber)
}

impl Upstream for Gitlab {
    fn classify(&self, identifier: &str) -> bool {
        ISSUE_KEY.is_match(identifier)
    }

    fn resolve(&self, client: &Client, identifier: &str) -> Result<IssueHandle, UpstreamError> {
        self.configured()?;
        let iid = issue_number(identifier)?;

        let response = client
            .get(self.api(&format!("/projects/{}", self.default_project)))
            .header(TOKEN_HEADER, &self.token)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }
        let project: GitlabProject = response.json()?;

        let response = client
            .get(self.api(&format!("/projects/{}/issues/{}", project.id, iid)))
            .header(TOKEN_HEADER, &self.token)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }
        let issue: GitlabIssue = response.json()?;

        Ok(IssueHandle::Gitlab {
            project_id: project.id,
            issue_iid: issue.iid,
        })
    }

    fn submit(
        &self,
        client: &Client,
        issue: &IssueHandle,
        seconds: i64,
        description: &TaskDescription,
    ) -> Result<(), UpstreamError> {
        let IssueHandle::Gitlab {
            project_id,
            issue_iid,
        } = issue
        else {
            return Err(UpstreamError::ForeignHandle);
        };
        self.configured()?;

        let response = client
            .post(self.api(&format!(
                "/projects/{project_id}/issues/{issue_iid}/add_spent_time"
            )))
            .header(TOKEN_HEADER, &self.token)
            .query(&[
                ("duration", format!("{seconds}s")),
                ("summary", description.summary()),
            ])
            .send()?;

        match response.status() {
            StatusCode::CREATED => Ok(()),
            status => Err(UpstreamError::Status(status)),
        }
    }
}
