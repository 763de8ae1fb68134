use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;

/// A grant issue as referenced by this service: grant numbers live in the
/// tracker's titles, never as first-class records here.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantIssue {
    pub number: u64,
    pub title: String,
    pub state: String,
}

/// Issue-tracker seam. Trait object so handlers can run against a
/// recording fake in tests.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Open a new issue for a grant application; returns the issue number.
    async fn create_application_issue(&self, title: &str, body: &str) -> Result<u64>;
    /// Find the issue whose title carries the given grant number.
    async fn find_grant_issue(&self, grant_number: &str) -> Result<Option<GrantIssue>>;
    /// Attach a progress report as a comment on the grant's issue.
    async fn add_report_comment(&self, issue_number: u64, body: &str) -> Result<()>;
}

pub struct GitHubTracker {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl GitHubTracker {
    pub fn new(config: Arc<Config>, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    fn credentials(&self) -> Result<(&str, &str, &str)> {
        let token = self
            .config
            .github_token
            .as_deref()
            .ok_or_else(|| anyhow!("GITHUB_TOKEN not configured"))?;
        let org = self
            .config
            .github_org
            .as_deref()
            .ok_or_else(|| anyhow!("GITHUB_ORG not configured"))?;
        let repo = self
            .config
            .github_repo
            .as_deref()
            .ok_or_else(|| anyhow!("GITHUB_REPO not configured"))?;
        Ok((token, org, repo))
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(anyhow!("issue tracker {what} returned {status}: {body}"))
    }
}

#[derive(Deserialize)]
struct CreatedIssue {
    number: u64,
}

#[derive(Deserialize)]
struct SearchResults {
    items: Vec<GrantIssue>,
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    async fn create_application_issue(&self, title: &str, body: &str) -> Result<u64> {
        let (token, org, repo) = self.credentials()?;
        let url = format!("{}/repos/{org}/{repo}/issues", self.config.github_api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "grant-gateway")
            .json(&json!({ "title": title, "body": body, "labels": ["application"] }))
            .send()
            .await
            .context("issue create request failed")?;
        let created: CreatedIssue = Self::check(response, "issue create")
            .await?
            .json()
            .await
            .context("issue create response parse failed")?;
        Ok(created.number)
    }

    async fn find_grant_issue(&self, grant_number: &str) -> Result<Option<GrantIssue>> {
        let (token, org, repo) = self.credentials()?;
        let url = format!("{}/search/issues", self.config.github_api_base);
        let query = format!("repo:{org}/{repo} in:title {grant_number}");
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "grant-gateway")
            .query(&[("q", query.as_str())])
            .send()
            .await
            .context("issue search request failed")?;
        let results: SearchResults = Self::check(response, "issue search")
            .await?
            .json()
            .await
            .context("issue search response parse failed")?;
        // Search matches loosely; require the number to actually appear in
        // the title before trusting the hit.
        Ok(results.items.into_iter().find(|i| i.title.contains(grant_number)))
    }

    async fn add_report_comment(&self, issue_number: u64, body: &str) -> Result<()> {
        let (token, org, repo) = self.credentials()?;
        let url = format!(
            "{}/repos/{org}/{repo}/issues/{issue_number}/comments",
            self.config.github_api_base
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "grant-gateway")
            .json(&json!({ "body": body }))
            .send()
            .await
            .context("report comment request failed")?;
        Self::check(response, "report comment").await?;
        Ok(())
    }
}

/// Grant numbers are 6–7 digit identifiers embedded in issue titles.
pub fn is_valid_grant_number(value: &str) -> bool {
    (6..=7).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}
