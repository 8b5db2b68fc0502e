use anyhow::Result;
use http::header::ACCEPT;
use http::Uri;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use std::process::Command;
use std::time::Duration;
use tracing::debug;

use crate::config::AuthToken;
use crate::data::{ApiCheckRun, ApiPullRequest, ApiStatus, CheckRunsResponse, RepositoryId};
use crate::error::FetchError;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

pub fn get_github_token() -> Result<String> {
    let output = Command::new("gh").args(["auth", "token"]).output()?;

    if !output.status.success() {
        anyhow::bail!("Failed to get GitHub token. Run 'gh auth login' first.");
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub fn get_current_user() -> Result<String> {
    let output = Command::new("gh")
        .args(["api", "user", "--jq", ".login"])
        .output()?;

    if !output.status.success() {
        anyhow::bail!("Failed to get current user");
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Bearer-authenticated REST client with a per-request timeout.
#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    timeout: Duration,
}

impl GitHubClient {
    /// Must be called from within a tokio runtime.
    pub fn new(token: &AuthToken, api_base: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base_uri: Uri = api_base.parse().map_err(|e: http::uri::InvalidUri| {
            FetchError::Client {
                message: format!("invalid API base '{api_base}': {e}"),
            }
        })?;

        let octocrab = Octocrab::builder()
            .personal_token(token.expose().to_string())
            .base_uri(base_uri)
            .map_err(|e| FetchError::Client {
                message: e.to_string(),
            })?
            .add_header(ACCEPT, GITHUB_ACCEPT.to_string())
            .build()
            .map_err(|e| FetchError::Client {
                message: e.to_string(),
            })?;

        Ok(Self { octocrab, timeout })
    }

    /// First page of `GET /repos/{owner}/{repo}/pulls`.
    pub async fn list_pull_requests(
        &self,
        repo: &RepositoryId,
    ) -> Result<Vec<ApiPullRequest>, FetchError> {
        self.get(&format!("/repos/{}/{}/pulls", repo.owner, repo.name))
            .await
    }

    /// Statuses from a pull request's `statuses_url`.
    pub async fn statuses(&self, statuses_url: &str) -> Result<Vec<ApiStatus>, FetchError> {
        self.get(statuses_url).await
    }

    pub async fn check_runs(
        &self,
        repo: &RepositoryId,
        sha: &str,
    ) -> Result<Vec<ApiCheckRun>, FetchError> {
        let response: CheckRunsResponse = self
            .get(&format!(
                "/repos/{}/{}/commits/{}/check-runs",
                repo.owner, repo.name, sha
            ))
            .await?;
        Ok(response.check_runs)
    }

    async fn get<R: DeserializeOwned>(&self, route: &str) -> Result<R, FetchError> {
        debug!(route, "GET");
        match tokio::time::timeout(self.timeout, self.octocrab.get::<R, _, ()>(route, None)).await
        {
            Ok(result) => result.map_err(FetchError::from),
            Err(_) => Err(FetchError::Timeout {
                route: route.to_string(),
                after: self.timeout,
            }),
        }
    }
}
