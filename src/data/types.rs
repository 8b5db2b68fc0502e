use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use crate::icons;

/// Monotonic identifier of one fetch cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleId(pub u64);

impl CycleId {
    pub fn next(self) -> Self {
        CycleId(self.0 + 1)
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// Commit status state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Success,
    Failure,
    Pending,
    Error,
}

impl StatusState {
    /// Terminal states are never replaced by a later report for the same context.
    pub fn is_terminal(self) -> bool {
        matches!(self, StatusState::Success | StatusState::Failure)
    }

    pub fn display(self) -> (&'static str, ratatui::style::Color) {
        use ratatui::style::Color;
        match self {
            StatusState::Success => (icons::STATUS_SUCCESS, Color::Green),
            StatusState::Failure => (icons::STATUS_FAILURE, Color::Red),
            StatusState::Pending => (icons::STATUS_PENDING, Color::Yellow),
            StatusState::Error => (icons::STATUS_ERROR, Color::Red),
        }
    }
}

/// Display bucket for a check run, derived from its status and conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckRunState {
    Success,
    Failure,
    Attention,
    Running,
}

impl CheckRunState {
    /// Runs that have not completed are shown as running regardless of conclusion.
    pub fn from_parts(status: Option<&str>, conclusion: Option<&str>) -> Self {
        if status != Some("completed") {
            return CheckRunState::Running;
        }
        match conclusion.unwrap_or_default() {
            "success" => CheckRunState::Success,
            "failure" => CheckRunState::Failure,
            "action_required" | "timed_out" | "cancelled" => CheckRunState::Attention,
            _ => CheckRunState::Running,
        }
    }

    pub fn display(self) -> (&'static str, ratatui::style::Color) {
        use ratatui::style::Color;
        match self {
            CheckRunState::Success => (icons::STATUS_SUCCESS, Color::Green),
            CheckRunState::Failure => (icons::STATUS_FAILURE, Color::Red),
            CheckRunState::Attention => (icons::STATUS_ATTENTION, Color::LightRed),
            CheckRunState::Running => (icons::STATUS_PENDING, Color::Yellow),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

// REST response types

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLabel {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiHead {
    pub sha: Option<String>,
}

/// One entry of `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub html_url: String,
    pub state: PullRequestState,
    pub user: Option<ApiUser>,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub labels: Vec<ApiLabel>,
    pub updated_at: DateTime<Utc>,
    pub statuses_url: String,
    pub head: Option<ApiHead>,
}

impl ApiPullRequest {
    pub fn author_login(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }

    /// Commit SHA taken from the last path segment of the statuses URL,
    /// falling back to the head commit when the URL carries none.
    pub fn commit_sha(&self) -> Option<String> {
        self.statuses_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(|s| s.to_string())
            .or_else(|| self.head.as_ref().and_then(|h| h.sha.clone()))
    }
}

/// One entry of a commit's statuses listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiStatus {
    pub context: String,
    pub state: StatusState,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiApp {
    pub slug: Option<String>,
}

/// One check run. Every field is optional so partial records still map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCheckRun {
    pub app: Option<ApiApp>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub details_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckRunsResponse {
    #[serde(default)]
    pub check_runs: Vec<ApiCheckRun>,
}
