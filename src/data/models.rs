use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::types::{CheckRunState, StatusState};
use crate::error::ConfigError;
use crate::utils::parse_github_url;

/// A repository in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct RepositoryId {
    pub owner: String,
    pub name: String,
}

impl RepositoryId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryId {
    type Err = ConfigError;

    /// Accepts `owner/name` as well as GitHub SSH and HTTPS remote URLs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some((owner, name)) = parse_github_url(trimmed) {
            return Ok(Self::new(owner, name));
        }

        match trimmed.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(*owner, *name))
            }
            _ => Err(ConfigError::InvalidRepository(s.to_string())),
        }
    }
}

impl TryFrom<String> for RepositoryId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    /// Hex colour without the leading `#`, as GitHub reports it.
    pub color: String,
}

/// Merged state of one status context.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEntry {
    pub state: StatusState,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckRunEntry {
    pub app_slug: String,
    pub name: String,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub details_url: Option<String>,
}

impl CheckRunEntry {
    pub fn state(&self) -> CheckRunState {
        CheckRunState::from_parts(self.status.as_deref(), self.conclusion.as_deref())
    }

    /// `app:name` key used when listing runs.
    pub fn key(&self) -> String {
        format!("{}:{}", self.app_slug, self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub repo: RepositoryId,
    pub comment_count: u64,
    pub labels: Vec<Label>,
    pub updated_at: DateTime<Utc>,
    pub statuses: BTreeMap<String, StatusEntry>,
    pub check_runs: Vec<CheckRunEntry>,
}
