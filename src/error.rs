//! Error types for fetching and configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors surfaced while talking to GitHub.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be built.
    #[error("failed to build GitHub client: {message}")]
    Client { message: String },

    /// Transport-level failure.
    #[error("network error talking to GitHub: {message}")]
    Network { message: String },

    /// GitHub answered with a non-2xx status or a body that did not decode.
    #[error("GitHub API error: {message}")]
    Api { message: String },

    #[error("request to {route} timed out after {after:?}")]
    Timeout { route: String, after: Duration },

    #[error("pull request #{number} has no commit SHA")]
    MissingSha { number: u64 },

    /// A dependent status or check-run fetch failed for one pull request.
    #[error("pull request #{number}: {source}")]
    Enrichment {
        number: u64,
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    pub fn enrichment(number: u64, source: FetchError) -> Self {
        FetchError::Enrichment {
            number,
            source: Box::new(source),
        }
    }
}

impl From<octocrab::Error> for FetchError {
    fn from(error: octocrab::Error) -> Self {
        match error {
            octocrab::Error::GitHub { ref source, .. } => FetchError::Api {
                message: format!("{} ({})", source.message, source.status_code),
            },
            octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => FetchError::Api {
                message: without_backtrace(&error),
            },
            other => FetchError::Network {
                message: without_backtrace(&other),
            },
        }
    }
}

// Octocrab appends a captured backtrace to every message.
fn without_backtrace(error: &octocrab::Error) -> String {
    let message = error.to_string();
    message
        .split("\n\nFound at")
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Errors raised while assembling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no GitHub token found; set AUTH_TOKEN or GITHUB_TOKEN, or run 'gh auth login'")]
    MissingToken,

    #[error("no GitHub username configured; set GHWATCH_USERNAME or pass --user")]
    MissingUsername,

    #[error("no repositories configured; set GHWATCH_REPOS or pass --repo owner/name")]
    NoRepositories,

    #[error("invalid repository '{0}', expected owner/name")]
    InvalidRepository(String),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use std::time::Duration;

    use super::FetchError;

    #[rstest]
    #[case::sub_second(Duration::from_millis(200), "request to /repos/a/b/pulls timed out after 200ms")]
    #[case::whole_seconds(Duration::from_secs(10), "request to /repos/a/b/pulls timed out after 10s")]
    fn timeout_message_keeps_precision(#[case] after: Duration, #[case] expected: &str) {
        let error = FetchError::Timeout {
            route: "/repos/a/b/pulls".to_string(),
            after,
        };
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn enrichment_names_the_pull_request() {
        let error = FetchError::enrichment(
            7,
            FetchError::Api {
                message: "Not Found (404)".to_string(),
            },
        );
        assert_eq!(
            error.to_string(),
            "pull request #7: GitHub API error: Not Found (404)"
        );
    }
}
