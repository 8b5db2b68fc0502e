//! Configuration assembled once at start-up from CLI flags, environment,
//! an optional TOML file and `gh`/`git` fallbacks, in that order.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::data::RepositoryId;
use crate::error::ConfigError;
use crate::services::{get_current_user, get_github_token, GITHUB_API_BASE};
use crate::utils::get_current_repo;

pub const DEFAULT_REFRESH_SECS: u64 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_REPOS: &str = "GHWATCH_REPOS";
pub const ENV_USERNAME: &str = "GHWATCH_USERNAME";
pub const ENV_API_BASE: &str = "GHWATCH_API_BASE";
pub const ENV_REFRESH_SECS: &str = "GHWATCH_REFRESH_SECS";
pub const ENV_TIMEOUT_SECS: &str = "GHWATCH_TIMEOUT_SECS";
pub const ENV_TOKENS: [&str; 2] = ["AUTH_TOKEN", "GITHUB_TOKEN"];

/// Bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        (!token.is_empty()).then_some(Self(token))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Contents of `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub repositories: Vec<RepositoryId>,
    pub username: Option<String>,
    pub token: Option<String>,
    pub refresh_interval_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub api_base: Option<String>,
}

impl FileConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ghwatch").join("config.toml"))
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub repositories: Vec<String>,
    pub username: Option<String>,
    pub refresh_interval_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub api_base: Option<String>,
    pub config_path: Option<PathBuf>,
}

/// Last-resort sources consulted when nothing else supplies a value.
pub trait Fallbacks {
    fn token(&self) -> Option<String>;
    fn username(&self) -> Option<String>;
    fn current_repo(&self) -> Option<RepositoryId>;
}

/// Asks the `gh` CLI and the local `origin` remote.
pub struct GhCliFallbacks;

impl Fallbacks for GhCliFallbacks {
    fn token(&self) -> Option<String> {
        get_github_token().ok()
    }

    fn username(&self) -> Option<String> {
        get_current_user().ok()
    }

    fn current_repo(&self) -> Option<RepositoryId> {
        get_current_repo()
    }
}

/// Consults nothing.
pub struct NoFallbacks;

impl Fallbacks for NoFallbacks {
    fn token(&self) -> Option<String> {
        None
    }

    fn username(&self) -> Option<String> {
        None
    }

    fn current_repo(&self) -> Option<RepositoryId> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub repositories: Vec<RepositoryId>,
    pub username: String,
    pub token: AuthToken,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub api_base: String,
}

impl Config {
    /// Load from the process environment, the config file and `gh`.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let file = match &overrides.config_path {
            Some(path) => FileConfig::read(path)?,
            None => match FileConfig::default_path() {
                Some(path) if path.exists() => FileConfig::read(&path)?,
                _ => FileConfig::default(),
            },
        };

        Self::resolve(
            overrides,
            |key| std::env::var(key).ok(),
            file,
            &GhCliFallbacks,
        )
    }

    /// Merge all sources; CLI wins over environment, which wins over the file.
    pub fn resolve(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
        file: FileConfig,
        fallbacks: &dyn Fallbacks,
    ) -> Result<Self, ConfigError> {
        let lookup = |key: &str| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let repositories = if !overrides.repositories.is_empty() {
            parse_repositories(overrides.repositories.iter().map(String::as_str))?
        } else if let Some(list) = lookup(ENV_REPOS) {
            parse_repositories(list.split(','))?
        } else if !file.repositories.is_empty() {
            file.repositories
        } else {
            fallbacks.current_repo().into_iter().collect()
        };
        let repositories = dedup(repositories);
        if repositories.is_empty() {
            return Err(ConfigError::NoRepositories);
        }

        let username = overrides
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .or_else(|| lookup(ENV_USERNAME))
            .or(file.username)
            .or_else(|| fallbacks.username())
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingUsername)?;

        let token = ENV_TOKENS
            .iter()
            .find_map(|key| lookup(*key))
            .or(file.token)
            .or_else(|| fallbacks.token())
            .and_then(AuthToken::new)
            .ok_or(ConfigError::MissingToken)?;

        let refresh_secs = match overrides.refresh_interval_secs {
            Some(secs) => Some(secs),
            None => parse_secs(ENV_REFRESH_SECS, lookup(ENV_REFRESH_SECS))?,
        }
        .or(file.refresh_interval_secs)
        .unwrap_or(DEFAULT_REFRESH_SECS);

        let timeout_secs = match overrides.request_timeout_secs {
            Some(secs) => Some(secs),
            None => parse_secs(ENV_TIMEOUT_SECS, lookup(ENV_TIMEOUT_SECS))?,
        }
        .or(file.request_timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

        for (key, secs) in [("refresh interval", refresh_secs), ("request timeout", timeout_secs)] {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: secs.to_string(),
                });
            }
        }

        let api_base = overrides
            .api_base
            .or_else(|| lookup(ENV_API_BASE))
            .or(file.api_base)
            .unwrap_or_else(|| GITHUB_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            repositories,
            username,
            token,
            refresh_interval: Duration::from_secs(refresh_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            api_base,
        })
    }
}

fn parse_repositories<'a>(
    values: impl Iterator<Item = &'a str>,
) -> Result<Vec<RepositoryId>, ConfigError> {
    values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .collect()
}

fn parse_secs(key: &str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    value
        .map(|v| {
            v.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: v.clone(),
            })
        })
        .transpose()
}

fn dedup(repositories: Vec<RepositoryId>) -> Vec<RepositoryId> {
    let mut seen = Vec::with_capacity(repositories.len());
    for repo in repositories {
        if !seen.contains(&repo) {
            seen.push(repo);
        }
    }
    seen
}
