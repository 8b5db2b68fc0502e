//! The fetch pipeline: list pull requests per repository, enrich each with
//! its statuses and check runs, and dispatch events as results arrive.

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::app::FetchEvent;
use crate::config::Config;
use crate::data::{
    ApiPullRequest, CycleId, Label, PullRequest, PullRequestState, RepositoryId,
};
use crate::error::FetchError;

use super::checks::map_check_runs;
use super::github::GitHubClient;
use super::status::merge_statuses;

/// Outcome of one fetch cycle, for logging and the status line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleSummary {
    pub cycle: CycleId,
    pub pull_requests: usize,
    pub failed_pull_requests: usize,
    pub failed_repositories: usize,
}

impl CycleSummary {
    pub fn failures(&self) -> usize {
        self.failed_pull_requests + self.failed_repositories
    }
}

/// How many pull requests one repository delivered and how many were dropped.
#[derive(Debug, Default, PartialEq)]
pub struct RepositoryOutcome {
    pub delivered: usize,
    pub failed: usize,
}

/// Fetch statuses, then check runs, for one pull request.
///
/// The commit SHA comes from the statuses URL, so the check-run request is
/// only issued once the statuses have been merged.
#[instrument(skip_all, fields(repo = %repo, number = summary.number))]
pub async fn enrich_pull_request(
    client: &GitHubClient,
    repo: &RepositoryId,
    summary: &ApiPullRequest,
) -> Result<PullRequest, FetchError> {
    let number = summary.number;
    let sha = summary
        .commit_sha()
        .ok_or(FetchError::MissingSha { number })?;

    let raw_statuses = client
        .statuses(&summary.statuses_url)
        .await
        .map_err(|e| FetchError::enrichment(number, e))?;
    let statuses = merge_statuses(&raw_statuses);

    let raw_runs = client
        .check_runs(repo, &sha)
        .await
        .map_err(|e| FetchError::enrichment(number, e))?;
    let check_runs = map_check_runs(&raw_runs);

    debug!(
        statuses = statuses.len(),
        check_runs = check_runs.len(),
        "enriched"
    );

    Ok(PullRequest {
        number,
        title: summary.title.clone(),
        url: summary.html_url.clone(),
        author: summary.author_login().unwrap_or_default().to_string(),
        repo: repo.clone(),
        comment_count: summary.comments,
        labels: summary
            .labels
            .iter()
            .map(|l| Label {
                name: l.name.clone(),
                color: l.color.clone(),
            })
            .collect(),
        updated_at: summary.updated_at,
        statuses,
        check_runs,
    })
}

/// List one repository's pull requests, keep the open ones authored by
/// `username`, and enrich them concurrently.
///
/// A `PrFetched` event is dispatched as soon as each pull request is ready,
/// followed by `RepositoryFetched`. Pull requests whose enrichment fails are
/// skipped and reported together in one `FetchFailed` event. A listing
/// failure dispatches nothing and is returned to the caller.
#[instrument(skip_all, fields(repo = %repo, cycle = %cycle))]
pub async fn fetch_repository<D>(
    client: &GitHubClient,
    repo: &RepositoryId,
    username: &str,
    cycle: CycleId,
    dispatch: &D,
) -> Result<RepositoryOutcome, FetchError>
where
    D: Fn(FetchEvent),
{
    let listing = client.list_pull_requests(repo).await?;
    let total = listing.len();

    let mine: Vec<ApiPullRequest> = listing
        .into_iter()
        .filter(|pr| {
            pr.author_login()
                .is_some_and(|login| login.eq_ignore_ascii_case(username))
        })
        .filter(|pr| pr.state == PullRequestState::Open)
        .collect();
    debug!(total, matching = mine.len(), "listed pull requests");

    let results = join_all(mine.iter().map(|summary| async move {
        match enrich_pull_request(client, repo, summary).await {
            Ok(pull_request) => {
                dispatch(FetchEvent::PrFetched {
                    cycle,
                    repo: repo.clone(),
                    pull_request,
                });
                Ok(())
            }
            Err(error) => Err(error),
        }
    }))
    .await;

    let mut outcome = RepositoryOutcome::default();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(()) => outcome.delivered += 1,
            Err(error) => {
                warn!(%error, "enrichment failed");
                errors.push(error.to_string());
            }
        }
    }
    outcome.failed = errors.len();

    dispatch(FetchEvent::RepositoryFetched {
        cycle,
        repo: repo.clone(),
    });

    if !errors.is_empty() {
        dispatch(FetchEvent::FetchFailed {
            cycle,
            repo: Some(repo.clone()),
            error: format!(
                "{repo}: {} pull request(s) could not be loaded: {}",
                errors.len(),
                errors.join("; ")
            ),
        });
    }

    Ok(outcome)
}

/// Runs fetch cycles across every configured repository.
pub struct FetchOrchestrator {
    client: GitHubClient,
    repositories: Vec<RepositoryId>,
    username: String,
    last_cycle: CycleId,
}

impl FetchOrchestrator {
    pub fn new(client: GitHubClient, repositories: Vec<RepositoryId>, username: String) -> Self {
        Self {
            client,
            repositories,
            username,
            last_cycle: CycleId::default(),
        }
    }

    pub fn from_config(client: GitHubClient, config: &Config) -> Self {
        Self::new(
            client,
            config.repositories.clone(),
            config.username.clone(),
        )
    }

    pub fn last_cycle(&self) -> CycleId {
        self.last_cycle
    }

    /// Fetch all repositories concurrently, dispatching events as they are
    /// produced. A repository whose listing fails yields one `FetchFailed`
    /// event and no data; other repositories are unaffected.
    pub async fn run_cycle<D>(&mut self, dispatch: D) -> CycleSummary
    where
        D: Fn(FetchEvent),
    {
        self.last_cycle = self.last_cycle.next();
        let cycle = self.last_cycle;
        info!(%cycle, repositories = self.repositories.len(), "starting fetch cycle");

        let client = &self.client;
        let username = self.username.as_str();
        let dispatch = &dispatch;

        let outcomes = join_all(self.repositories.iter().map(|repo| async move {
            match fetch_repository(client, repo, username, cycle, dispatch).await {
                Ok(outcome) => Some(outcome),
                Err(error) => {
                    warn!(%repo, %error, "repository fetch failed");
                    dispatch(FetchEvent::FetchFailed {
                        cycle,
                        repo: Some(repo.clone()),
                        error: format!("{repo}: {error}"),
                    });
                    None
                }
            }
        }))
        .await;

        let mut summary = CycleSummary {
            cycle,
            ..CycleSummary::default()
        };
        for outcome in outcomes {
            match outcome {
                Some(outcome) => {
                    summary.pull_requests += outcome.delivered;
                    summary.failed_pull_requests += outcome.failed;
                }
                None => summary.failed_repositories += 1,
            }
        }
        summary
    }
}
