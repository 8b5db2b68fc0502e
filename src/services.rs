pub mod checks;
pub mod fetch;
pub mod github;
pub mod poller;
pub mod search;
pub mod status;

pub use checks::map_check_runs;
pub use fetch::{
    enrich_pull_request, fetch_repository, CycleSummary, FetchOrchestrator, RepositoryOutcome,
};
pub use github::{get_current_user, get_github_token, GitHubClient, GITHUB_API_BASE};
pub use poller::{spawn_poller, PollerHandle, PollerUpdate};
pub use search::filter_prs;
pub use status::merge_statuses;
