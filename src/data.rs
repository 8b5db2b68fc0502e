pub mod models;
pub mod types;

pub use models::{CheckRunEntry, Label, PullRequest, RepositoryId, StatusEntry};
pub use types::{
    ApiApp, ApiCheckRun, ApiHead, ApiLabel, ApiPullRequest, ApiStatus, ApiUser,
    CheckRunsResponse, CheckRunState, CycleId, PullRequestState, StatusState,
};

pub use crate::icons::SPINNER_FRAMES;
