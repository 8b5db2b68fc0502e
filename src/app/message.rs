use crate::data::{CycleId, PullRequest, RepositoryId};
use crate::services::PollerUpdate;

/// Events produced by a fetch cycle, in the order they become available.
#[derive(Debug, Clone)]
pub enum FetchEvent {
    /// One enriched pull request is ready for display.
    PrFetched {
        cycle: CycleId,
        repo: RepositoryId,
        pull_request: PullRequest,
    },
    /// The repository listing succeeded; all of its pull requests for this
    /// cycle have already been dispatched.
    RepositoryFetched { cycle: CycleId, repo: RepositoryId },
    /// A repository (or a pull request within it) could not be fetched.
    FetchFailed {
        cycle: CycleId,
        repo: Option<RepositoryId>,
        error: String,
    },
}

/// Command to be executed after update
#[derive(Debug, PartialEq)]
pub enum Command {
    Quit,
    Refresh,
}

/// All possible messages/events in the application
pub enum Message {
    // Navigation
    NextItem,
    PreviousItem,
    GoToTop,
    GoToBottom,

    // Actions
    OpenSelected,
    Refresh,

    // Search
    EnterSearchMode,
    ExitSearchMode { clear: bool },
    SearchInput(char),
    SearchBackspace,

    // Popups
    ToggleHelp,
    DismissHelp,

    // Background fetches
    Poller(PollerUpdate),

    // System
    Tick,
    Quit,
}
