use ratatui::widgets::TableState;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use crate::data::{CycleId, PullRequest, RepositoryId, SPINNER_FRAMES};
use crate::services::{CycleSummary, PollerHandle, PollerUpdate};

pub const MAX_ISSUES_PER_REPO: usize = 10;
pub const LOADING_WARNING: &str = "Fetching GitHub data ...";

/// Render-ready projection of the most recent fetch results.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub warning: Option<String>,
    /// Pull requests per repository, in arrival order, at most
    /// [`MAX_ISSUES_PER_REPO`] each.
    pub display_issues: BTreeMap<RepositoryId, Vec<PullRequest>>,
    pub last_checked: String,
    // Cycle whose results each repository's list currently holds.
    pub(crate) applied_cycles: HashMap<RepositoryId, CycleId>,
    pub(crate) latest_cycle: CycleId,
    // Cycle that raised the current warning; the loading warning belongs to none.
    pub(crate) warning_cycle: CycleId,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            warning: Some(LOADING_WARNING.to_string()),
            display_issues: BTreeMap::new(),
            last_checked: String::new(),
            applied_cycles: HashMap::new(),
            latest_cycle: CycleId::default(),
            warning_cycle: CycleId::default(),
        }
    }

    /// All pull requests in display order.
    pub fn pull_requests(&self) -> impl Iterator<Item = &PullRequest> {
        self.display_issues.values().flatten()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct App {
    // Data state
    pub view: ViewState,
    pub username: String,
    pub repositories: Vec<RepositoryId>,

    // View state
    pub table_state: TableState,
    pub filtered_indices: Vec<usize>,

    // Search state
    pub search_mode: bool,
    pub search_query: String,

    // Popup state
    pub show_help_popup: bool,

    // Loading state
    pub fetching: bool,
    pub last_summary: Option<CycleSummary>,

    // Async communication
    poller: Option<PollerHandle>,

    // Spinner state
    pub spinner_idx: usize,
    pub last_spinner_update: Instant,
}

impl App {
    pub fn new(username: String, repositories: Vec<RepositoryId>) -> Self {
        Self {
            view: ViewState::new(),
            username,
            repositories,
            table_state: TableState::default(),
            filtered_indices: Vec::new(),
            search_mode: false,
            search_query: String::new(),
            show_help_popup: false,
            fetching: false,
            last_summary: None,
            poller: None,
            spinner_idx: 0,
            last_spinner_update: Instant::now(),
        }
    }

    pub fn with_poller(mut self, poller: PollerHandle) -> Self {
        self.poller = Some(poller);
        self
    }

    // Getters

    pub fn visible_prs(&self) -> Vec<&PullRequest> {
        let prs: Vec<&PullRequest> = self.view.pull_requests().collect();
        self.filtered_indices
            .iter()
            .filter_map(|&idx| prs.get(idx).copied())
            .collect()
    }

    pub fn selected_pr(&self) -> Option<&PullRequest> {
        let selected = self.table_state.selected()?;
        let idx = *self.filtered_indices.get(selected)?;
        self.view.pull_requests().nth(idx)
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_idx]
    }

    // Spinner update

    pub fn update_spinner(&mut self) {
        if self.last_spinner_update.elapsed() >= Duration::from_millis(80) {
            self.spinner_idx = (self.spinner_idx + 1) % SPINNER_FRAMES.len();
            self.last_spinner_update = Instant::now();
        }
    }

    // Fetch management

    pub fn request_refresh(&mut self) {
        let sent = self
            .poller
            .as_ref()
            .is_some_and(|poller| poller.request_refresh());
        if !sent {
            self.view.warning = Some("Background fetcher is not running".to_string());
        }
    }

    pub fn check_poller(&self) -> Option<PollerUpdate> {
        self.poller.as_ref().and_then(PollerHandle::try_next)
    }
}
