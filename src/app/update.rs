use chrono::{DateTime, TimeZone};
use ratatui::widgets::TableState;
use std::process::Command as ProcessCommand;
use tracing::{debug, info};

use crate::data::{CycleId, RepositoryId};
use crate::services::{filter_prs, PollerUpdate};
use crate::utils::last_updated_label;

use super::message::{Command, FetchEvent, Message};
use super::model::{App, ViewState, MAX_ISSUES_PER_REPO};

/// Update the application state based on a message.
/// Returns an optional command to be executed by the main loop.
pub fn update<Tz: TimeZone>(app: &mut App, msg: Message, now: &DateTime<Tz>) -> Option<Command> {
    match msg {
        // Navigation
        Message::NextItem => {
            next_item(app);
            None
        }
        Message::PreviousItem => {
            previous_item(app);
            None
        }
        Message::GoToTop => {
            if !app.filtered_indices.is_empty() {
                app.table_state.select(Some(0));
            }
            None
        }
        Message::GoToBottom => {
            if !app.filtered_indices.is_empty() {
                app.table_state.select(Some(app.filtered_indices.len() - 1));
            }
            None
        }

        // Actions
        Message::OpenSelected => {
            open_selected(app);
            None
        }
        Message::Refresh => Some(Command::Refresh),

        // Search
        Message::EnterSearchMode => {
            app.search_mode = true;
            None
        }
        Message::ExitSearchMode { clear } => {
            app.search_mode = false;
            if clear {
                app.search_query.clear();
                reset_selection(app);
            }
            None
        }
        Message::SearchInput(c) => {
            app.search_query.push(c);
            reset_selection(app);
            None
        }
        Message::SearchBackspace => {
            app.search_query.pop();
            reset_selection(app);
            None
        }

        // Popups
        Message::ToggleHelp => {
            app.show_help_popup = !app.show_help_popup;
            None
        }
        Message::DismissHelp => {
            app.show_help_popup = false;
            None
        }

        // Background fetches
        Message::Poller(poller_update) => {
            handle_poller_update(app, poller_update, now);
            None
        }

        // System
        Message::Tick => {
            if app.fetching {
                app.update_spinner();
            }
            None
        }
        Message::Quit => Some(Command::Quit),
    }
}

/// Fold one fetch event into the view state.
///
/// The first event of a newer cycle for a repository replaces that
/// repository's list; events from a cycle older than the one already applied
/// are dropped. `FetchFailed` only sets the warning, which `RepositoryFetched`
/// leaves alone unless it predates the event's cycle.
pub fn apply_event<Tz: TimeZone>(state: &mut ViewState, event: FetchEvent, now: &DateTime<Tz>) {
    match event {
        FetchEvent::FetchFailed { cycle, repo, error } => {
            if cycle < state.latest_cycle {
                debug!(%cycle, latest = %state.latest_cycle, "ignoring failure from stale cycle");
                return;
            }
            state.latest_cycle = cycle;
            state.warning_cycle = cycle;
            if let Some(repo) = repo {
                debug!(%repo, %error, "fetch failed");
            }
            state.warning = Some(error);
        }
        FetchEvent::PrFetched {
            cycle,
            repo,
            pull_request,
        } => {
            if !begin_cycle(state, &repo, cycle) {
                return;
            }
            state.warning = None;

            let issues = state.display_issues.entry(repo).or_default();
            issues.retain(|existing| existing.number != pull_request.number);
            issues.push(pull_request);
            if issues.len() > MAX_ISSUES_PER_REPO {
                let excess = issues.len() - MAX_ISSUES_PER_REPO;
                issues.drain(..excess);
            }

            state.last_checked = last_updated_label(now);
        }
        FetchEvent::RepositoryFetched { cycle, repo } => {
            if !begin_cycle(state, &repo, cycle) {
                return;
            }
            if state.warning_cycle < cycle {
                state.warning = None;
            }
            state.last_checked = last_updated_label(now);
        }
    }
}

// Returns false when the event belongs to a cycle older than the one shown.
fn begin_cycle(state: &mut ViewState, repo: &RepositoryId, cycle: CycleId) -> bool {
    state.latest_cycle = state.latest_cycle.max(cycle);

    match state.applied_cycles.get(repo) {
        Some(&applied) if cycle < applied => {
            debug!(%repo, %cycle, %applied, "dropping event from stale cycle");
            false
        }
        Some(&applied) if cycle == applied => true,
        _ => {
            state.applied_cycles.insert(repo.clone(), cycle);
            state.display_issues.insert(repo.clone(), Vec::new());
            true
        }
    }
}

// Helper functions

fn handle_poller_update<Tz: TimeZone>(app: &mut App, poller_update: PollerUpdate, now: &DateTime<Tz>) {
    match poller_update {
        PollerUpdate::CycleStarted(cycle) => {
            debug!(%cycle, "cycle started");
            app.fetching = true;
        }
        PollerUpdate::Event(event) => {
            apply_event(&mut app.view, event, now);
            update_filtered_indices(app);
        }
        PollerUpdate::CycleFinished(summary) => {
            info!(
                cycle = %summary.cycle,
                pull_requests = summary.pull_requests,
                failures = summary.failures(),
                "cycle finished"
            );
            app.fetching = false;
            app.last_summary = Some(summary);
        }
    }
}

fn next_item(app: &mut App) {
    if app.filtered_indices.is_empty() {
        return;
    }
    let i = match app.table_state.selected() {
        Some(i) if i >= app.filtered_indices.len() - 1 => i,
        Some(i) => i + 1,
        None => 0,
    };
    app.table_state.select(Some(i));
}

fn previous_item(app: &mut App) {
    if app.filtered_indices.is_empty() {
        return;
    }
    let i = match app.table_state.selected() {
        Some(i) => i.saturating_sub(1),
        None => 0,
    };
    app.table_state.select(Some(i));
}

fn update_filtered_indices(app: &mut App) {
    let prs: Vec<_> = app.view.pull_requests().collect();
    app.filtered_indices = filter_prs(&prs, &app.search_query);

    match app.table_state.selected() {
        _ if app.filtered_indices.is_empty() => app.table_state.select(None),
        Some(i) if i >= app.filtered_indices.len() => {
            app.table_state.select(Some(app.filtered_indices.len() - 1))
        }
        None => app.table_state.select(Some(0)),
        Some(_) => {}
    }
}

fn reset_selection(app: &mut App) {
    app.table_state = TableState::default();
    update_filtered_indices(app);
}

fn open_selected(app: &App) {
    if let Some(pr) = app.selected_pr() {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        let _ = ProcessCommand::new(opener).arg(&pr.url).spawn();
    }
}
