//! Plain-text rendering of the view state, used by `--once`.

use chrono::{DateTime, TimeZone};
use std::fmt::Write;

use crate::app::ViewState;
use crate::utils::updated_label;

/// Render every repository's pull requests with their statuses and check runs.
pub fn render_plain<Tz: TimeZone>(state: &ViewState, username: &str, now: &DateTime<Tz>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pull Requests for {username}");

    if let Some(warning) = &state.warning {
        let _ = writeln!(out, "! {warning}");
    }

    for (repo, pull_requests) in &state.display_issues {
        if pull_requests.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{repo}");
        for pr in pull_requests {
            let _ = writeln!(out, "  #{} {} ({} comments)", pr.number, pr.title, pr.comment_count);
            let labels: Vec<&str> = pr.labels.iter().map(|l| l.name.as_str()).collect();
            if labels.is_empty() {
                let _ = writeln!(out, "    updated {}", updated_label(pr.updated_at, now));
            } else {
                let _ = writeln!(
                    out,
                    "    [{}] updated {}",
                    labels.join("] ["),
                    updated_label(pr.updated_at, now)
                );
            }
            for (context, entry) in &pr.statuses {
                let (symbol, _) = entry.state.display();
                let _ = writeln!(out, "    {symbol} {context} {}", entry.description);
            }
            for run in &pr.check_runs {
                let (symbol, _) = run.state().display();
                let _ = writeln!(out, "    {symbol} {}", run.key());
            }
        }
    }

    if !state.last_checked.is_empty() {
        let _ = writeln!(out, "\n{}", state.last_checked);
    }
    out
}
