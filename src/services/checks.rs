use crate::data::{ApiCheckRun, CheckRunEntry};

/// Project raw check runs into display entries, keeping order and count.
/// Missing fields become empty rather than failing the whole list.
pub fn map_check_runs(runs: &[ApiCheckRun]) -> Vec<CheckRunEntry> {
    runs.iter()
        .map(|run| CheckRunEntry {
            app_slug: run
                .app
                .as_ref()
                .and_then(|app| app.slug.clone())
                .unwrap_or_default(),
            name: run.name.clone().unwrap_or_default(),
            status: run.status.clone(),
            conclusion: run.conclusion.clone(),
            details_url: run.details_url.clone(),
        })
        .collect()
}
