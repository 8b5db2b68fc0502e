use std::collections::BTreeMap;

use crate::data::{ApiStatus, StatusEntry};

/// Fold raw commit statuses into one entry per context.
///
/// Records are applied in order. A context that already holds a terminal
/// state (`success` or `failure`) keeps it; any other stored state is replaced
/// by the next record for that context.
pub fn merge_statuses(statuses: &[ApiStatus]) -> BTreeMap<String, StatusEntry> {
    let mut merged: BTreeMap<String, StatusEntry> = BTreeMap::new();

    for status in statuses {
        let entry = StatusEntry {
            state: status.state,
            description: status.description.clone().unwrap_or_default(),
        };

        match merged.get_mut(&status.context) {
            Some(current) if current.state.is_terminal() => {}
            Some(current) => *current = entry,
            None => {
                merged.insert(status.context.clone(), entry);
            }
        }
    }

    merged
}
