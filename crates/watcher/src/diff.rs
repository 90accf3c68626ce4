use std::collections::HashMap;

use crate::model::{Alert, ChangeSet, TrackedAlert};

/// Compares the current fetch against the previously persisted snapshot.
///
/// An alert is notifiable when its id was not seen before or its
/// description changed (exact string inequality). When the current fetch
/// is empty and prior state was not, the result is an all-clear and no
/// per-alert diffing happens at all.
pub fn diff(current: &[Alert], previous: &[TrackedAlert]) -> ChangeSet {
    if current.is_empty() {
        return ChangeSet {
            to_notify: Vec::new(),
            all_clear: !previous.is_empty(),
        };
    }

    let seen: HashMap<&str, &TrackedAlert> =
        previous.iter().map(|t| (t.id.as_str(), t)).collect();

    let to_notify = current
        .iter()
        .filter(|alert| {
            seen.get(alert.id.as_str())
                .is_none_or(|tracked| tracked.description != alert.description)
        })
        .cloned()
        .collect();

    ChangeSet {
        to_notify,
        all_clear: false,
    }
}

/// Derives the snapshot persisted at cycle end. The store is replaced
/// wholesale, which implicitly expires alerts that stopped appearing in
/// the feed without an explicit clear event.
pub fn snapshot(current: &[Alert]) -> Vec<TrackedAlert> {
    current
        .iter()
        .map(|alert| TrackedAlert {
            id: alert.id.clone(),
            destination: alert.destination.clone(),
            description: alert.description.clone(),
        })
        .collect()
}
