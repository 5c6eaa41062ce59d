//! Window selection and per-person bucketing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use visit_core::models::{Event, PersonId};

/// `true` when `event` falls inside `[start, end]` (both bounds inclusive).
pub fn in_window(event: &Event, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    event.date >= start && event.date <= end
}

/// Copy the events inside `[start, end]` into one bucket per person.
///
/// Within a bucket events keep their input order; no sorting happens here.
/// Buckets iterate in ascending [`PersonId`] order. An inverted window simply
/// selects nothing.
pub fn group_by_person(
    events: &[Event],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> BTreeMap<PersonId, Vec<Event>> {
    let mut store: BTreeMap<PersonId, Vec<Event>> = BTreeMap::new();

    for event in events.iter().filter(|e| in_window(e, start, end)) {
        store.entry(event.id.clone()).or_default().push(event.clone());
    }

    debug!(
        "Selected {} of {} events for {} people in window {} .. {}",
        store.values().map(Vec::len).sum::<usize>(),
        events.len(),
        store.len(),
        start,
        end
    );

    store
}
