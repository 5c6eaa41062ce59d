//! JSON badge log loading.
//!
//! A log is a JSON array of `{ "id", "date", "type" }` records. `date` may be
//! epoch milliseconds or a timestamp string; strings without an offset are read
//! in the handler's timezone.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use visit_core::error::{Result, VisitError};
use visit_core::models::{Event, EventKind, PersonId};
use visit_core::time_utils::TimezoneHandler;

/// A record as it appears on disk, before validation.
#[derive(Debug, Deserialize)]
struct RawEvent {
    id: Option<PersonId>,
    date: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<EventKind>,
}

/// Read and parse the badge log at `path`.
pub fn load_events(path: &Path, handler: &TimezoneHandler) -> Result<Vec<Event>> {
    let content = std::fs::read_to_string(path).map_err(|source| VisitError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let events = parse_events(&content, handler)?;
    debug!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Parse a JSON array of badge records, preserving input order.
///
/// Records lacking an `id` or `date`, or whose `date` cannot be parsed, are
/// skipped with a warning. A missing `type` is treated as unknown.
pub fn parse_events(json: &str, handler: &TimezoneHandler) -> Result<Vec<Event>> {
    let document: Value = serde_json::from_str(json)?;
    let Value::Array(records) = document else {
        return Err(VisitError::InvalidEvent(
            "expected a JSON array of events".to_string(),
        ));
    };

    let total = records.len();
    let events: Vec<Event> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| convert_record(index, record, handler))
        .collect();

    if events.len() < total {
        warn!("Skipped {} of {} badge records", total - events.len(), total);
    }

    Ok(events)
}

fn convert_record(index: usize, record: Value, handler: &TimezoneHandler) -> Option<Event> {
    let raw: RawEvent = match serde_json::from_value(record) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Record {}: malformed badge record: {}", index, e);
            return None;
        }
    };

    let (Some(id), Some(date)) = (raw.id, raw.date) else {
        warn!("Record {}: missing id or date", index);
        return None;
    };

    match handler.parse_value(&date) {
        Ok(date) => Some(Event {
            id,
            date,
            kind: raw.kind.unwrap_or(EventKind::Other),
        }),
        Err(e) => {
            warn!("Record {}: {}", index, e);
            None
        }
    }
}
