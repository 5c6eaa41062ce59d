//! Per-person fold from a chronological scan list to hours and an anomaly flag.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use visit_core::models::{Event, EventKind};

use crate::predicates::AnomalyClassifier;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Whether the person is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitPhase {
    /// An entry has been seen and not yet closed by an exit.
    Open,
    /// No visit in progress.
    Closed,
}

/// State threaded through the fold over one person's scans.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitState {
    pub phase: VisitPhase,
    /// Entry time of the open visit; the window start until the first entry.
    pub period_start: DateTime<Utc>,
    /// Hours accumulated over closed visits.
    pub hours: f64,
    /// Sticky: never reset once set.
    pub has_suspicious_visits: bool,
}

impl VisitState {
    pub fn new(window_start: DateTime<Utc>) -> Self {
        Self {
            phase: VisitPhase::Closed,
            period_start: window_start,
            hours: 0.0,
            has_suspicious_visits: false,
        }
    }

    fn flagged(mut self) -> Self {
        self.has_suspicious_visits = true;
        self
    }

    /// Consume one scan. `previous` is the scan immediately before `event` in
    /// the sorted list, whatever its kind.
    pub fn step(
        mut self,
        event: &Event,
        previous: Option<&Event>,
        classifier: &AnomalyClassifier,
    ) -> Self {
        match event.kind {
            EventKind::Other => {
                warn!("Ignoring badge event of unknown type for {} at {}", event.id, event.date);
                return self;
            }
            EventKind::Out if !previous.is_some_and(|p| p.kind == EventKind::In) => {
                debug!("Unmatched exit for {} at {}", event.id, event.date);
                return self.flagged();
            }
            _ => {}
        }

        if classifier.is_suspicious_record(event, previous) {
            self = self.flagged();
        }

        match (event.kind, self.phase) {
            (EventKind::In, VisitPhase::Closed) => {
                self.period_start = event.date;
                self.phase = VisitPhase::Open;
            }
            (EventKind::Out, VisitPhase::Open) => {
                self.hours += hours_between(self.period_start, event.date);
                self.phase = VisitPhase::Closed;
            }
            // Repeated entries while inside are no-ops.
            _ => {}
        }

        self
    }
}

/// Elapsed time in fractional hours.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Sort `events` chronologically (stable, so equal timestamps keep their
/// input order) and fold them into a [`VisitState`].
///
/// A trailing open visit contributes nothing.
pub fn reduce_person(
    events: &mut [Event],
    window_start: DateTime<Utc>,
    classifier: &AnomalyClassifier,
) -> VisitState {
    events.sort_by_key(|e| e.date);

    let events = &*events;
    events
        .iter()
        .enumerate()
        .fold(VisitState::new(window_start), |state, (j, event)| {
            let previous = j.checked_sub(1).map(|p| &events[p]);
            state.step(event, previous, classifier)
        })
}
