//! Entry point tying the window filter, the per-person fold and the final
//! projection together.

use chrono::{DateTime, Utc};
use tracing::debug;
use visit_core::models::{Event, PersonId, PersonVisitStats};
use visit_core::policy::AccessPolicy;
use visit_core::time_utils::TimezoneHandler;

use crate::grouper::group_by_person;
use crate::predicates::AnomalyClassifier;
use crate::reducer::{reduce_person, VisitState};

// ── VisitStatisticsBuilder ────────────────────────────────────────────────────

/// Computes per-person occupancy statistics for a reporting window.
///
/// Hours of day and calendar days are judged in the builder's timezone.
/// Each [`build`](Self::build) call is independent; the builder holds only
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitStatisticsBuilder {
    classifier: AnomalyClassifier,
    include_zero_time: bool,
}

impl VisitStatisticsBuilder {
    /// Builder with the default opening hours (06:00 to 23:00) in `timezone`.
    pub fn new(timezone: TimezoneHandler) -> Self {
        Self {
            classifier: AnomalyClassifier::new(AccessPolicy::default(), timezone),
            include_zero_time: false,
        }
    }

    /// Builder judging hours on the host's clock.
    pub fn local() -> Self {
        Self::new(TimezoneHandler::system())
    }

    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.classifier = AnomalyClassifier::new(policy, self.classifier.timezone());
        self
    }

    /// Keep people who accumulated no time in the report. Off by default, so
    /// someone with only an unmatched exit is left out even though flagged.
    pub fn include_zero_time(mut self, include: bool) -> Self {
        self.include_zero_time = include;
        self
    }

    pub fn classifier(&self) -> &AnomalyClassifier {
        &self.classifier
    }

    /// Statistics for every person with scans inside `[period_start, period_end]`.
    ///
    /// The result is ordered by [`PersonId`]. `events` is left untouched.
    pub fn build(
        &self,
        events: &[Event],
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Vec<PersonVisitStats> {
        let groups = group_by_person(events, period_start, period_end);

        let folded = groups.into_iter().map(|(id, mut person_events)| {
            let state = reduce_person(&mut person_events, period_start, &self.classifier);
            (id, state)
        });

        let stats = project(folded, self.include_zero_time);
        debug!("Built visit statistics for {} people", stats.len());
        stats
    }
}

/// Shorthand for [`VisitStatisticsBuilder::local`] followed by
/// [`build`](VisitStatisticsBuilder::build).
pub fn build_visit_statistics(
    events: &[Event],
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
) -> Vec<PersonVisitStats> {
    VisitStatisticsBuilder::local().build(events, period_start, period_end)
}

// ── Projection ────────────────────────────────────────────────────────────────

/// Turn folded states into report rows, dropping zero-time people unless
/// `include_zero_time` is set.
pub fn project(
    folded: impl IntoIterator<Item = (PersonId, VisitState)>,
    include_zero_time: bool,
) -> Vec<PersonVisitStats> {
    folded
        .into_iter()
        .filter(|(_, state)| include_zero_time || state.hours > 0.0)
        .map(|(id, state)| PersonVisitStats {
            id,
            time: state.hours,
            has_suspicious_visits: state.has_suspicious_visits,
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_events;
    use crate::reducer::VisitPhase;

    const CORRECT_DATA: &str = include_str!("../fixtures/correct_data.json");
    const OUT_WITHOUT_IN: &str = include_str!("../fixtures/out_without_in.json");
    const EARLY_IN: &str = include_str!("../fixtures/early_in.json");
    const LATE_OUT: &str = include_str!("../fixtures/late_out.json");
    const NIGHT_PRESENCE: &str = include_str!("../fixtures/night_presence.json");

    fn handler() -> TimezoneHandler {
        TimezoneHandler::new("Europe/Moscow")
    }

    fn builder() -> VisitStatisticsBuilder {
        VisitStatisticsBuilder::new(handler())
    }

    fn local(s: &str) -> DateTime<Utc> {
        handler().parse_timestamp(s).unwrap()
    }

    /// Events from the listed fixtures, concatenated in order.
    fn fixtures(sources: &[&str]) -> Vec<Event> {
        sources
            .iter()
            .flat_map(|json| parse_events(json, &handler()).unwrap())
            .collect()
    }

    fn run(sources: &[&str]) -> Vec<PersonVisitStats> {
        builder().build(
            &fixtures(sources),
            local("2019-04-05"),
            local("2019-04-08"),
        )
    }

    fn row(id: i64, time: f64, suspicious: bool) -> PersonVisitStats {
        PersonVisitStats {
            id: PersonId::from(id),
            time,
            has_suspicious_visits: suspicious,
        }
    }

    // ── Scenarios ────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_period_returns_nothing() {
        let stats = builder().build(
            &fixtures(&[CORRECT_DATA]),
            local("2019-05-05"),
            local("2019-05-08"),
        );
        assert!(stats.is_empty());
    }

    #[test]
    fn test_counts_time_spent_in_building() {
        assert_eq!(
            run(&[CORRECT_DATA]),
            vec![row(0, 16.0, false), row(1, 16.0, false), row(2, 16.0, false)]
        );
    }

    #[test]
    fn test_flags_exit_without_entry() {
        assert_eq!(
            run(&[OUT_WITHOUT_IN, CORRECT_DATA]),
            vec![row(0, 16.0, true), row(1, 16.0, false), row(2, 16.0, false)]
        );
    }

    #[test]
    fn test_flags_presence_before_six() {
        assert_eq!(
            run(&[EARLY_IN, CORRECT_DATA]),
            vec![row(0, 20.0, true), row(1, 16.0, false), row(2, 16.0, false)]
        );
    }

    #[test]
    fn test_flags_presence_after_eleven() {
        assert_eq!(
            run(&[LATE_OUT, CORRECT_DATA]),
            vec![row(0, 30.5, true), row(1, 16.0, false), row(2, 16.0, false)]
        );
    }

    #[test]
    fn test_flags_overnight_presence() {
        assert_eq!(
            run(&[NIGHT_PRESENCE, CORRECT_DATA]),
            vec![
                row(0, 16.0, false),
                row(1, 16.0, false),
                row(2, 16.0, false),
                row(5, 10.0, true),
            ]
        );
    }

    // ── Window and projection rules ──────────────────────────────────────────

    #[test]
    fn test_events_outside_window_have_no_influence() {
        let mut events = fixtures(&[CORRECT_DATA]);
        let baseline = builder().build(&events, local("2019-04-05"), local("2019-04-08"));

        events.push(Event::check_out(1, local("2019-04-04 23:59:59")));
        events.push(Event::check_in(1, local("2019-04-08 00:00:01")));
        let with_noise = builder().build(&events, local("2019-04-05"), local("2019-04-08"));

        assert_eq!(with_noise, baseline);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let events = vec![
            Event::check_in(1, local("2019-04-05 09:00:00")),
            Event::check_out(1, local("2019-04-05 17:00:00")),
        ];
        let stats = builder().build(
            &events,
            local("2019-04-05 09:00:00"),
            local("2019-04-05 17:00:00"),
        );
        assert_eq!(stats, vec![row(1, 8.0, false)]);
    }

    #[test]
    fn test_zero_time_people_are_hidden_by_default() {
        let events = vec![Event::check_out(9, local("2019-04-05 12:00:00"))];
        let window = (local("2019-04-05"), local("2019-04-08"));

        assert!(builder().build(&events, window.0, window.1).is_empty());

        let stats = builder()
            .include_zero_time(true)
            .build(&events, window.0, window.1);
        assert_eq!(stats, vec![row(9, 0.0, true)]);
    }

    #[test]
    fn test_caller_events_are_not_reordered() {
        let events = fixtures(&[CORRECT_DATA]);
        let before = events.clone();
        let _ = builder().build(&events, local("2019-04-05"), local("2019-04-08"));
        assert_eq!(events, before);
    }

    #[test]
    fn test_custom_policy_changes_classification() {
        let policy = AccessPolicy::new(10, 20).unwrap();
        let stats = builder().with_policy(policy).build(
            &fixtures(&[CORRECT_DATA]),
            local("2019-04-05"),
            local("2019-04-08"),
        );
        // Everyone arrives before 10:00.
        assert!(stats.iter().all(|s| s.has_suspicious_visits));
        assert!(stats.iter().all(|s| s.time == 16.0));
    }

    #[test]
    fn test_timezone_changes_classification() {
        // 09:00 in Moscow is 02:00 in New York.
        let stats = VisitStatisticsBuilder::new(TimezoneHandler::new("America/New_York")).build(
            &fixtures(&[CORRECT_DATA]),
            local("2019-04-05"),
            local("2019-04-08"),
        );
        assert!(stats.iter().all(|s| s.has_suspicious_visits));
    }

    #[test]
    fn test_unknown_event_types_are_ignored() {
        let events = vec![
            Event::check_in(1, local("2019-04-05 09:00:00")),
            Event::new(1, local("2019-04-05 02:00:00"), visit_core::models::EventKind::Other),
            Event::check_out(1, local("2019-04-05 17:00:00")),
        ];
        let stats = builder().build(&events, local("2019-04-05"), local("2019-04-08"));
        assert_eq!(stats, vec![row(1, 8.0, false)]);
    }

    #[test]
    fn test_build_visit_statistics_uses_host_clock() {
        let events = vec![
            Event::check_in(1, local("2019-04-05 12:00:00")),
            Event::check_out(1, local("2019-04-05 13:00:00")),
        ];
        let stats = build_visit_statistics(&events, local("2019-04-05"), local("2019-04-08"));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].time, 1.0);
    }

    // ── project ──────────────────────────────────────────────────────────────

    #[test]
    fn test_project_filters_zero_time() {
        let start = local("2019-04-05");
        let mut counted = VisitState::new(start);
        counted.hours = 2.0;
        let mut idle = VisitState::new(start);
        idle.has_suspicious_visits = true;
        idle.phase = VisitPhase::Open;

        let rows = project(
            vec![(PersonId::from(1), counted), (PersonId::from(2), idle)],
            false,
        );
        assert_eq!(rows, vec![row(1, 2.0, false)]);
    }
}
