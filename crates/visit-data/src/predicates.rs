//! Rules that mark a badge scan as suspicious.

use chrono::{DateTime, Utc};
use visit_core::models::{Event, EventKind};
use visit_core::policy::AccessPolicy;
use visit_core::time_utils::TimezoneHandler;

/// Classifies scans against an [`AccessPolicy`], reading hours and calendar
/// days in one fixed timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyClassifier {
    policy: AccessPolicy,
    timezone: TimezoneHandler,
}

impl AnomalyClassifier {
    pub fn new(policy: AccessPolicy, timezone: TimezoneHandler) -> Self {
        Self { policy, timezone }
    }

    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    pub fn timezone(&self) -> TimezoneHandler {
        self.timezone
    }

    /// The local hour of `ts` lies outside opening hours.
    pub fn is_out_of_allowed_hours(&self, ts: DateTime<Utc>) -> bool {
        self.policy.is_outside(self.timezone.local_hour(ts))
    }

    /// `previous` falls on an earlier local calendar day than `current`.
    ///
    /// Only the dates are compared; a five-minute span across midnight counts.
    pub fn crossed_midnight_boundary(
        &self,
        current: DateTime<Utc>,
        previous: DateTime<Utc>,
    ) -> bool {
        self.timezone.local_date(previous) < self.timezone.local_date(current)
    }

    /// An exit whose paired entry happened before opening or on a previous day.
    pub fn is_suspicious_out(&self, out: DateTime<Utc>, paired_in: DateTime<Utc>) -> bool {
        self.policy
            .is_before_opening(self.timezone.local_hour(paired_in))
            || self.crossed_midnight_boundary(out, paired_in)
    }

    /// Apply the rule matching `event`'s direction.
    ///
    /// Exits are checked against `previous` when there is one. Unknown event
    /// kinds are never suspicious.
    pub fn is_suspicious_record(&self, event: &Event, previous: Option<&Event>) -> bool {
        match event.kind {
            EventKind::In => self.is_out_of_allowed_hours(event.date),
            EventKind::Out => {
                self.is_out_of_allowed_hours(event.date)
                    || previous.is_some_and(|p| self.is_suspicious_out(event.date, p.date))
            }
            EventKind::Other => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> AnomalyClassifier {
        AnomalyClassifier::new(AccessPolicy::default(), TimezoneHandler::new("Europe/Moscow"))
    }

    /// Local Moscow wall-clock time.
    fn local(s: &str) -> DateTime<Utc> {
        TimezoneHandler::new("Europe/Moscow")
            .parse_timestamp(s)
            .unwrap()
    }

    // ── is_out_of_allowed_hours ──────────────────────────────────────────────

    #[test]
    fn test_out_of_allowed_hours_boundaries() {
        let c = classifier();
        assert!(c.is_out_of_allowed_hours(local("2019-04-05 05:59:59")));
        assert!(!c.is_out_of_allowed_hours(local("2019-04-05 06:00:00")));
        assert!(!c.is_out_of_allowed_hours(local("2019-04-05 22:59:59")));
        assert!(c.is_out_of_allowed_hours(local("2019-04-05 23:00:00")));
    }

    #[test]
    fn test_out_of_allowed_hours_uses_local_clock() {
        // 03:00 UTC is 06:00 in Moscow.
        let ts = local("2019-04-05T03:00:00Z");
        assert!(!classifier().is_out_of_allowed_hours(ts));
        let utc = AnomalyClassifier::new(AccessPolicy::default(), TimezoneHandler::new("UTC"));
        assert!(utc.is_out_of_allowed_hours(ts));
    }

    // ── crossed_midnight_boundary ────────────────────────────────────────────

    #[test]
    fn test_crossed_midnight_compares_days_only() {
        let c = classifier();
        assert!(c.crossed_midnight_boundary(
            local("2019-04-06 00:05:00"),
            local("2019-04-05 23:55:00")
        ));
        assert!(!c.crossed_midnight_boundary(
            local("2019-04-05 23:55:00"),
            local("2019-04-05 00:05:00")
        ));
    }

    #[test]
    fn test_crossed_midnight_across_month_end() {
        let c = classifier();
        assert!(c.crossed_midnight_boundary(
            local("2019-05-01 08:00:00"),
            local("2019-04-30 20:00:00")
        ));
    }

    // ── is_suspicious_out ────────────────────────────────────────────────────

    #[test]
    fn test_suspicious_out_after_early_entry() {
        let c = classifier();
        assert!(c.is_suspicious_out(local("2019-04-05 10:00:00"), local("2019-04-05 05:30:00")));
        assert!(!c.is_suspicious_out(local("2019-04-05 10:00:00"), local("2019-04-05 06:30:00")));
    }

    #[test]
    fn test_suspicious_out_after_overnight_stay() {
        let c = classifier();
        assert!(c.is_suspicious_out(local("2019-04-07 08:00:00"), local("2019-04-06 22:00:00")));
    }

    // ── is_suspicious_record ─────────────────────────────────────────────────

    #[test]
    fn test_record_in_checks_hours_only() {
        let c = classifier();
        assert!(c.is_suspicious_record(&Event::check_in(1, local("2019-04-05 04:00:00")), None));
        assert!(!c.is_suspicious_record(&Event::check_in(1, local("2019-04-05 09:00:00")), None));
    }

    #[test]
    fn test_record_late_out() {
        let c = classifier();
        let prev = Event::check_in(1, local("2019-04-05 09:00:00"));
        let out = Event::check_out(1, local("2019-04-05 23:30:00"));
        assert!(c.is_suspicious_record(&out, Some(&prev)));
    }

    #[test]
    fn test_record_clean_out() {
        let c = classifier();
        let prev = Event::check_in(1, local("2019-04-05 09:00:00"));
        let out = Event::check_out(1, local("2019-04-05 17:00:00"));
        assert!(!c.is_suspicious_record(&out, Some(&prev)));
    }

    #[test]
    fn test_record_other_kind_is_never_suspicious() {
        let c = classifier();
        let odd = Event::new(1, local("2019-04-05 03:00:00"), EventKind::Other);
        assert!(!c.is_suspicious_record(&odd, None));
    }

    #[test]
    fn test_custom_policy() {
        let policy = AccessPolicy::new(8, 20).unwrap();
        let c = AnomalyClassifier::new(policy, TimezoneHandler::new("Europe/Moscow"));
        assert!(c.is_out_of_allowed_hours(local("2019-04-05 07:30:00")));
        assert!(c.is_out_of_allowed_hours(local("2019-04-05 20:00:00")));
        assert!(c.is_suspicious_out(local("2019-04-05 12:00:00"), local("2019-04-05 07:30:00")));
    }
}
