use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone as _, Timelike, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use tracing::warn;

use crate::error::{Result, VisitError};

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Convert milliseconds since the Unix epoch into a UTC [`DateTime`].
pub fn from_epoch_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(VisitError::TimestampOutOfRange(millis))
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Naive layouts accepted by [`TimezoneHandler::parse_timestamp`].
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Owns the single timezone in which wall-clock hours and calendar days are
/// judged, and parses timestamps that carry no offset of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneHandler {
    default_tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler with the given IANA timezone name as the default.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { default_tz: tz }
    }

    /// Handler for the timezone the host clock runs in.
    pub fn system() -> Self {
        Self::new(&get_system_timezone())
    }

    pub fn from_tz(tz: Tz) -> Self {
        Self { default_tz: tz }
    }

    /// Parse an RFC 3339 timestamp, or a naive date / date-time which is read
    /// as wall-clock time in the handler's timezone.
    ///
    /// Returns `None` for empty strings, unrecognised formats and local times
    /// skipped by a DST transition. Ambiguous local times resolve to the
    /// earlier instant.
    pub fn parse_timestamp(&self, s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let normalised = match s.strip_suffix('Z') {
            Some(stripped) => format!("{}+00:00", stripped),
            None => s.to_string(),
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&Utc));
        }

        let naive = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            });

        let Some(naive) = naive else {
            warn!("TimezoneHandler: could not parse timestamp \"{}\"", s);
            return None;
        };

        let local = self.default_tz.from_local_datetime(&naive).earliest();
        if local.is_none() {
            warn!(
                "TimezoneHandler: \"{}\" does not exist in {}",
                s, self.default_tz
            );
        }
        local.map(|dt| dt.with_timezone(&Utc))
    }

    /// Parse a JSON timestamp: numbers are epoch milliseconds, strings go
    /// through [`parse_timestamp`](Self::parse_timestamp).
    pub fn parse_value(&self, value: &Value) -> Result<DateTime<Utc>> {
        match value {
            Value::Number(n) => {
                if let Some(millis) = n.as_i64() {
                    from_epoch_millis(millis)
                } else if let Some(f) = n.as_f64() {
                    from_epoch_millis(f.trunc() as i64)
                } else {
                    Err(VisitError::TimestampParse(n.to_string()))
                }
            }
            Value::String(s) => self
                .parse_timestamp(s)
                .ok_or_else(|| VisitError::TimestampParse(s.clone())),
            other => Err(VisitError::TimestampParse(other.to_string())),
        }
    }

    /// Validate that `tz_name` is a recognised IANA timezone identifier.
    pub fn validate_timezone(tz_name: &str) -> bool {
        tz_name.parse::<Tz>().is_ok()
    }

    /// Wall-clock hour (0-23) of `ts` in the handler's timezone.
    pub fn local_hour(&self, ts: DateTime<Utc>) -> u32 {
        ts.with_timezone(&self.default_tz).hour()
    }

    /// Calendar day of `ts` in the handler's timezone.
    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.default_tz).date_naive()
    }

    /// Expose the configured default timezone.
    pub fn timezone(&self) -> Tz {
        self.default_tz
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
