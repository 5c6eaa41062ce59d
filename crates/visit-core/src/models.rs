use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a badge holder.
///
/// Badge logs carry either numeric or textual ids; both are accepted and only
/// ever compared for equality and ordering. Numeric ids sort before textual ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonId::Number(n) => write!(f, "{}", n),
            PersonId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for PersonId {
    fn from(value: i64) -> Self {
        PersonId::Number(value)
    }
}

impl From<i32> for PersonId {
    fn from(value: i32) -> Self {
        PersonId::Number(i64::from(value))
    }
}

impl From<&str> for PersonId {
    fn from(value: &str) -> Self {
        PersonId::Text(value.to_string())
    }
}

impl From<String> for PersonId {
    fn from(value: String) -> Self {
        PersonId::Text(value)
    }
}

/// Direction of a badge scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The person entered the building.
    In,
    /// The person left the building.
    Out,
    /// Any tag the reader did not recognise. Ignored by the aggregation.
    #[serde(other)]
    Other,
}

/// A single badge scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Who scanned the badge.
    pub id: PersonId,
    /// When the scan happened.
    pub date: DateTime<Utc>,
    /// Whether this was an entry or an exit.
    #[serde(rename = "type")]
    pub kind: EventKind,
}

impl Event {
    pub fn new(id: impl Into<PersonId>, date: DateTime<Utc>, kind: EventKind) -> Self {
        Self {
            id: id.into(),
            date,
            kind,
        }
    }

    /// Shorthand for an [`EventKind::In`] scan.
    pub fn check_in(id: impl Into<PersonId>, date: DateTime<Utc>) -> Self {
        Self::new(id, date, EventKind::In)
    }

    /// Shorthand for an [`EventKind::Out`] scan.
    pub fn check_out(id: impl Into<PersonId>, date: DateTime<Utc>) -> Self {
        Self::new(id, date, EventKind::Out)
    }
}

/// Occupancy statistics for one person over a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonVisitStats {
    pub id: PersonId,
    /// Hours spent inside, summed over matched in/out pairs.
    pub time: f64,
    /// Set once any scan broke the pairing or allowed-hours rules.
    pub has_suspicious_visits: bool,
}

/// Totals across a whole statistics report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    /// Number of people in the report.
    pub people: usize,
    /// Sum of `time` across all people.
    pub total_hours: f64,
    /// Number of people flagged as suspicious.
    pub suspicious_people: usize,
}

impl StatisticsSummary {
    pub fn from_stats(stats: &[PersonVisitStats]) -> Self {
        stats.iter().fold(Self::default(), |mut acc, s| {
            acc.people += 1;
            acc.total_hours += s.time;
            if s.has_suspicious_visits {
                acc.suspicious_people += 1;
            }
            acc
        })
    }
}
