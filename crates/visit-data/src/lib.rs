//! Occupancy aggregation over badge event logs.
//!
//! Loads `{id, date, type}` event arrays, selects the events inside a
//! reporting window, groups them per person, folds each person's scans into
//! hours present plus an anomaly flag, and projects the final report.

pub mod grouper;
pub mod predicates;
pub mod reader;
pub mod reducer;
pub mod statistics;

pub use statistics::{build_visit_statistics, VisitStatisticsBuilder};
