use chrono::{DateTime, Utc};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use visit_core::models::Event;

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI log level name onto an [`EnvFilter`] directive.
///
/// Unrecognised names fall back to `"info"`.
pub fn filter_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber, writing to stderr so the
/// report on stdout stays machine-readable.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()?;

    Ok(())
}

// ── Window resolution ──────────────────────────────────────────────────────────

/// Fill in missing window bounds from the earliest and latest event.
///
/// Returns `None` when a bound is missing and there are no events to derive
/// it from.
pub fn resolve_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    events: &[Event],
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = start.or_else(|| events.iter().map(|e| e.date).min())?;
    let end = end.or_else(|| events.iter().map(|e| e.date).max())?;
    Some((start, end))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
