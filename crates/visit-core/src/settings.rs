use chrono::{DateTime, Utc};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{Result, VisitError};
use crate::policy::AccessPolicy;
use crate::time_utils::{from_epoch_millis, get_system_timezone, TimezoneHandler};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Per-person building occupancy statistics from badge in/out logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "visit-stats",
    about = "Per-person building occupancy statistics from badge in/out logs",
    version
)]
pub struct Settings {
    /// JSON file holding an array of {id, date, type} badge events
    #[arg(long)]
    pub events: PathBuf,

    /// Start of the reporting window, inclusive (epoch ms, RFC 3339 or local date-time)
    #[arg(long)]
    pub from: Option<String>,

    /// End of the reporting window, inclusive (epoch ms, RFC 3339 or local date-time)
    #[arg(long)]
    pub to: Option<String>,

    /// Timezone used for opening hours and calendar days (auto-detected if not specified)
    #[arg(long, env = "VISIT_STATS_TIMEZONE", default_value = "auto")]
    pub timezone: String,

    /// First allowed hour of the day (0-23)
    #[arg(long, default_value = "6", value_parser = clap::value_parser!(u32).range(0..=23))]
    pub opens_at: u32,

    /// Hour from which scans are late (1-24)
    #[arg(long, default_value = "23", value_parser = clap::value_parser!(u32).range(1..=24))]
    pub closes_at: u32,

    /// Also report people who were flagged but accumulated no time
    #[arg(long)]
    pub include_zero_time: bool,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and resolve `"auto"` values.
    pub fn load() -> Self {
        Self::resolve_auto_values(Settings::parse())
    }

    /// Same as [`load`](Self::load) but over an explicit argument list,
    /// returning clap's error instead of exiting.
    pub fn load_from_args<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve_auto_values)
    }

    /// Resolve the `"auto"` timezone and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = get_system_timezone();
        }
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The allowed-hours window, validated.
    pub fn policy(&self) -> Result<AccessPolicy> {
        AccessPolicy::new(self.opens_at, self.closes_at)
    }

    /// Handler for the configured timezone.
    ///
    /// Unlike [`TimezoneHandler::new`], an unknown name is an error here: a
    /// silent fallback would change which scans are flagged.
    pub fn timezone_handler(&self) -> Result<TimezoneHandler> {
        if !TimezoneHandler::validate_timezone(&self.timezone) {
            return Err(VisitError::Config(format!(
                "unknown timezone \"{}\"",
                self.timezone
            )));
        }
        Ok(TimezoneHandler::new(&self.timezone))
    }

    /// Parsed `--from` / `--to` bounds; `None` where the flag was omitted.
    pub fn window(
        &self,
        handler: &TimezoneHandler,
    ) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
        let start = self
            .from
            .as_deref()
            .map(|s| parse_bound(handler, s))
            .transpose()?;
        let end = self
            .to
            .as_deref()
            .map(|s| parse_bound(handler, s))
            .transpose()?;
        Ok((start, end))
    }
}

/// A window bound is either a bare integer (epoch ms) or any timestamp the
/// handler understands.
fn parse_bound(handler: &TimezoneHandler, raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(millis) = raw.trim().parse::<i64>() {
        return from_epoch_millis(millis);
    }
    handler
        .parse_timestamp(raw)
        .ok_or_else(|| VisitError::TimestampParse(raw.to_string()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
