mod bootstrap;
mod report;

use anyhow::{Context, Result};
use visit_core::settings::Settings;
use visit_data::reader::load_events;
use visit_data::VisitStatisticsBuilder;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("visit-stats v{} starting", env!("CARGO_PKG_VERSION"));

    let handler = settings.timezone_handler()?;
    let policy = settings.policy()?;
    tracing::info!(
        "Timezone: {}, allowed hours: {:02}:00-{:02}:00",
        handler.timezone(),
        policy.opens_at,
        policy.closes_at
    );

    let events = load_events(&settings.events, &handler)
        .with_context(|| format!("loading {}", settings.events.display()))?;

    let (from, to) = settings.window(&handler)?;
    let stats = match bootstrap::resolve_window(from, to, &events) {
        Some((start, end)) => {
            tracing::info!("Reporting window: {} .. {}", start, end);
            VisitStatisticsBuilder::new(handler)
                .with_policy(policy)
                .include_zero_time(settings.include_zero_time)
                .build(&events, start, end)
        }
        None => {
            tracing::warn!("No events and no explicit window; nothing to report");
            Vec::new()
        }
    };

    let output = if settings.format == "json" {
        report::render_json(&stats)?
    } else {
        report::render_table(&stats)
    };
    print!("{}", output);
    if settings.format == "json" {
        println!();
    }

    Ok(())
}
