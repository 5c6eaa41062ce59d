use visit_core::formatting::{format_hours, format_number, percentage};
use visit_core::models::{PersonVisitStats, StatisticsSummary};

/// Render the statistics as an aligned plain-text table with a totals line.
pub fn render_table(stats: &[PersonVisitStats]) -> String {
    let id_width = stats
        .iter()
        .map(|s| s.id.to_string().len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut out = format!("{:<id_width$}  {:>10}  {:>8}  SUSPICIOUS\n", "ID", "TIME", "HOURS");
    for s in stats {
        out.push_str(&format!(
            "{:<id_width$}  {:>10}  {:>8}  {}\n",
            s.id.to_string(),
            format_hours(s.time),
            format_number(s.time, 2),
            if s.has_suspicious_visits { "yes" } else { "no" },
        ));
    }

    let summary = StatisticsSummary::from_stats(stats);
    out.push_str(&format!(
        "\n{} people, {} hours total, {} suspicious ({}%)\n",
        summary.people,
        format_number(summary.total_hours, 2),
        summary.suspicious_people,
        percentage(summary.suspicious_people as f64, summary.people as f64, 1),
    ));
    out
}

/// Render the statistics as a pretty-printed JSON array.
pub fn render_json(stats: &[PersonVisitStats]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(stats)
}
