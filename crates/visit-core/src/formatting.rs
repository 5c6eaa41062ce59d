/// Format a number with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use visit_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(16.0, 2), "16.00");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP so exact midpoints such as 1.005 round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let grouped = group_thousands(&(rounded.trunc() as u64).to_string());

    let body = if decimals == 0 {
        grouped
    } else {
        let frac = format!(
            "{:.prec$}",
            rounded - rounded.trunc(),
            prec = decimals as usize
        );
        // `frac` looks like "0.50"; keep ".50".
        format!("{}{}", grouped, &frac[1..])
    };

    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

/// Format a number of hours as `"16h"`, `"30h 30m"` or `"45m"`.
///
/// Rounded to the nearest minute.
///
/// # Examples
///
/// ```
/// use visit_core::formatting::format_hours;
///
/// assert_eq!(format_hours(16.0), "16h");
/// assert_eq!(format_hours(30.5), "30h 30m");
/// assert_eq!(format_hours(0.75), "45m");
/// ```
pub fn format_hours(hours: f64) -> String {
    let total_mins = (hours * 60.0).round() as i64;
    if total_mins < 60 {
        return format!("{}m", total_mins);
    }
    let (h, m) = (total_mins / 60, total_mins % 60);
    if m == 0 {
        format!("{}h", h)
    } else {
        format!("{}h {}m", h, m)
    }
}

/// `(part / whole) * 100`, rounded to `decimal_places`. Zero when `whole` is zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let factor = 10_f64.powi(decimal_places as i32);
    ((part / whole) * 100.0 * factor).round() / factor
}

fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && i % 3 == remainder {
            out.push(',');
        }
        out.push(c);
    }
    out
}
