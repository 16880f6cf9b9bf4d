use time::OffsetDateTime;
use time::macros::format_description;

const MINUTE_MS: i128 = 60_000;
const HOUR_MS: i128 = 3_600_000;
const DAY_MS: i128 = 86_400_000;

/// Human label for how long ago `timestamp` was, as seen from `now`.
///
/// Anything a week or older falls back to a short date, rendered in `now`'s
/// offset. The year is only spelled out when it differs from `now`'s year.
/// A `now` earlier than `timestamp` reads as "Just now".
pub fn relative_label(timestamp: OffsetDateTime, now: OffsetDateTime) -> String {
    let elapsed_ms = (now - timestamp).whole_milliseconds().max(0);

    let minutes = elapsed_ms / MINUTE_MS;
    let hours = elapsed_ms / HOUR_MS;
    let days = elapsed_ms / DAY_MS;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        ago(minutes, "minute")
    } else if hours < 24 {
        ago(hours, "hour")
    } else if days < 7 {
        ago(days, "day")
    } else {
        short_date(timestamp.to_offset(now.offset()), now.year())
    }
}

fn ago(n: i128, unit: &str) -> String {
    if n > 1 {
        format!("{n} {unit}s ago")
    } else {
        format!("{n} {unit} ago")
    }
}

fn short_date(date: OffsetDateTime, current_year: i32) -> String {
    let formatted = if date.year() == current_year {
        date.format(format_description!("[month repr:short] [day padding:none]"))
    } else {
        date.format(format_description!(
            "[month repr:short] [day padding:none], [year]"
        ))
    };
    // Formatting a calendar date with these components cannot fail in practice.
    formatted.unwrap_or_else(|_| date.date().to_string())
}
