// Time labels for hour rows and event blocks, in 12h or 24h style

use chrono::{DateTime, NaiveTime, TimeZone};

use crate::models::grid::GridGeometry;
use crate::models::settings::TimeFormat;

fn time_pattern(format: TimeFormat) -> &'static str {
    match format {
        TimeFormat::TwentyFourHour => "%H:%M",
        TimeFormat::TwelveHour => "%-I:%M %p",
    }
}

/// One label per visible hour row, top to bottom.
pub fn hour_labels(grid: &GridGeometry, format: TimeFormat) -> Vec<String> {
    (grid.start_hour()..grid.end_hour())
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .map(|time| match format {
            TimeFormat::TwentyFourHour => time.format("%H:%M").to_string(),
            TimeFormat::TwelveHour => time.format("%-I %p").to_string(),
        })
        .collect()
}

/// `start - end` in local time, or just `start` for zero-duration events.
pub fn time_range_label<Z: TimeZone>(start: &DateTime<Z>, end: &DateTime<Z>, format: TimeFormat) -> String
where
    Z::Offset: std::fmt::Display,
{
    let pattern = time_pattern(format);
    if end <= start {
        return start.format(pattern).to_string();
    }
    format!("{} - {}", start.format(pattern), end.format(pattern))
}
