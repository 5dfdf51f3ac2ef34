// Date utility functions
// Local-midnight and wall-clock helpers shared by the grid models and the layout pipeline

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Resolve the first instant of `date` in `tz`.
///
/// Some zones skip local midnight on DST days (the clock jumps from 23:59 to 01:00).
/// In that case the earliest existing wall-clock time after midnight is used.
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    let mut probe = midnight;
    // DST gaps never exceed a few hours; walk forward in 15 minute steps.
    for _ in 0..16 {
        if let Some(resolved) = tz.from_local_datetime(&probe).earliest() {
            return resolved;
        }
        probe += Duration::minutes(15);
    }
    tz.from_utc_datetime(&midnight)
}

/// Minutes elapsed on the local wall clock since midnight, seconds truncated.
pub fn wall_clock_minutes<Tz: TimeZone>(instant: &DateTime<Tz>) -> u32 {
    instant.hour() * 60 + instant.minute()
}

/// Wall-clock minutes since midnight, rounded to the nearest minute. May return `1440`.
///
/// Rounding both ends of a split interval the same way keeps the fragment lengths
/// summing to the rounded length of the whole interval.
pub fn wall_clock_minutes_rounded<Tz: TimeZone>(instant: &DateTime<Tz>) -> u32 {
    ((instant.num_seconds_from_midnight() + 30) / 60).min(MINUTES_PER_DAY)
}

/// Fractional wall-clock minutes since midnight, including seconds.
pub fn wall_clock_minutes_precise<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    let seconds = instant.num_seconds_from_midnight() as f64
        + f64::from(instant.nanosecond().min(999_999_999)) / 1_000_000_000.0;
    seconds / 60.0
}

/// Last calendar date an interval `[start, end)` actually touches in local time.
///
/// An end exactly at local midnight belongs to the previous day.
pub fn last_covered_date<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> NaiveDate {
    if end <= start {
        return start.date_naive();
    }
    let end_date = end.date_naive();
    if end.num_seconds_from_midnight() == 0 && end.nanosecond() == 0 && end_date > start.date_naive() {
        end_date.pred_opt().unwrap_or(end_date)
    } else {
        end_date
    }
}
