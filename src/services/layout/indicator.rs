//! Live indicator calculator.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::grid::GridGeometry;
use crate::models::layout::LiveIndicator;
use crate::utils::date::wall_clock_minutes_precise;

/// Position of `now` on the grid, or `None` when it falls outside the visible
/// week or outside `[start_hour, end_hour]`.
pub fn indicator<Z: TimeZone>(now: DateTime<Utc>, grid: &GridGeometry, tz: &Z) -> Option<LiveIndicator> {
    let local = now.with_timezone(tz);
    let day_index = grid.day_index_of(local.date_naive())?;

    let minute = wall_clock_minutes_precise(&local);
    if minute < f64::from(grid.visible_start_minute()) || minute > f64::from(grid.visible_end_minute()) {
        return None;
    }

    Some(LiveIndicator {
        day_index,
        top_fraction: grid.fraction_of(minute).clamp(0.0, 1.0),
    })
}
