//! Time bucketizer.
//!
//! Converts absolute event instants into per-day wall-clock fragments for the
//! visible week. Timed events are split at every local midnight they cross and
//! clipped to the week window; all-day events produce one full-day fragment per
//! covered date.

use chrono::{DateTime, Duration, TimeZone};

use crate::models::event::{EventSpan, RawEvent};
use crate::models::grid::GridGeometry;
use crate::models::layout::{LayoutOptions, LocalizedEvent};
use crate::utils::date::{
    last_covered_date, start_of_day, wall_clock_minutes, wall_clock_minutes_rounded, MINUTES_PER_DAY,
};

/// Bucketize `events` into the week described by `grid`, in timezone `tz`.
///
/// Fragments come out in input order (then day order); `order` holds the
/// event's input index.
pub fn bucketize<'a, Z: TimeZone>(
    events: &'a [RawEvent],
    grid: &GridGeometry,
    tz: &Z,
    options: &LayoutOptions,
) -> Vec<LocalizedEvent<'a>> {
    let mut fragments = Vec::with_capacity(events.len());

    for (index, event) in events.iter().enumerate() {
        let before = fragments.len();
        match &event.span {
            EventSpan::AllDay { first, last } => {
                bucketize_all_day(event, index, *first, *last, grid, &mut fragments);
            }
            EventSpan::Timed { start, end } => {
                let start = start.with_timezone(tz);
                let end = end.with_timezone(tz).max(start.clone());
                // Shorter than the grid's minute resolution: drawn as a marker.
                if end.clone() - start.clone() < Duration::minutes(1) {
                    bucketize_marker(event, index, &start, grid, options, &mut fragments);
                } else {
                    bucketize_timed(event, index, &start, &end, grid, tz, &mut fragments);
                }
            }
        }
        if fragments.len() == before {
            log::trace!("Event {} ({}) lies outside the visible week", event.id, event.entity_id);
        }
    }

    log::debug!(
        "Bucketized {} events into {} fragments for week of {}",
        events.len(),
        fragments.len(),
        grid.week_start()
    );
    fragments
}

fn bucketize_all_day<'a>(
    event: &'a RawEvent,
    index: usize,
    first: chrono::NaiveDate,
    last: chrono::NaiveDate,
    grid: &GridGeometry,
    fragments: &mut Vec<LocalizedEvent<'a>>,
) {
    let last = last.max(first);
    for day_index in 0..grid.day_count() {
        let date = grid.date_for(day_index);
        if date < first || date > last {
            continue;
        }
        fragments.push(LocalizedEvent {
            source: event,
            day_index,
            start_minute: 0,
            end_minute: MINUTES_PER_DAY,
            spans_multiple_days: first != last,
            continues_before: date > first,
            continues_after: date < last,
            is_marker: false,
            order: index,
        });
    }
}

fn bucketize_marker<'a, Z: TimeZone>(
    event: &'a RawEvent,
    index: usize,
    at: &DateTime<Z>,
    grid: &GridGeometry,
    options: &LayoutOptions,
    fragments: &mut Vec<LocalizedEvent<'a>>,
) {
    let Some(day_index) = grid.day_index_of(at.date_naive()) else {
        return;
    };
    let start_minute = wall_clock_minutes(at);
    fragments.push(LocalizedEvent {
        source: event,
        day_index,
        start_minute,
        end_minute: marker_end(start_minute, options),
        spans_multiple_days: false,
        continues_before: false,
        continues_after: false,
        is_marker: true,
        order: index,
    });
}

fn bucketize_timed<'a, Z: TimeZone>(
    event: &'a RawEvent,
    index: usize,
    start: &DateTime<Z>,
    end: &DateTime<Z>,
    grid: &GridGeometry,
    tz: &Z,
    fragments: &mut Vec<LocalizedEvent<'a>>,
) {
    let (window_start, window_end) = grid.window(tz);
    if *end <= window_start || *start >= window_end {
        return;
    }

    let spans_multiple_days = start.date_naive() != last_covered_date(start, end);

    for day_index in 0..grid.day_count() {
        let date = grid.date_for(day_index);
        let day_start = start_of_day(date, tz);
        let day_end = start_of_day(date + Duration::days(1), tz);

        let segment_start = start.clone().max(day_start);
        let segment_end = end.clone().min(day_end.clone());
        if segment_start >= segment_end {
            continue;
        }

        let start_minute = wall_clock_minutes_rounded(&segment_start);
        let mut end_minute = if segment_end == day_end {
            MINUTES_PER_DAY
        } else {
            wall_clock_minutes_rounded(&segment_end)
        };
        if end_minute < start_minute {
            // Wall clock ran backwards inside the repeated fall-back hour; keep the elapsed length.
            let elapsed = ((segment_end.clone() - segment_start.clone()).num_seconds().max(0) + 30) / 60;
            end_minute = (start_minute + elapsed as u32).min(MINUTES_PER_DAY);
        }
        if end_minute == start_minute {
            log::trace!("Skipping sub-minute fragment of {} on day {}", event.id, day_index);
            continue;
        }

        fragments.push(LocalizedEvent {
            source: event,
            day_index,
            start_minute,
            end_minute,
            spans_multiple_days,
            continues_before: segment_start > *start,
            continues_after: segment_end < *end,
            is_marker: false,
            order: index,
        });
    }
}

fn marker_end(start_minute: u32, options: &LayoutOptions) -> u32 {
    (start_minute + options.min_marker_minutes.max(1)).min(MINUTES_PER_DAY)
}
