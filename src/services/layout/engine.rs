//! Grid layout engine.
//!
//! Runs one complete layout pass: bucketize every source, merge, stack each
//! day and map the result onto fractional grid coordinates. The pass is a pure
//! function of its arguments; nothing is cached between calls.

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use super::bucketizer::bucketize;
use super::indicator::indicator;
use super::merger::merge;
use super::overlap::resolve;
use crate::models::event::EventSpan;
use crate::models::grid::{GridGeometry, DAY_COUNT};
use crate::models::layout::{
    LayoutOptions, LocalizedEvent, OutOfRangePolicy, PositionedRectangle, StackedEvent, WeekLayout,
};
use crate::models::source::{SourceBatch, SourceReport};
use crate::services::labels::{hour_labels, time_range_label};
use crate::services::palette::EntityPalette;

/// Lay out one week of events from all sources.
///
/// Failed sources contribute nothing and are reported in `WeekLayout::sources`.
pub fn layout<Z>(
    sources: &[SourceBatch],
    grid: &GridGeometry,
    tz: &Z,
    now: DateTime<Utc>,
    options: &LayoutOptions,
) -> WeekLayout
where
    Z: TimeZone,
    Z::Offset: Display,
{
    let mut reports = Vec::with_capacity(sources.len());
    let mut per_entity: BTreeMap<&str, Vec<LocalizedEvent<'_>>> = BTreeMap::new();

    for batch in sources {
        reports.push(SourceReport::from_batch(batch));
        let fragments = per_entity.entry(batch.entity_id.as_str()).or_default();
        match &batch.events {
            Ok(events) => fragments.extend(bucketize(events, grid, tz, options)),
            Err(err) => log::warn!("Source {} unavailable, rendering without it: {}", batch.entity_id, err),
        }
    }

    let mut entities: Vec<&str> = per_entity.keys().copied().collect();
    entities.sort_by_key(|entity_id| (options.entity_rank(entity_id).unwrap_or(usize::MAX), *entity_id));
    let palette = EntityPalette::new(entities, &options.entity_colors);

    let merged = merge(per_entity, &options.entity_order);
    let (mut all_day, timed): (Vec<_>, Vec<_>) = merged.into_iter().partition(|event| event.is_all_day());

    let mut rectangles = Vec::with_capacity(all_day.len() + timed.len());

    all_day.sort_by(|left, right| {
        left.day_index
            .cmp(&right.day_index)
            .then_with(|| left.order.cmp(&right.order))
    });
    rectangles.extend(all_day.iter().map(|event| place_all_day(event, &palette)));

    let mut days: Vec<Vec<LocalizedEvent<'_>>> = vec![Vec::new(); DAY_COUNT];
    for event in timed {
        let Some(fitted) = fit_to_visible_hours(event, grid, options) else {
            continue;
        };
        if let Some(day) = days.get_mut(fitted.day_index) {
            day.push(fitted);
        }
    }
    for day in days {
        for stacked in resolve(day) {
            rectangles.push(place_timed(&stacked, grid, tz, options, &palette));
        }
    }

    let indicator = indicator(now, grid, tz);
    log::debug!(
        "Laid out {} rectangles from {} sources for week of {} (indicator: {:?})",
        rectangles.len(),
        sources.len(),
        grid.week_start(),
        indicator
    );

    WeekLayout {
        grid: *grid,
        days: grid.days(),
        hour_labels: hour_labels(grid, options.time_format),
        rectangles,
        indicator,
        sources: reports,
    }
}

fn place_all_day(event: &LocalizedEvent<'_>, palette: &EntityPalette) -> PositionedRectangle {
    PositionedRectangle {
        day_index: event.day_index,
        top_fraction: 0.0,
        height_fraction: 1.0,
        left_fraction: 0.0,
        width_fraction: 1.0,
        column: 0,
        column_count: 1,
        entity_id: event.source.entity_id.clone(),
        event_id: event.source.id.clone(),
        summary: event.source.summary.clone(),
        is_all_day: true,
        is_marker: false,
        continues_before: event.continues_before,
        continues_after: event.continues_after,
        color: palette.color_for(event.entity_id()).map(str::to_string),
        time_label: None,
    }
}

/// Map a fragment onto the minutes it occupies on the grid, or `None` when it is not drawn.
///
/// Lanes are assigned after this step, so stacking always sees the drawn geometry.
fn fit_to_visible_hours<'a>(
    mut event: LocalizedEvent<'a>,
    grid: &GridGeometry,
    options: &LayoutOptions,
) -> Option<LocalizedEvent<'a>> {
    let visible_start = grid.visible_start_minute();
    let visible_end = grid.visible_end_minute();
    let thickness = options.min_marker_minutes.max(1).min(grid.visible_minutes());

    // The closing hour line is still part of the grid.
    if event.is_marker && event.start_minute == visible_end {
        event.start_minute = visible_end - thickness;
        event.end_minute = visible_end;
        return Some(event);
    }

    if event.end_minute > visible_start && event.start_minute < visible_end {
        event.start_minute = event.start_minute.max(visible_start);
        event.end_minute = event.end_minute.min(visible_end);
        return Some(event);
    }

    match options.out_of_range {
        OutOfRangePolicy::Drop => {
            log::trace!("Dropping {} on day {}: outside visible hours", event.source.id, event.day_index);
            None
        }
        OutOfRangePolicy::Clamp => {
            if event.end_minute <= visible_start {
                event.start_minute = visible_start;
                event.end_minute = visible_start + thickness;
            } else {
                event.start_minute = visible_end - thickness;
                event.end_minute = visible_end;
            }
            Some(event)
        }
    }
}

fn place_timed<Z>(
    stacked: &StackedEvent<'_>,
    grid: &GridGeometry,
    tz: &Z,
    options: &LayoutOptions,
    palette: &EntityPalette,
) -> PositionedRectangle
where
    Z: TimeZone,
    Z::Offset: Display,
{
    let event = &stacked.event;
    let top_fraction = grid.fraction_of(f64::from(event.start_minute)).clamp(0.0, 1.0);
    let bottom_fraction = grid.fraction_of(f64::from(event.end_minute)).clamp(0.0, 1.0);

    let column_count = stacked.column_count.max(1);
    let time_label = match &event.source.span {
        EventSpan::Timed { start, end } => Some(time_range_label(
            &start.with_timezone(tz),
            &end.with_timezone(tz),
            options.time_format,
        )),
        EventSpan::AllDay { .. } => None,
    };

    PositionedRectangle {
        day_index: event.day_index,
        top_fraction,
        height_fraction: (bottom_fraction - top_fraction).max(0.0),
        left_fraction: stacked.column as f64 / column_count as f64,
        width_fraction: 1.0 / column_count as f64,
        column: stacked.column,
        column_count,
        entity_id: event.source.entity_id.clone(),
        event_id: event.source.id.clone(),
        summary: event.source.summary.clone(),
        is_all_day: false,
        is_marker: event.is_marker,
        continues_before: event.continues_before,
        continues_after: event.continues_after,
        color: palette.color_for(event.entity_id()).map(str::to_string),
        time_label,
    }
}
