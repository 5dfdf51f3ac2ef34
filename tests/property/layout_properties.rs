// Property-based tests for the layout pipeline
// Checks determinism, lane separation, split duration and coverage on random weeks

#[path = "../fixtures/mod.rs"]
mod fixtures;

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::Amsterdam;
use chrono_tz::UTC;
use proptest::prelude::*;

use week_grid::models::event::{EventSpan, RawEvent};
use week_grid::models::grid::GridGeometry;
use week_grid::models::layout::{LayoutOptions, OutOfRangePolicy, PositionedRectangle};
use week_grid::models::source::SourceBatch;
use week_grid::services::layout::{bucketize, layout, resolve};

const ENTITIES: [&str; 3] = ["calendar.a", "calendar.b", "calendar.c"];

fn week_start() -> NaiveDate {
    fixtures::dates::monday()
}

fn midnight_utc(date: NaiveDate) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

fn week_start_instant() -> DateTime<FixedOffset> {
    midnight_utc(week_start())
}

/// (day offset from the Sunday before the week, start minute, duration minutes, entity)
fn event_specs() -> impl Strategy<Value = Vec<(i64, i64, i64, usize)>> {
    prop::collection::vec((0i64..9, 0i64..1440, 0i64..3000, 0usize..3), 0..25)
}

/// Visible hour range with `start_hour < end_hour`
fn hour_ranges() -> impl Strategy<Value = (u32, u32)> {
    (0u32..24).prop_flat_map(|start| (Just(start), (start + 1)..=24u32))
}

/// Weeks containing the spring-forward and fall-back nights in Amsterdam
fn dst_weeks() -> impl Strategy<Value = NaiveDate> {
    prop_oneof![
        Just(NaiveDate::from_ymd_opt(2024, 3, 25).unwrap()),
        Just(NaiveDate::from_ymd_opt(2024, 10, 21).unwrap()),
    ]
}

fn policies() -> impl Strategy<Value = OutOfRangePolicy> {
    prop_oneof![Just(OutOfRangePolicy::Drop), Just(OutOfRangePolicy::Clamp)]
}

fn build_events(specs: &[(i64, i64, i64, usize)]) -> Vec<RawEvent> {
    build_events_from(week_start(), specs)
}

fn build_events_from(week: NaiveDate, specs: &[(i64, i64, i64, usize)]) -> Vec<RawEvent> {
    let origin = midnight_utc(week) - Duration::days(1);
    specs
        .iter()
        .enumerate()
        .map(|(index, (day, minute, duration, entity))| {
            let start = origin + Duration::days(*day) + Duration::minutes(*minute);
            let end = start + Duration::minutes(*duration);
            RawEvent::timed(format!("e{}", index), ENTITIES[*entity], "Event", start, end)
        })
        .collect()
}

fn batches(events: &[RawEvent]) -> Vec<SourceBatch> {
    ENTITIES
        .iter()
        .map(|entity| {
            let own = events
                .iter()
                .filter(|event| event.entity_id == *entity)
                .cloned()
                .collect();
            SourceBatch::loaded(*entity, own)
        })
        .collect()
}

fn grid() -> GridGeometry {
    GridGeometry::new(week_start(), 0, 24).unwrap()
}

fn collide(a: &PositionedRectangle, b: &PositionedRectangle) -> bool {
    let vertical = a.top_fraction + a.height_fraction > b.top_fraction + 1e-9
        && b.top_fraction + b.height_fraction > a.top_fraction + 1e-9;
    let horizontal = a.left_fraction + a.width_fraction > b.left_fraction + 1e-9
        && b.left_fraction + b.width_fraction > a.left_fraction + 1e-9;
    a.day_index == b.day_index && vertical && horizontal
}

fn shares_rows(a: &PositionedRectangle, b: &PositionedRectangle) -> bool {
    a.day_index == b.day_index
        && a.top_fraction + a.height_fraction > b.top_fraction + 1e-9
        && b.top_fraction + b.height_fraction > a.top_fraction + 1e-9
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap()
}

proptest! {
    /// Property: identical inputs produce identical layouts
    #[test]
    fn prop_layout_is_deterministic(specs in event_specs()) {
        let events = build_events(&specs);
        let sources = batches(&events);
        let options = LayoutOptions::default();

        let first = layout(&sources, &grid(), &UTC, now(), &options);
        let second = layout(&sources, &grid(), &UTC, now(), &options);
        prop_assert_eq!(first, second);
    }

    /// Property: overlapping fragments on the same day never share a column
    #[test]
    fn prop_overlapping_events_get_distinct_columns(specs in event_specs()) {
        let events = build_events(&specs);
        let fragments = bucketize(&events, &grid(), &UTC, &LayoutOptions::default());

        for day in 0..7 {
            let day_fragments: Vec<_> = fragments.iter().filter(|f| f.day_index == day).cloned().collect();
            let stacked = resolve(day_fragments);
            for (i, left) in stacked.iter().enumerate() {
                prop_assert!(left.column < left.column_count);
                for right in stacked.iter().skip(i + 1) {
                    if left.event.overlaps(&right.event) {
                        prop_assert_ne!(left.column, right.column);
                    }
                }
            }
        }
    }

    /// Property: splitting at midnight preserves the duration of events inside the week
    #[test]
    fn prop_split_preserves_duration(
        day in 1i64..7,
        minute in 0i64..1440,
        duration in 1i64..4000,
    ) {
        let events = build_events(&[(day, minute, duration, 0)]);
        let event = &events[0];
        let window_end = week_start_instant() + Duration::days(7);
        let inside = match &event.span {
            EventSpan::Timed { end, .. } => *end <= window_end,
            _ => false,
        };
        prop_assume!(inside);

        let fragments = bucketize(&events, &grid(), &UTC, &LayoutOptions::default());
        let total: i64 = fragments.iter().map(|f| i64::from(f.duration_minutes())).sum();
        prop_assert_eq!(total, duration);
    }

    /// Property: every event appears once on each day it intersects within the visible hours
    #[test]
    fn prop_each_intersecting_day_covered_once(specs in event_specs(), (start_hour, end_hour) in hour_ranges()) {
        let events = build_events(&specs);
        let grid = GridGeometry::new(week_start(), start_hour, end_hour).unwrap();
        let options = LayoutOptions::default();
        let result = layout(&batches(&events), &grid, &UTC, now(), &options);

        let mut seen: BTreeMap<(String, usize), usize> = BTreeMap::new();
        for rect in &result.rectangles {
            prop_assert!(rect.top_fraction >= 0.0 && rect.top_fraction <= 1.0);
            prop_assert!(rect.height_fraction > 0.0);
            prop_assert!(rect.top_fraction + rect.height_fraction <= 1.0 + 1e-9);
            *seen.entry((rect.event_id.clone(), rect.day_index)).or_default() += 1;
        }

        let visible_start = i64::from(start_hour) * 60;
        let visible_end = i64::from(end_hour) * 60;
        let marker = i64::from(options.min_marker_minutes);
        let mut expected: BTreeMap<(String, usize), usize> = BTreeMap::new();
        for (index, (day, minute, duration, _)) in specs.iter().enumerate() {
            let start = (day - 1) * 1440 + minute;
            let end = start + duration;
            for column in 0..7i64 {
                let day_start = column * 1440;
                let day_end = day_start + 1440;
                let hit = if *duration == 0 {
                    let at = start - day_start;
                    (0..1440).contains(&at) && (at + marker).min(1440) > visible_start && at <= visible_end
                } else {
                    let from = start.max(day_start) - day_start;
                    let to = end.min(day_end) - day_start;
                    from < to && from < visible_end && to > visible_start
                };
                if hit {
                    expected.insert((format!("e{}", index), column as usize), 1);
                }
            }
        }
        prop_assert_eq!(seen, expected);
    }

    /// Property: drawn rectangles never overlap, whatever the hours, policy or DST night
    #[test]
    fn prop_rectangles_never_collide(
        specs in event_specs(),
        (start_hour, end_hour) in hour_ranges(),
        week in dst_weeks(),
        policy in policies(),
    ) {
        let events = build_events_from(week, &specs);
        let grid = GridGeometry::new(week, start_hour, end_hour).unwrap();
        let options = LayoutOptions {
            out_of_range: policy,
            ..LayoutOptions::default()
        };
        let result = layout(&batches(&events), &grid, &Amsterdam, now(), &options);

        let timed: Vec<_> = result.timed().collect();
        for (i, a) in timed.iter().enumerate() {
            prop_assert!(a.column < a.column_count);
            for b in timed.iter().skip(i + 1) {
                prop_assert!(!collide(a, b), "{} collides with {}", a.event_id, b.event_id);
            }
        }
    }

    /// Property: a rectangle sharing no rows with any other drawn rectangle gets the full column
    #[test]
    fn prop_lone_rectangles_use_full_width(
        specs in event_specs(),
        (start_hour, end_hour) in hour_ranges(),
        week in dst_weeks(),
        policy in policies(),
    ) {
        let events = build_events_from(week, &specs);
        let grid = GridGeometry::new(week, start_hour, end_hour).unwrap();
        let options = LayoutOptions {
            out_of_range: policy,
            ..LayoutOptions::default()
        };
        let result = layout(&batches(&events), &grid, &Amsterdam, now(), &options);

        let timed: Vec<_> = result.timed().collect();
        for (i, a) in timed.iter().enumerate() {
            let alone = timed
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !shares_rows(a, b));
            if alone {
                prop_assert_eq!(a.column_count, 1, "{} is alone but narrowed", &a.event_id);
            }
        }
    }
}
