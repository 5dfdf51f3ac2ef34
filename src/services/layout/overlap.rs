//! Overlap resolver.
//!
//! Greedy interval colouring for one day column. Events are sorted by start,
//! end and stable merge order, each takes the lowest lane that is free at its
//! start, and every event's width is shared with the other members of its
//! overlap cluster only.

use std::collections::BTreeSet;

use crate::models::layout::{LocalizedEvent, StackedEvent};

/// Assign lanes to one day's events.
///
/// All-day events are passed through in a single fixed lane ahead of the timed
/// events. Inverted ranges are clamped to zero duration.
pub fn resolve<'a>(events: Vec<LocalizedEvent<'a>>) -> Vec<StackedEvent<'a>> {
    let (all_day, mut timed): (Vec<_>, Vec<_>) =
        events.into_iter().partition(|event| event.is_all_day());

    for event in &mut timed {
        if event.end_minute < event.start_minute {
            log::warn!(
                "Fragment of {} ends before it starts; clamping to zero duration",
                event.source.id
            );
            event.end_minute = event.start_minute;
        }
    }

    timed.sort_by(|left, right| {
        left.start_minute
            .cmp(&right.start_minute)
            .then_with(|| left.end_minute.cmp(&right.end_minute))
            .then_with(|| left.order.cmp(&right.order))
    });

    let mut stacked: Vec<StackedEvent<'a>> = all_day
        .into_iter()
        .map(|event| StackedEvent {
            event,
            column: 0,
            column_count: 1,
        })
        .collect();
    let timed_offset = stacked.len();

    let mut lane_ends: Vec<u32> = Vec::new();
    let mut cluster_start = timed_offset;
    let mut cluster_end = 0u32;

    for event in timed {
        if stacked.len() > cluster_start && event.start_minute >= cluster_end {
            close_cluster(&mut stacked[cluster_start..]);
            cluster_start = stacked.len();
        }

        let lane = lane_ends
            .iter()
            .position(|lane_end| *lane_end <= event.start_minute)
            .unwrap_or_else(|| {
                lane_ends.push(event.start_minute);
                lane_ends.len() - 1
            });
        lane_ends[lane] = event.end_minute;

        cluster_end = if stacked.len() == cluster_start {
            event.end_minute
        } else {
            cluster_end.max(event.end_minute)
        };
        stacked.push(StackedEvent {
            event,
            column: lane,
            column_count: 1,
        });
    }
    if stacked.len() > cluster_start {
        close_cluster(&mut stacked[cluster_start..]);
    }

    stacked
}

fn close_cluster(cluster: &mut [StackedEvent<'_>]) {
    let lanes: BTreeSet<usize> = cluster.iter().map(|stacked| stacked.column).collect();
    let column_count = lanes.len().max(1);
    for stacked in cluster {
        stacked.column_count = column_count;
    }
}
