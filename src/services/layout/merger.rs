//! Multi-source merger.
//!
//! Flattens per-entity fragments into one list whose order depends only on the
//! configured entity order and event times, never on fetch completion order.

use std::collections::BTreeMap;

use crate::models::layout::LocalizedEvent;

/// Merge per-entity fragments and assign each a stable `order`.
///
/// Declared entities come first in declaration order; undeclared ones follow,
/// sorted by id. Within an entity fragments are ordered by day, start, end and
/// their original input position.
pub fn merge<'a>(
    per_entity: BTreeMap<&'a str, Vec<LocalizedEvent<'a>>>,
    entity_order: &[String],
) -> Vec<LocalizedEvent<'a>> {
    let rank_of = |entity_id: &str| {
        entity_order
            .iter()
            .position(|declared| declared == entity_id)
            .unwrap_or(entity_order.len())
    };

    let mut entities: Vec<(usize, &'a str, Vec<LocalizedEvent<'a>>)> = per_entity
        .into_iter()
        .map(|(entity_id, events)| (rank_of(entity_id), entity_id, events))
        .collect();
    entities.sort_by(|left, right| left.0.cmp(&right.0).then_with(|| left.1.cmp(right.1)));

    let mut merged = Vec::with_capacity(entities.iter().map(|(_, _, events)| events.len()).sum());
    for (_, entity_id, mut events) in entities {
        events.sort_by(|left, right| {
            left.day_index
                .cmp(&right.day_index)
                .then_with(|| left.start_minute.cmp(&right.start_minute))
                .then_with(|| left.end_minute.cmp(&right.end_minute))
                .then_with(|| left.order.cmp(&right.order))
        });
        log::trace!("Merging {} fragments from {}", events.len(), entity_id);
        merged.extend(events);
    }

    for (position, event) in merged.iter_mut().enumerate() {
        event.order = position;
    }
    merged
}
