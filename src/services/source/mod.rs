// Event source seam
// The layout core consumes whatever the provider delivered; failures stay per source

mod json;

pub use json::JsonFileProvider;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};

use crate::models::event::RawEvent;
use crate::models::grid::GridGeometry;
use crate::models::source::{SourceBatch, SourceError};

/// Absolute time range a provider is asked to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    /// The visible week of `grid`, from local midnight to local midnight in `tz`.
    pub fn for_grid<Z: TimeZone>(grid: &GridGeometry, tz: &Z) -> Self {
        let (start, end) = grid.window(tz);
        Self {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        }
    }
}

/// Supplier of raw events for one calendar entity.
pub trait EventProvider {
    fn fetch_events(&self, entity_id: &str, window: &FetchWindow) -> Result<Vec<RawEvent>>;
}

/// Fetch every entity, turning provider errors into failed batches.
///
/// One failing entity never prevents the others from being collected.
pub fn collect_sources(
    provider: &dyn EventProvider,
    entities: &[String],
    window: &FetchWindow,
) -> Vec<SourceBatch> {
    entities
        .iter()
        .map(|entity_id| match provider.fetch_events(entity_id, window) {
            Ok(events) => {
                log::debug!("Fetched {} events for {}", events.len(), entity_id);
                SourceBatch::loaded(entity_id.clone(), events)
            }
            Err(err) => {
                log::warn!("Failed to fetch events for {}: {:#}", entity_id, err);
                let error = err
                    .downcast_ref::<SourceError>()
                    .cloned()
                    .unwrap_or_else(|| SourceError::Fetch(format!("{:#}", err)));
                SourceBatch::failed(entity_id.clone(), error)
            }
        })
        .collect()
}
