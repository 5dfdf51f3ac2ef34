// Source module
// Per-entity fetch outcomes handed to the layout engine

use serde::Serialize;
use thiserror::Error;

use crate::models::event::RawEvent;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SourceError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("fetch timed out")]
    Timeout,
    #[error("provider has no data for this entity")]
    Missing,
}

/// Events from one calendar entity for one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBatch {
    pub entity_id: String,
    pub events: Result<Vec<RawEvent>, SourceError>,
}

impl SourceBatch {
    pub fn loaded(entity_id: impl Into<String>, events: Vec<RawEvent>) -> Self {
        Self {
            entity_id: entity_id.into(),
            events: Ok(events),
        }
    }

    pub fn failed(entity_id: impl Into<String>, error: SourceError) -> Self {
        Self {
            entity_id: entity_id.into(),
            events: Err(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Loaded { events: usize },
    Failed { reason: String },
}

/// Outcome of one source, reported alongside the layout rather than as a layout fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub entity_id: String,
    #[serde(flatten)]
    pub status: SourceStatus,
}

impl SourceReport {
    pub fn from_batch(batch: &SourceBatch) -> Self {
        let status = match &batch.events {
            Ok(events) => SourceStatus::Loaded {
                events: events.len(),
            },
            Err(err) => SourceStatus::Failed {
                reason: err.to_string(),
            },
        };
        Self {
            entity_id: batch.entity_id.clone(),
            status,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SourceStatus::Failed { .. })
    }
}
