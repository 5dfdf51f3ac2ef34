use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use chrono_tz::Tz;

use super::{EventProvider, FetchWindow};
use crate::models::event::record::RawEventRecord;
use crate::models::event::{EventSpan, RawEvent};
use crate::models::source::SourceError;

/// Provider backed by a JSON document mapping entity ids to event records:
/// `{ "calendar.outages": [{ "start": "...", "end": "...", "summary": "..." }] }`.
pub struct JsonFileProvider {
    records: BTreeMap<String, Vec<RawEventRecord>>,
    timezone: Tz,
}

impl JsonFileProvider {
    pub fn from_path(path: &Path, timezone: Tz) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read events file {}", path.display()))?;
        Self::from_json(&content, timezone)
            .with_context(|| format!("Failed to parse events file {}", path.display()))
    }

    pub fn from_json(content: &str, timezone: Tz) -> Result<Self> {
        let records: BTreeMap<String, Vec<RawEventRecord>> =
            serde_json::from_str(content).context("Events document is not valid JSON")?;
        Ok(Self { records, timezone })
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl EventProvider for JsonFileProvider {
    fn fetch_events(&self, entity_id: &str, window: &FetchWindow) -> Result<Vec<RawEvent>> {
        let records = self
            .records
            .get(entity_id)
            .ok_or(SourceError::Missing)?;

        let mut events = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match record.parse(entity_id, index, &self.timezone) {
                Ok(event) if intersects(&event, window, &self.timezone) => events.push(event),
                Ok(_) => {}
                Err(err) => log::warn!("Skipping event from {}: {}", entity_id, err),
            }
        }
        Ok(events)
    }
}

fn intersects(event: &RawEvent, window: &FetchWindow, tz: &Tz) -> bool {
    match &event.span {
        EventSpan::Timed { start, end } => {
            let start = start.with_timezone(&Utc);
            let end = end.with_timezone(&Utc);
            // Zero-duration markers sit on an instant; keep them if the instant is inside.
            start < window.end && (end > window.start || (start == end && start >= window.start))
        }
        EventSpan::AllDay { first, last } => {
            let window_first = window.start.with_timezone(tz).date_naive();
            let window_last = (window.end.with_timezone(tz) - Duration::seconds(1)).date_naive();
            *first <= window_last && *last >= window_first
        }
    }
}
