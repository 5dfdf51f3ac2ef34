// Event module
// Raw calendar events as supplied by an event provider

pub mod record;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::Serialize;

/// When an event happens.
///
/// Timed events carry absolute instants; all-day events carry an inclusive
/// range of calendar dates that is never shifted by timezone conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventSpan {
    Timed {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
    AllDay {
        first: NaiveDate,
        last: NaiveDate,
    },
}

/// Calendar event as received from a provider. Read-only to the layout pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawEvent {
    pub id: String,
    pub entity_id: String,
    pub summary: String,
    pub span: EventSpan,
}

impl RawEvent {
    /// Create a timed event.
    ///
    /// An `end` earlier than `start` is clamped to `start`, producing a
    /// zero-duration marker instead of an invalid interval.
    ///
    /// # Examples
    /// ```
    /// use week_grid::models::event::RawEvent;
    /// use chrono::DateTime;
    ///
    /// let start = DateTime::parse_from_rfc3339("2024-03-04T09:00:00+01:00").unwrap();
    /// let end = DateTime::parse_from_rfc3339("2024-03-04T10:00:00+01:00").unwrap();
    /// let event = RawEvent::timed("evt-1", "calendar.outages", "Planned outage", start, end);
    /// assert_eq!(event.duration_minutes(), 60);
    /// ```
    pub fn timed(
        id: impl Into<String>,
        entity_id: impl Into<String>,
        summary: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            entity_id: entity_id.into(),
            summary: summary.into(),
            span: EventSpan::Timed {
                start,
                end: end.max(start),
            },
        }
    }

    /// Create an all-day event covering `first..=last`.
    pub fn all_day(
        id: impl Into<String>,
        entity_id: impl Into<String>,
        summary: impl Into<String>,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            entity_id: entity_id.into(),
            summary: summary.into(),
            span: EventSpan::AllDay {
                first,
                last: last.max(first),
            },
        }
    }

    /// Create a builder for constructing events field by field
    pub fn builder() -> RawEventBuilder {
        RawEventBuilder::new()
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self.span, EventSpan::AllDay { .. })
    }

    /// Duration of the event. All-day events count whole days.
    pub fn duration(&self) -> Duration {
        match self.span {
            EventSpan::Timed { start, end } => (end - start).max(Duration::zero()),
            EventSpan::AllDay { first, last } => Duration::days((last - first).num_days().max(0) + 1),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }
}

/// Builder for creating events with optional fields
#[derive(Debug, Default)]
pub struct RawEventBuilder {
    id: Option<String>,
    entity_id: Option<String>,
    summary: Option<String>,
    span: Option<EventSpan>,
}

impl RawEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn timed(mut self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        self.span = Some(EventSpan::Timed {
            start,
            end: end.max(start),
        });
        self
    }

    pub fn all_day(mut self, first: NaiveDate, last: NaiveDate) -> Self {
        self.span = Some(EventSpan::AllDay {
            first,
            last: last.max(first),
        });
        self
    }

    /// Build the event.
    ///
    /// # Returns
    /// Returns `Err` when the entity or the time span was never set
    pub fn build(self) -> Result<RawEvent, String> {
        let entity_id = self
            .entity_id
            .filter(|entity| !entity.trim().is_empty())
            .ok_or_else(|| "Event entity id is required".to_string())?;
        let span = self
            .span
            .ok_or_else(|| "Event start and end are required".to_string())?;

        Ok(RawEvent {
            id: self.id.unwrap_or_default(),
            entity_id,
            summary: self.summary.unwrap_or_default(),
            span,
        })
    }
}
