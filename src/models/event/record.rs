// Wire record for provider events
// Parses the `{ start, end, summary, allDay? }` shape into a RawEvent

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::RawEvent;
use crate::utils::date::start_of_day;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventParseError {
    #[error("event {id:?} has an unparsable start {value:?}")]
    InvalidStart { id: String, value: String },
}

/// Event as delivered by a provider, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventRecord {
    #[serde(default, alias = "uid")]
    pub id: Option<String>,
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default, alias = "message")]
    pub summary: String,
    #[serde(default)]
    pub all_day: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParsedTime {
    Instant(DateTime<FixedOffset>),
    Date(NaiveDate),
}

impl RawEventRecord {
    /// Convert into a [`RawEvent`] for `entity_id`.
    ///
    /// Offset-less datetimes are read as wall-clock time in `tz`. A missing,
    /// unparsable or inverted `end` degrades to a zero-duration marker at
    /// `start`. Date-only ends are exclusive, as in iCalendar `DTEND`.
    pub fn parse(&self, entity_id: &str, index: usize, tz: &Tz) -> Result<RawEvent, EventParseError> {
        let id = self
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("{}#{}", entity_id, index));

        let Some(start) = parse_time(&self.start, tz) else {
            return Err(EventParseError::InvalidStart {
                id,
                value: self.start.clone(),
            });
        };
        let end = self.end.as_deref().and_then(|value| parse_time(value, tz));
        if end.is_none() {
            log::warn!(
                "Event {} ({}) has no usable end {:?}; rendering as a marker",
                id,
                entity_id,
                self.end
            );
        }

        let all_day = self
            .all_day
            .unwrap_or(matches!(start, ParsedTime::Date(_)));

        if all_day {
            let first = match start {
                ParsedTime::Date(date) => date,
                ParsedTime::Instant(instant) => instant.with_timezone(tz).date_naive(),
            };
            let last = match end {
                Some(ParsedTime::Date(date)) if date > first => date.pred_opt().unwrap_or(first),
                Some(ParsedTime::Date(_)) | None => first,
                Some(ParsedTime::Instant(instant)) => {
                    let local = instant.with_timezone(tz);
                    let date = local.date_naive();
                    if local.num_seconds_from_midnight() == 0 && date > first {
                        date.pred_opt().unwrap_or(first)
                    } else {
                        date.max(first)
                    }
                }
            };
            return Ok(RawEvent::all_day(id, entity_id, self.summary.clone(), first, last));
        }

        let start = to_instant(start, tz);
        let end = match end.map(|end| to_instant(end, tz)) {
            Some(end) if end >= start => end,
            Some(end) => {
                log::warn!(
                    "Event {} ({}) ends before it starts ({} < {}); rendering as a marker",
                    id,
                    entity_id,
                    end,
                    start
                );
                start
            }
            None => start,
        };

        Ok(RawEvent::timed(id, entity_id, self.summary.clone(), start, end))
    }
}

fn parse_time(value: &str, tz: &Tz) -> Option<ParsedTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(ParsedTime::Instant(instant));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return localize(naive, tz).map(ParsedTime::Instant);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(ParsedTime::Date)
}

fn localize(naive: NaiveDateTime, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|local| local.fixed_offset())
}

fn to_instant(parsed: ParsedTime, tz: &Tz) -> DateTime<FixedOffset> {
    match parsed {
        ParsedTime::Instant(instant) => instant,
        ParsedTime::Date(date) => start_of_day(date, tz).fixed_offset(),
    }
}
