// Test fixtures - reusable test data
// Provides a fixed week, timezone and event constructors across all test files

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;

use week_grid::models::event::RawEvent;
use week_grid::models::grid::GridGeometry;
use week_grid::models::source::SourceBatch;

/// Timezone used by the scenario tests
pub const TZ: Tz = chrono_tz::Europe::Amsterdam;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday 2024-03-04, the first day of the fixture week
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    /// Sunday 2024-03-03, the day before the fixture week
    pub fn previous_sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()
    }

    /// Wednesday 2024-03-06 at 12:00 in Amsterdam
    pub fn wednesday_noon() -> DateTime<Utc> {
        super::utc("2024-03-06T11:00:00Z")
    }
}

/// Sample events for testing
pub mod events {
    use super::*;

    pub const OUTAGES: &str = "calendar.definite_outages";
    pub const PROBABLE: &str = "calendar.probable_outages";
    pub const STATUS: &str = "calendar.status";

    pub fn timed(id: &str, entity: &str, start: &str, end: &str) -> RawEvent {
        RawEvent::timed(id, entity, id, super::at(start), super::at(end))
    }

    pub fn all_day(id: &str, entity: &str, summary: &str, first: NaiveDate, last: NaiveDate) -> RawEvent {
        RawEvent::all_day(id, entity, summary, first, last)
    }
}

pub fn at(value: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(value).unwrap()
}

pub fn utc(value: &str) -> DateTime<Utc> {
    at(value).with_timezone(&Utc)
}

pub fn grid(start_hour: u32, end_hour: u32) -> GridGeometry {
    GridGeometry::new(dates::monday(), start_hour, end_hour).unwrap()
}

pub fn full_day_grid() -> GridGeometry {
    grid(0, 24)
}

pub fn single_source(entity: &str, events: Vec<RawEvent>) -> Vec<SourceBatch> {
    vec![SourceBatch::loaded(entity, events)]
}
