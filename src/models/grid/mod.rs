// Grid geometry
// The visible week window and the hour range shown by the time grid

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::models::settings::ConfigError;
use crate::utils::date::{start_of_day, MINUTES_PER_DAY};

/// Number of day columns in the grid.
pub const DAY_COUNT: usize = 7;

/// First weekday shown in the leftmost column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    #[default]
    Monday,
    Sunday,
}

impl WeekStartDay {
    /// First date of the week that contains `date`.
    pub fn week_containing(self, date: NaiveDate) -> NaiveDate {
        let days_back = match self {
            WeekStartDay::Monday => date.weekday().num_days_from_monday(),
            WeekStartDay::Sunday => date.weekday().num_days_from_sunday(),
        };
        date - Duration::days(i64::from(days_back))
    }
}

/// Week window plus visible hour range for one layout pass.
///
/// Always satisfies `0 <= start_hour < end_hour <= 24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridGeometry {
    week_start: NaiveDate,
    start_hour: u32,
    end_hour: u32,
}

impl GridGeometry {
    pub fn new(week_start: NaiveDate, start_hour: u32, end_hour: u32) -> Result<Self, ConfigError> {
        if start_hour > 23 {
            return Err(ConfigError::StartHourOutOfRange(start_hour));
        }
        if end_hour == 0 || end_hour > 24 {
            return Err(ConfigError::EndHourOutOfRange(end_hour));
        }
        if start_hour >= end_hour {
            return Err(ConfigError::EmptyHourRange {
                start_hour,
                end_hour,
            });
        }

        Ok(Self {
            week_start,
            start_hour,
            end_hour,
        })
    }

    /// Grid for the week containing `date`.
    pub fn containing(
        date: NaiveDate,
        week_start_day: WeekStartDay,
        start_hour: u32,
        end_hour: u32,
    ) -> Result<Self, ConfigError> {
        Self::new(week_start_day.week_containing(date), start_hour, end_hour)
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn day_count(&self) -> usize {
        DAY_COUNT
    }

    pub fn week_end_exclusive(&self) -> NaiveDate {
        self.week_start + Duration::days(DAY_COUNT as i64)
    }

    pub fn date_for(&self, day_index: usize) -> NaiveDate {
        self.week_start + Duration::days(day_index as i64)
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        (0..DAY_COUNT).map(|index| self.date_for(index)).collect()
    }

    /// Column index of `date`, or `None` when it falls outside the week.
    pub fn day_index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.week_start).num_days();
        (0..DAY_COUNT as i64)
            .contains(&offset)
            .then_some(offset as usize)
    }

    pub fn visible_start_minute(&self) -> u32 {
        self.start_hour * 60
    }

    pub fn visible_end_minute(&self) -> u32 {
        (self.end_hour * 60).min(MINUTES_PER_DAY)
    }

    pub fn visible_minutes(&self) -> u32 {
        self.visible_end_minute() - self.visible_start_minute()
    }

    /// Linear position of a minute-of-day within the visible hour range. Not clamped.
    pub fn fraction_of(&self, minute: f64) -> f64 {
        (minute - f64::from(self.visible_start_minute())) / f64::from(self.visible_minutes())
    }

    /// `[first local midnight, local midnight after the last day)` in `tz`.
    pub fn window<Tz: TimeZone>(&self, tz: &Tz) -> (DateTime<Tz>, DateTime<Tz>) {
        (
            start_of_day(self.week_start, tz),
            start_of_day(self.week_end_exclusive(), tz),
        )
    }

    pub fn previous_week(&self) -> Self {
        Self {
            week_start: self.week_start - Duration::weeks(1),
            ..*self
        }
    }

    pub fn next_week(&self) -> Self {
        Self {
            week_start: self.week_start + Duration::weeks(1),
            ..*self
        }
    }
}
