// Layout models
// Intermediate and final values of one layout pass

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::event::RawEvent;
use crate::models::grid::GridGeometry;
use crate::models::settings::{TimeFormat, DEFAULT_MIN_MARKER_MINUTES};
use crate::models::source::SourceReport;

/// What to do with timed fragments lying entirely outside the visible hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfRangePolicy {
    /// Leave them off the grid.
    #[default]
    Drop,
    /// Compress them to a marker at the nearest edge of the grid.
    Clamp,
}

/// Resolved options the layout engine consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOptions {
    pub out_of_range: OutOfRangePolicy,
    /// Visual thickness given to zero-duration events.
    pub min_marker_minutes: u32,
    pub time_format: TimeFormat,
    /// Entity display order; earlier entities win simultaneous tie-breaks.
    pub entity_order: Vec<String>,
    pub entity_colors: BTreeMap<String, String>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            out_of_range: OutOfRangePolicy::Drop,
            min_marker_minutes: DEFAULT_MIN_MARKER_MINUTES,
            time_format: TimeFormat::TwentyFourHour,
            entity_order: Vec::new(),
            entity_colors: BTreeMap::new(),
        }
    }
}

impl LayoutOptions {
    pub fn entity_rank(&self, entity_id: &str) -> Option<usize> {
        self.entity_order.iter().position(|entity| entity == entity_id)
    }
}

/// One day's slice of a raw event, in local wall-clock minutes.
///
/// `end_minute` is exclusive and may be `1440` for fragments running to midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedEvent<'a> {
    pub source: &'a RawEvent,
    pub day_index: usize,
    pub start_minute: u32,
    pub end_minute: u32,
    pub spans_multiple_days: bool,
    pub continues_before: bool,
    pub continues_after: bool,
    /// Zero-duration event widened to the marker thickness.
    pub is_marker: bool,
    /// Stable tie-break index; reassigned by the merger.
    pub order: usize,
}

impl<'a> LocalizedEvent<'a> {
    pub fn entity_id(&self) -> &'a str {
        &self.source.entity_id
    }

    pub fn is_all_day(&self) -> bool {
        self.source.is_all_day()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_minute.saturating_sub(self.start_minute)
    }

    pub fn overlaps(&self, other: &LocalizedEvent<'_>) -> bool {
        self.day_index == other.day_index
            && self.start_minute < other.end_minute
            && other.start_minute < self.end_minute
    }
}

/// A localized event with its lane inside the overlap cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackedEvent<'a> {
    pub event: LocalizedEvent<'a>,
    pub column: usize,
    pub column_count: usize,
}

/// Final output unit handed to the rendering surface.
///
/// Vertical fractions are relative to the visible hour range (or to the
/// all-day strip for all-day events); horizontal fractions to the day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedRectangle {
    pub day_index: usize,
    pub top_fraction: f64,
    pub height_fraction: f64,
    pub left_fraction: f64,
    pub width_fraction: f64,
    pub column: usize,
    pub column_count: usize,
    pub entity_id: String,
    pub event_id: String,
    pub summary: String,
    pub is_all_day: bool,
    pub is_marker: bool,
    pub continues_before: bool,
    pub continues_after: bool,
    pub color: Option<String>,
    pub time_label: Option<String>,
}

/// Position of the current-time line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiveIndicator {
    pub day_index: usize,
    pub top_fraction: f64,
}

/// Everything the rendering surface needs for one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekLayout {
    pub grid: GridGeometry,
    pub days: Vec<NaiveDate>,
    pub hour_labels: Vec<String>,
    pub rectangles: Vec<PositionedRectangle>,
    pub indicator: Option<LiveIndicator>,
    pub sources: Vec<SourceReport>,
}

impl WeekLayout {
    pub fn all_day(&self) -> impl Iterator<Item = &PositionedRectangle> {
        self.rectangles.iter().filter(|rect| rect.is_all_day)
    }

    pub fn timed(&self) -> impl Iterator<Item = &PositionedRectangle> {
        self.rectangles.iter().filter(|rect| !rect.is_all_day)
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|report| report.is_failed())
    }
}
