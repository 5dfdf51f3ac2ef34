// Settings module
// Card configuration: every recognized option with its default, validated once

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::grid::{GridGeometry, WeekStartDay};
use crate::models::layout::{LayoutOptions, OutOfRangePolicy};

pub const DEFAULT_MIN_MARKER_MINUTES: u32 = 15;
const MAX_MARKER_MINUTES: u32 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("start hour {0} is out of range (0-23)")]
    StartHourOutOfRange(u32),
    #[error("end hour {0} is out of range (1-24)")]
    EndHourOutOfRange(u32),
    #[error("start hour {start_hour} must be before end hour {end_hour}")]
    EmptyHourRange { start_hour: u32, end_hour: u32 },
    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),
    #[error("entity id cannot be empty")]
    EmptyEntityId,
    #[error("entity {0:?} is listed more than once")]
    DuplicateEntity(String),
    #[error("color {color:?} for entity {entity:?} must be in hex format (#RRGGBB or #RGB)")]
    InvalidColor { entity: String, color: String },
    #[error("marker thickness {0} must be between 1 and 60 minutes")]
    MarkerOutOfRange(u32),
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Clock style for hour rows and event time labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

/// One calendar entity shown on the grid. List position is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityConfig {
    #[serde(alias = "entity")]
    pub id: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl EntityConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Recognized configuration for the week grid card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub week_start_day: WeekStartDay,
    pub start_hour: u32,
    pub end_hour: u32,
    pub time_format: TimeFormat,
    pub timezone: String,
    pub out_of_range: OutOfRangePolicy,
    pub min_marker_minutes: u32,
    pub entities: Vec<EntityConfig>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            week_start_day: WeekStartDay::Monday,
            start_hour: 0,
            end_hour: 24,
            time_format: TimeFormat::TwentyFourHour,
            timezone: "UTC".to_string(),
            out_of_range: OutOfRangePolicy::Drop,
            min_marker_minutes: DEFAULT_MIN_MARKER_MINUTES,
            entities: Vec::new(),
        }
    }
}

impl CardConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: CardConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every option. Invalid bounds must never reach the layout engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_hour > 23 {
            return Err(ConfigError::StartHourOutOfRange(self.start_hour));
        }
        if self.end_hour == 0 || self.end_hour > 24 {
            return Err(ConfigError::EndHourOutOfRange(self.end_hour));
        }
        if self.start_hour >= self.end_hour {
            return Err(ConfigError::EmptyHourRange {
                start_hour: self.start_hour,
                end_hour: self.end_hour,
            });
        }
        if self.min_marker_minutes == 0 || self.min_marker_minutes > MAX_MARKER_MINUTES {
            return Err(ConfigError::MarkerOutOfRange(self.min_marker_minutes));
        }
        self.timezone()?;

        let mut seen = HashSet::new();
        for entity in &self.entities {
            if entity.id.trim().is_empty() {
                return Err(ConfigError::EmptyEntityId);
            }
            if !seen.insert(entity.id.as_str()) {
                return Err(ConfigError::DuplicateEntity(entity.id.clone()));
            }
            if let Some(color) = entity.color.as_deref() {
                if !is_hex_color(color) {
                    return Err(ConfigError::InvalidColor {
                        entity: entity.id.clone(),
                        color: color.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        Tz::from_str(self.timezone.trim())
            .map_err(|_| ConfigError::UnknownTimezone(self.timezone.clone()))
    }

    /// Grid for the week containing `date`, using the configured week start and hours.
    pub fn grid_for(&self, date: NaiveDate) -> Result<GridGeometry, ConfigError> {
        GridGeometry::containing(date, self.week_start_day, self.start_hour, self.end_hour)
    }

    pub fn entity_order(&self) -> Vec<String> {
        self.entities.iter().map(|entity| entity.id.clone()).collect()
    }

    pub fn entity_colors(&self) -> BTreeMap<String, String> {
        self.entities
            .iter()
            .filter_map(|entity| {
                entity
                    .color
                    .as_ref()
                    .map(|color| (entity.id.clone(), color.clone()))
            })
            .collect()
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            out_of_range: self.out_of_range,
            min_marker_minutes: self.min_marker_minutes,
            time_format: self.time_format,
            entity_order: self.entity_order(),
            entity_colors: self.entity_colors(),
        }
    }
}

fn is_hex_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 6 || digits.len() == 3) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
