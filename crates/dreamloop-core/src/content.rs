//! Daily content records ("two lines") and their closed category set.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

/// Version of the prompt/response schema stamped on every generated record.
pub const PROMPT_VERSION: i32 = 1;

/// Visual theme used when the model does not supply one.
pub const DEFAULT_VISUAL_THEME: &str = "soft gradient waves";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Focus,
    Confidence,
    Calm,
    Gratitude,
    Creativity,
}

impl Category {
    /// Every category, in the order used for substring matching.
    pub const ALL: [Category; 5] = [
        Category::Focus,
        Category::Confidence,
        Category::Calm,
        Category::Gratitude,
        Category::Creativity,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Focus => "focus",
            Category::Confidence => "confidence",
            Category::Calm => "calm",
            Category::Gratitude => "gratitude",
            Category::Creativity => "creativity",
        }
    }

    /// Lenient coercion of free text into the closed set.
    ///
    /// The first category (in [`Category::ALL`] order) whose name occurs
    /// anywhere in `raw`, case-insensitively, wins. Anything else is `Focus`.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| lowered.contains(c.as_str()))
            .unwrap_or(Category::Focus)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CoreError::InvalidCategory(s.to_string()))
    }
}

/// Simplified current conditions captured at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub summary: String,
    pub temp_c: Option<f64>,
    pub icon: String,
}

/// Unit the prompt states temperatures in. Snapshots always store Celsius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a Celsius reading into this unit, rounded to one decimal.
    #[must_use]
    pub fn convert_celsius(self, temp_c: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => temp_c,
            TemperatureUnit::Fahrenheit => ((temp_c * 9.0 / 5.0 + 32.0) * 10.0).round() / 10.0,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => f.write_str("C"),
            TemperatureUnit::Fahrenheit => f.write_str("F"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(CoreError::InvalidTemperatureUnit(s.to_string())),
        }
    }
}

/// A stored content record, unique per `(user_id, for_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: i64,
    pub user_id: Uuid,
    /// Calendar day in the user's own timezone.
    pub for_date: NaiveDate,
    pub lines: Vec<String>,
    pub category: Category,
    pub visual_theme: String,
    pub weather: Option<WeatherSnapshot>,
    pub card_image_url: Option<String>,
    pub model: String,
    pub prompt_version: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`ContentRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewContentRecord {
    pub user_id: Uuid,
    pub for_date: NaiveDate,
    pub lines: Vec<String>,
    pub category: Category,
    pub visual_theme: String,
    pub weather: Option<WeatherSnapshot>,
    pub model: String,
    pub prompt_version: i32,
}
