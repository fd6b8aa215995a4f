use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TONE: &str = "warm";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Geographic position used for the weather lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Both halves must be present; a lone latitude or longitude is useless.
    #[must_use]
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Self { lat, lon }),
            _ => None,
        }
    }
}

/// A user's delivery preferences, as read from the profile store.
///
/// Fields that are optional in storage are resolved to their defaults by the
/// accessors below, so callers never re-implement the fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub goals: Vec<String>,
    pub tone: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub coordinates: Option<Coordinates>,
    /// Local send time as `HH:MM`.
    pub daily_time_local: Option<String>,
    pub wants_push: bool,
    pub is_paused: bool,
}

impl Profile {
    #[must_use]
    pub fn tone(&self) -> &str {
        non_blank(self.tone.as_deref()).unwrap_or(DEFAULT_TONE)
    }

    #[must_use]
    pub fn language(&self) -> &str {
        non_blank(self.language.as_deref()).unwrap_or(DEFAULT_LANGUAGE)
    }

    #[must_use]
    pub fn timezone(&self) -> &str {
        non_blank(self.timezone.as_deref()).unwrap_or(DEFAULT_TIMEZONE)
    }

    /// Whether the orchestrator should consider this user at all.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.wants_push && !self.is_paused
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
