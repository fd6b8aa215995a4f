pub mod app_config;
mod config;
pub mod content;
pub mod profile;
pub mod schedule;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{
    Category, ContentRecord, NewContentRecord, TemperatureUnit, WeatherSnapshot,
    DEFAULT_VISUAL_THEME, PROMPT_VERSION,
};
pub use profile::{Coordinates, Profile};
pub use schedule::{is_due, parse_send_time, LocalClock, DEFAULT_SEND_TIME};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid temperature unit '{0}', expected C or F")]
    InvalidTemperatureUnit(String),
}
