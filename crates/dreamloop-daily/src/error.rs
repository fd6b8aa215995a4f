use chrono::NaiveDate;
use dreamloop_core::CoreError;
use dreamloop_db::DbError;
use dreamloop_generator::GeneratorError;
use dreamloop_push::PushError;
use dreamloop_weather::WeatherError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DailyError {
    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("generation failed: {0}")]
    Generation(#[from] GeneratorError),

    #[error("weather client error: {0}")]
    Weather(#[from] WeatherError),

    #[error("push failed: {0}")]
    Push(#[from] PushError),

    #[error("model returned no usable lines")]
    EmptyLines,

    #[error("profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("no content for user {user_id} on {day}")]
    NoContentForDay { user_id: Uuid, day: NaiveDate },

    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),
}
