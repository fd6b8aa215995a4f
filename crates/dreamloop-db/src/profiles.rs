//! Read-only queries over the `profiles` table.

use dreamloop_core::{Coordinates, Profile};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const PROFILE_COLUMNS: &str = "user_id, goals, tone, language, timezone, lat, lon, \
                               daily_time_local, wants_push, is_paused";

/// A row from the `profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub goals: Vec<String>,
    pub tone: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub daily_time_local: Option<String>,
    pub wants_push: bool,
    pub is_paused: bool,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            user_id: row.user_id,
            goals: row.goals,
            tone: row.tone,
            language: row.language,
            timezone: row.timezone,
            coordinates: Coordinates::from_parts(row.lat, row.lon),
            daily_time_local: row.daily_time_local,
            wants_push: row.wants_push,
            is_paused: row.is_paused,
        }
    }
}

/// List every profile that opted in to push and is not paused.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_eligible_profiles(pool: &PgPool) -> Result<Vec<Profile>, DbError> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles \
         WHERE wants_push = true AND is_paused = false \
         ORDER BY user_id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Profile::from).collect())
}

/// Fetch one profile by user id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, DbError> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Profile::from))
}
