//! Database operations for the `affirmations` table (daily content records).

use chrono::{DateTime, NaiveDate, Utc};
use dreamloop_core::{Category, ContentRecord, NewContentRecord, WeatherSnapshot};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

const CONTENT_COLUMNS: &str = "id, user_id, for_date, lines, category, visual_theme, weather, \
                               card_image_url, model, prompt_version, created_at";

/// A row from the `affirmations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentRow {
    pub id: i64,
    pub user_id: Uuid,
    pub for_date: NaiveDate,
    pub lines: Vec<String>,
    pub category: String,
    pub visual_theme: String,
    pub weather: Option<Value>,
    pub card_image_url: Option<String>,
    pub model: String,
    pub prompt_version: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ContentRow> for ContentRecord {
    type Error = DbError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse::<Category>()
            .map_err(|e| DbError::InvalidRow {
                table: "affirmations",
                reason: e.to_string(),
            })?;

        // The snapshot is informational; an unreadable one is dropped rather
        // than making the whole day's record unusable.
        let weather = row.weather.and_then(|v| {
            serde_json::from_value::<WeatherSnapshot>(v)
                .inspect_err(|e| {
                    tracing::warn!(id = row.id, error = %e, "ignoring unreadable weather snapshot");
                })
                .ok()
        });

        Ok(ContentRecord {
            id: row.id,
            user_id: row.user_id,
            for_date: row.for_date,
            lines: row.lines,
            category,
            visual_theme: row.visual_theme,
            weather,
            card_image_url: row.card_image_url,
            model: row.model,
            prompt_version: row.prompt_version,
            created_at: row.created_at,
        })
    }
}

/// Fetch the content record for `(user_id, for_date)`, if one exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if the stored category is outside the closed set.
pub async fn get_content_for_day(
    pool: &PgPool,
    user_id: Uuid,
    for_date: NaiveDate,
) -> Result<Option<ContentRecord>, DbError> {
    let row = sqlx::query_as::<_, ContentRow>(&format!(
        "SELECT {CONTENT_COLUMNS} FROM affirmations WHERE user_id = $1 AND for_date = $2"
    ))
    .bind(user_id)
    .bind(for_date)
    .fetch_optional(pool)
    .await?;

    row.map(ContentRecord::try_from).transpose()
}

/// Idempotently store the content record for `(user_id, for_date)`.
///
/// The first writer wins: on conflict the existing row is left untouched and
/// returned, so concurrent callers racing on the same day all converge on one
/// stored value. The no-op `DO UPDATE` is what makes `RETURNING` yield the
/// existing row.
///
/// # Errors
///
/// Returns [`DbError::Encode`] if the weather snapshot cannot be encoded,
/// [`DbError::Sqlx`] if the upsert fails, or [`DbError::InvalidRow`] if the
/// returned row is malformed.
pub async fn upsert_content_record(
    pool: &PgPool,
    record: &NewContentRecord,
) -> Result<ContentRecord, DbError> {
    let weather = record
        .weather
        .as_ref()
        .map(serde_json::to_value)
        .transpose()?;

    let row = sqlx::query_as::<_, ContentRow>(&format!(
        "INSERT INTO affirmations \
             (user_id, for_date, lines, category, visual_theme, weather, model, prompt_version) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (user_id, for_date) DO UPDATE SET user_id = affirmations.user_id \
         RETURNING {CONTENT_COLUMNS}"
    ))
    .bind(record.user_id)
    .bind(record.for_date)
    .bind(&record.lines)
    .bind(record.category.as_str())
    .bind(&record.visual_theme)
    .bind(weather)
    .bind(&record.model)
    .bind(record.prompt_version)
    .fetch_one(pool)
    .await?;

    ContentRecord::try_from(row)
}
