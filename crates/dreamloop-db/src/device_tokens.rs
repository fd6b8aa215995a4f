//! Database operations for the `device_tokens` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// List the raw push tokens registered for a user, oldest first.
///
/// Tokens are returned as stored; validity filtering belongs to the push layer.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_device_tokens(pool: &PgPool, user_id: Uuid) -> Result<Vec<String>, DbError> {
    let tokens = sqlx::query_scalar::<_, String>(
        "SELECT expo_token FROM device_tokens WHERE user_id = $1 ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(tokens)
}
