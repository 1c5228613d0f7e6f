use sha2::{Digest, Sha256};
use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::UserId;

/// Database row for sessions table. Only the hash of the cookie token is stored.
#[derive(Debug, FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub token_hash: String,
    pub expires_at: i64,
    pub created_at: i64,
}

/// SHA-256 of a session token, hex encoded.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// 32 random bytes, hex encoded.
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// Create a new session for a user. Returns the raw token for the cookie.
pub async fn create<'e, E>(
    executor: E,
    user_id: &UserId,
    expires_at: OffsetDateTime,
) -> Result<String, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let session_id = ulid::Ulid::new().to_string();
    let token = generate_token();
    let now = OffsetDateTime::now_utc().unix_timestamp();

    sqlx::query(
        "INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&session_id)
    .bind(user_id.as_str())
    .bind(hash_token(&token))
    .bind(expires_at.unix_timestamp())
    .bind(now)
    .execute(executor)
    .await?;

    Ok(token)
}

/// Find a valid (non-expired) session by its raw token.
pub async fn find_valid<'e, E>(executor: E, token: &str) -> Result<Option<Session>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();

    sqlx::query_as::<_, Session>(
        "SELECT id, user_id, token_hash, expires_at, created_at FROM sessions WHERE token_hash = ? AND expires_at > ?",
    )
    .bind(hash_token(token))
    .bind(now)
    .fetch_optional(executor)
    .await
}

/// Delete the session for a raw token. Returns whether one existed.
pub async fn delete_by_token<'e, E>(executor: E, token: &str) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(hash_token(token))
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove expired sessions. Returns how many were removed.
pub async fn delete_expired<'e, E>(executor: E) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
