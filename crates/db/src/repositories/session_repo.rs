//! Repository for refresh-token sessions (`user_sessions`).
//!
//! A session is usable while it is neither revoked nor past `expires_at`.
//! Refresh consumes a session in one statement, so a token can be exchanged
//! at most once even under concurrent requests.

use sqlx::PgPool;
use storefront_core::types::DbId;

use crate::models::session::{CreateSession, UserSession};

const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                        user_agent, ip_address, created_at, updated_at";

/// Predicate matching sessions that can no longer be used.
const STALE: &str = "(is_revoked OR expires_at <= NOW())";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Revoke the usable session with this token hash and return it.
    ///
    /// `None` when the hash is unknown, already consumed or expired.
    pub async fn consume(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "UPDATE user_sessions SET is_revoked = true
             WHERE refresh_token_hash = $1 AND NOT {STALE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user's revoked and expired sessions. Returns the number removed.
    pub async fn purge_stale(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let query = format!("DELETE FROM user_sessions WHERE user_id = $1 AND {STALE}");
        let result = sqlx::query(&query).bind(user_id).execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Drop every session of a user, signing them out on all devices.
    pub async fn end_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Number of sessions, usable or not, stored for a user.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
