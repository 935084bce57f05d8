use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{db::error::DatabaseError, model::SessionRecord};

#[tracing::instrument(name = "insert session", skip_all, fields(user_id = %session.user_id))]
pub async fn insert_session(pool: &PgPool, session: &SessionRecord) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO sessions
            (token_hash, user_id, created_at, expires_at)
        VALUES
            ($1, $2, $3, $4);
    "#,
    )
    .bind(&session.token_hash)
    .bind(session.user_id)
    .bind(session.created_at)
    .bind(session.expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

#[tracing::instrument(name = "get session", skip_all)]
pub async fn get_session(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<SessionRecord>, DatabaseError> {
    let session = sqlx::query_as::<_, SessionRecord>(
        r#"
        SELECT
            token_hash, user_id, created_at, expires_at
        FROM
            sessions
        WHERE
            token_hash = $1;
    "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

#[tracing::instrument(name = "delete session", skip_all)]
pub async fn delete_session(pool: &PgPool, token_hash: &str) -> Result<(), DatabaseError> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1;")
        .bind(token_hash)
        .execute(pool)
        .await?;

    Ok(())
}

#[tracing::instrument(name = "delete expired sessions", skip_all)]
pub async fn delete_expired_sessions(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> Result<u64, DatabaseError> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1;")
        .bind(now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
