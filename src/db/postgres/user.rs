use sqlx::PgPool;
use uuid::Uuid;

use crate::{db::error::DatabaseError, model::User};

#[tracing::instrument(name = "insert user", skip_all, fields(user_id = %user.id))]
pub async fn insert_user(
    pool: &PgPool,
    user: &User,
    password_hash: &str,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO users
            (id, email, password)
        VALUES
            ($1, $2, $3);
    "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(password_hash)
    .execute(pool)
    .await?;

    Ok(())
}

#[tracing::instrument(name = "get user by email", skip_all)]
pub async fn get_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<(User, String)>, DatabaseError> {
    let row: Option<(Uuid, String, String)> = sqlx::query_as(
        r#"
        SELECT
            id, email, password
        FROM
            users
        WHERE
            LOWER(email) = LOWER($1)
    "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, email, password)| (User { id, email }, password)))
}

#[tracing::instrument(name = "get user by id", skip_all, fields(user_id = %user_id))]
pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, (Uuid, String)>(
        r#"
        SELECT
            id, email
        FROM
            users
        WHERE
            id = $1;
    "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .map(|(id, email)| User { id, email });

    Ok(user)
}
