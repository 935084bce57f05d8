use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::error::DatabaseError,
    model::{Drama, Favorite, FavoriteWithDrama},
};

use super::drama::DramaRow;

#[derive(sqlx::FromRow)]
struct FavoriteRow {
    favorite_id: Uuid,
    user_id: Uuid,
    favorited_at: DateTime<Utc>,
    #[sqlx(flatten)]
    drama: DramaRow,
}

#[tracing::instrument(name = "check favorite", skip_all, fields(user_id = %user_id, drama_id = %drama_id))]
pub async fn favorite_exists(
    pool: &PgPool,
    user_id: Uuid,
    drama_id: &str,
) -> Result<bool, DatabaseError> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM
                favorites
            WHERE
                user_id = $1 AND drama_id = $2
        );
    "#,
    )
    .bind(user_id)
    .bind(drama_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

#[tracing::instrument(name = "get user favorites", skip_all, fields(user_id = %user_id))]
pub async fn list_favorites(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<FavoriteWithDrama>, DatabaseError> {
    let mut favorite_stream = sqlx::query_as::<_, FavoriteRow>(
        r#"
        SELECT
            f.id AS favorite_id, f.user_id, f.created_at AS favorited_at,
            d.id, d.title, d.title_en,
            d.poster_url, d.description, d.episodes,
            d.category, d.section, d.view_count,
            d.rating, d.year, d.is_featured,
            d.created_at
        FROM
            favorites f
        INNER JOIN
            dramas d ON f.drama_id = d.id
        WHERE
            f.user_id = $1
        ORDER BY f.created_at DESC, f.id ASC;
    "#,
    )
    .bind(user_id)
    .fetch(pool);

    let mut favorites = Vec::new();
    while let Some(row) = favorite_stream.try_next().await? {
        let drama = Drama::from(row.drama);
        favorites.push(FavoriteWithDrama {
            favorite: Favorite {
                id: row.favorite_id,
                user_id: row.user_id,
                drama_id: drama.id.clone(),
                created_at: row.favorited_at,
            },
            drama,
        });
    }

    Ok(favorites)
}

/// The `(user_id, drama_id)` unique constraint arbitrates concurrent inserts.
#[tracing::instrument(name = "insert favorite", skip_all, fields(user_id = %favorite.user_id, drama_id = %favorite.drama_id))]
pub async fn insert_favorite(pool: &PgPool, favorite: &Favorite) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO favorites
            (id, user_id, drama_id, created_at)
        VALUES
            ($1, $2, $3, $4);
    "#,
    )
    .bind(favorite.id)
    .bind(favorite.user_id)
    .bind(&favorite.drama_id)
    .bind(favorite.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

#[tracing::instrument(name = "delete favorite", skip_all, fields(user_id = %user_id, drama_id = %drama_id))]
pub async fn delete_favorite(
    pool: &PgPool,
    user_id: Uuid,
    drama_id: &str,
) -> Result<u64, DatabaseError> {
    let result = sqlx::query(
        r#"
        DELETE FROM favorites
        WHERE
            user_id = $1 AND drama_id = $2;
    "#,
    )
    .bind(user_id)
    .bind(drama_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
