use sqlx::PgPool;

use crate::{db::error::DatabaseError, model::Episode};

const EPISODE_COLUMNS: &str = r#"
    id, drama_id, episode_number,
    title, description, thumbnail_url,
    video_url, duration, is_free,
    view_count, created_at
"#;

#[tracing::instrument(name = "list episodes by drama", skip_all, fields(drama_id = %drama_id))]
pub async fn list_episodes(pool: &PgPool, drama_id: &str) -> Result<Vec<Episode>, DatabaseError> {
    let episodes = sqlx::query_as::<_, Episode>(&format!(
        "SELECT {EPISODE_COLUMNS} FROM episodes WHERE drama_id = $1 ORDER BY episode_number ASC;"
    ))
    .bind(drama_id)
    .fetch_all(pool)
    .await?;

    Ok(episodes)
}

#[tracing::instrument(name = "get episode by id", skip_all, fields(episode_id = %episode_id))]
pub async fn get_episode(pool: &PgPool, episode_id: &str) -> Result<Option<Episode>, DatabaseError> {
    let episode = sqlx::query_as::<_, Episode>(&format!(
        "SELECT {EPISODE_COLUMNS} FROM episodes WHERE id = $1;"
    ))
    .bind(episode_id)
    .fetch_optional(pool)
    .await?;

    Ok(episode)
}

/// Increments in place so concurrent viewers never overwrite each other.
#[tracing::instrument(name = "increment episode view", skip_all, fields(episode_id = %episode_id))]
pub async fn increment_episode_view(pool: &PgPool, episode_id: &str) -> Result<u64, DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE episodes
        SET
            view_count = view_count + 1
        WHERE
            id = $1;
    "#,
    )
    .bind(episode_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

#[tracing::instrument(name = "insert episode", skip_all, fields(episode_id = %episode.id))]
pub async fn insert_episode(pool: &PgPool, episode: &Episode) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO episodes
            (id, drama_id, episode_number, title, description, thumbnail_url,
             video_url, duration, is_free, view_count, created_at)
        VALUES
            ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (id)
        DO UPDATE SET
            episode_number = EXCLUDED.episode_number,
            title = EXCLUDED.title,
            description = EXCLUDED.description,
            thumbnail_url = EXCLUDED.thumbnail_url,
            video_url = EXCLUDED.video_url,
            duration = EXCLUDED.duration,
            is_free = EXCLUDED.is_free;
    "#,
    )
    .bind(&episode.id)
    .bind(&episode.drama_id)
    .bind(episode.episode_number)
    .bind(&episode.title)
    .bind(&episode.description)
    .bind(&episode.thumbnail_url)
    .bind(&episode.video_url)
    .bind(episode.duration_minutes)
    .bind(episode.is_free)
    .bind(episode.view_count)
    .bind(episode.created_at)
    .execute(pool)
    .await?;

    Ok(())
}
