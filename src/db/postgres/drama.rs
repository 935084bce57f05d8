use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json};

use crate::{
    db::error::DatabaseError,
    model::{Drama, DramaFilter, DramaOrder},
};

pub(super) const DRAMA_COLUMNS: &str = r#"
    id, title, title_en,
    poster_url, description, episodes,
    category, section, view_count,
    rating, year, is_featured,
    created_at
"#;

/// Row shape of the `dramas` table. Categories live in a JSONB array column and
/// only become a [`crate::model::Categories`] once decoded here.
#[derive(sqlx::FromRow)]
pub(super) struct DramaRow {
    pub id: String,
    pub title: String,
    pub title_en: Option<String>,
    pub poster_url: String,
    pub description: Option<String>,
    pub episodes: i32,
    pub category: Json<Vec<String>>,
    pub section: Option<String>,
    pub view_count: i64,
    pub rating: f32,
    pub year: Option<i32>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DramaRow> for Drama {
    fn from(row: DramaRow) -> Self {
        Drama {
            id: row.id,
            title: row.title,
            title_alt: row.title_en,
            poster_url: row.poster_url,
            description: row.description,
            episode_count: row.episodes,
            categories: row.category.0.into(),
            section: row.section,
            view_count: row.view_count,
            rating: row.rating,
            year: row.year,
            is_featured: row.is_featured,
            created_at: row.created_at,
        }
    }
}

/// Escapes `LIKE` metacharacters so the search term matches literally.
pub(super) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[tracing::instrument(name = "list dramas", skip_all, fields(filter = ?filter))]
pub async fn list_dramas(pool: &PgPool, filter: &DramaFilter) -> Result<Vec<Drama>, DatabaseError> {
    let mut query_builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {DRAMA_COLUMNS} FROM dramas WHERE 1 = 1"));

    if let Some(section) = &filter.section {
        query_builder.push(" AND section = ").push_bind(section.clone());
    }

    if filter.featured {
        query_builder.push(" AND is_featured = TRUE");
    }

    if let Some(category) = &filter.category {
        query_builder
            .push(" AND category @> jsonb_build_array(")
            .push_bind(category.clone())
            .push("::text)");
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        query_builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR title_en ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    query_builder.push(match filter.order {
        DramaOrder::Recent => " ORDER BY created_at DESC, id ASC",
        DramaOrder::Popular => " ORDER BY view_count DESC, created_at DESC, id ASC",
    });
    query_builder.push(" LIMIT ").push_bind(filter.limit);

    let dramas = query_builder
        .build_query_as::<DramaRow>()
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Drama::from)
        .collect();

    Ok(dramas)
}

#[tracing::instrument(name = "get drama by id", skip_all, fields(drama_id = %drama_id))]
pub async fn get_drama(pool: &PgPool, drama_id: &str) -> Result<Option<Drama>, DatabaseError> {
    let drama = sqlx::query_as::<_, DramaRow>(&format!(
        "SELECT {DRAMA_COLUMNS} FROM dramas WHERE id = $1;"
    ))
    .bind(drama_id)
    .fetch_optional(pool)
    .await?
    .map(Drama::from);

    Ok(drama)
}

/// Catalog provisioning happens outside the service; this exists for seeding and tests.
#[tracing::instrument(name = "insert drama", skip_all, fields(drama_id = %drama.id))]
pub async fn insert_drama(pool: &PgPool, drama: &Drama) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO dramas
            (id, title, title_en, poster_url, description, episodes,
             category, section, view_count, rating, year, is_featured, created_at)
        VALUES
            ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ON CONFLICT (id)
        DO UPDATE SET
            title = EXCLUDED.title,
            title_en = EXCLUDED.title_en,
            poster_url = EXCLUDED.poster_url,
            description = EXCLUDED.description,
            episodes = EXCLUDED.episodes,
            category = EXCLUDED.category,
            section = EXCLUDED.section,
            rating = EXCLUDED.rating,
            year = EXCLUDED.year,
            is_featured = EXCLUDED.is_featured;
    "#,
    )
    .bind(&drama.id)
    .bind(&drama.title)
    .bind(&drama.title_alt)
    .bind(&drama.poster_url)
    .bind(&drama.description)
    .bind(drama.episode_count)
    .bind(Json(drama.categories.as_slice()))
    .bind(&drama.section)
    .bind(drama.view_count)
    .bind(drama.rating)
    .bind(drama.year)
    .bind(drama.is_featured)
    .bind(drama.created_at)
    .execute(pool)
    .await?;

    Ok(())
}
