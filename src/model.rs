use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

/// Identity of the caller, inserted into request extensions once the session cookie validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserId(pub Uuid);

#[derive(sqlx::FromRow, Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Genre tags of a drama.
///
/// Membership is what matters, so equality ignores order. The stored order is
/// kept as-is so repeated reads serialize identically. Decoding goes through
/// `From<Vec<String>>`, so duplicates never survive deserialization.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Categories(Vec<String>);

impl Categories {
    pub fn contains(&self, category: &str) -> bool {
        self.0.iter().any(|c| c == category)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Categories {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for category in iter {
            let category = category.into();
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Categories(categories)
    }
}

impl From<Vec<String>> for Categories {
    fn from(value: Vec<String>) -> Self {
        value.into_iter().collect()
    }
}

impl From<Categories> for Vec<String> {
    fn from(value: Categories) -> Self {
        value.0
    }
}

impl PartialEq for Categories {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().all(|c| other.contains(c))
    }
}

impl Eq for Categories {}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct Drama {
    pub id: String,
    pub title: String,
    #[serde(rename = "title_en", default)]
    pub title_alt: Option<String>,
    pub poster_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "episodes", default)]
    pub episode_count: i32,
    #[serde(rename = "category", default)]
    pub categories: Categories,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Episode {
    pub id: String,
    pub drama_id: String,
    pub episode_number: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[sqlx(rename = "duration")]
    #[serde(rename = "duration", default)]
    pub duration_minutes: i32,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// An episode together with the header fields of the drama it belongs to.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EpisodeDetail {
    #[serde(flatten)]
    pub episode: Episode,
    pub drama_title: Option<String>,
    pub drama_poster: Option<String>,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub drama_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FavoriteWithDrama {
    pub favorite: Favorite,
    pub drama: Drama,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DramaOrder {
    /// Newest catalog entries first.
    #[default]
    Recent,
    /// Most viewed first.
    Popular,
}

impl DramaOrder {
    /// Total order over dramas; `id` breaks every remaining tie.
    pub fn compare(&self, a: &Drama, b: &Drama) -> Ordering {
        let primary = match self {
            DramaOrder::Recent => b.created_at.cmp(&a.created_at),
            DramaOrder::Popular => b
                .view_count
                .cmp(&a.view_count)
                .then_with(|| b.created_at.cmp(&a.created_at)),
        };

        primary.then_with(|| a.id.cmp(&b.id))
    }
}

pub const DEFAULT_DRAMA_LIMIT: i64 = 50;
pub const MAX_DRAMA_LIMIT: i64 = 200;

/// Catalog filter. Every populated field narrows the result (logical AND).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DramaFilter {
    pub section: Option<String>,
    pub featured: bool,
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: i64,
    pub order: DramaOrder,
}

impl Default for DramaFilter {
    fn default() -> Self {
        Self {
            section: None,
            featured: false,
            category: None,
            search: None,
            limit: DEFAULT_DRAMA_LIMIT,
            order: DramaOrder::default(),
        }
    }
}

impl DramaFilter {
    pub fn matches(&self, drama: &Drama) -> bool {
        if let Some(section) = &self.section {
            if drama.section.as_deref() != Some(section.as_str()) {
                return false;
            }
        }

        if self.featured && !drama.is_featured {
            return false;
        }

        if let Some(category) = &self.category {
            if !drama.categories.contains(category) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let found = [
                Some(drama.title.as_str()),
                drama.title_alt.as_deref(),
                drama.description.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle));

            if !found {
                return false;
            }
        }

        true
    }
}
