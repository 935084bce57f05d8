use std::{collections::HashMap, path::Path};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{
    Drama, DramaFilter, Episode, Favorite, FavoriteWithDrama, SessionRecord, User,
};

use super::{DatabaseError, Store};

/// Catalog snapshot used to seed a [`MemoryStore`].
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
pub struct CatalogSeed {
    #[serde(default)]
    pub dramas: Vec<Drama>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, (User, String)>,
    sessions: HashMap<String, SessionRecord>,
    dramas: Vec<Drama>,
    episodes: Vec<Episode>,
    favorites: Vec<Favorite>,
}

/// Process-local store. All tables sit behind one lock, so every write is
/// serialized and check-then-insert sequences cannot interleave.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(seed: CatalogSeed) -> Self {
        Self {
            tables: RwLock::new(Tables {
                dramas: seed.dramas,
                episodes: seed.episodes,
                ..Tables::default()
            }),
        }
    }

    #[tracing::instrument(name = "load catalog seed", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let content = tokio::fs::read_to_string(path.as_ref())
            .await
            .context("read catalog seed file")?;
        let seed: CatalogSeed =
            serde_json::from_str(&content).context("parse catalog seed file")?;

        tracing::info!(
            dramas = seed.dramas.len(),
            episodes = seed.episodes.len(),
            "Loaded catalog seed"
        );

        Ok(Self::with_catalog(seed))
    }

    /// Adds or replaces a drama.
    pub async fn insert_drama(&self, drama: Drama) {
        let mut tables = self.tables.write().await;
        tables.dramas.retain(|d| d.id != drama.id);
        tables.dramas.push(drama);
    }

    /// Adds or replaces an episode.
    pub async fn insert_episode(&self, episode: Episode) {
        let mut tables = self.tables.write().await;
        tables.episodes.retain(|e| e.id != episode.id);
        tables.episodes.push(episode);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &User, password_hash: &str) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;

        let email = user.email.to_lowercase();
        if tables
            .users
            .values()
            .any(|(existing, _)| existing.email.to_lowercase() == email)
        {
            return Err(DatabaseError::UniqueViolation);
        }
        if tables.users.contains_key(&user.id) {
            return Err(DatabaseError::UniqueViolation);
        }

        tables
            .users
            .insert(user.id, (user.clone(), password_hash.to_string()));

        Ok(())
    }

    async fn get_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, DatabaseError> {
        let tables = self.tables.read().await;
        let email = email.to_lowercase();

        Ok(tables
            .users
            .values()
            .find(|(user, _)| user.email.to_lowercase() == email)
            .cloned())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&user_id).map(|(user, _)| user.clone()))
    }

    async fn insert_session(&self, session: &SessionRecord) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&session.user_id) {
            return Err(DatabaseError::ForeignKeyViolation);
        }
        if tables.sessions.contains_key(&session.token_hash) {
            return Err(DatabaseError::UniqueViolation);
        }

        tables
            .sessions
            .insert(session.token_hash.clone(), session.clone());

        Ok(())
    }

    async fn get_session(&self, token_hash: &str) -> Result<Option<SessionRecord>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.sessions.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.sessions.remove(token_hash);
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, session| !session.is_expired(now));
        Ok((before - tables.sessions.len()) as u64)
    }

    async fn list_dramas(&self, filter: &DramaFilter) -> Result<Vec<Drama>, DatabaseError> {
        let tables = self.tables.read().await;

        let mut dramas: Vec<Drama> = tables
            .dramas
            .iter()
            .filter(|drama| filter.matches(drama))
            .cloned()
            .collect();
        dramas.sort_by(|a, b| filter.order.compare(a, b));
        dramas.truncate(usize::try_from(filter.limit).unwrap_or(0));

        Ok(dramas)
    }

    async fn get_drama(&self, drama_id: &str) -> Result<Option<Drama>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.dramas.iter().find(|d| d.id == drama_id).cloned())
    }

    async fn list_episodes(&self, drama_id: &str) -> Result<Vec<Episode>, DatabaseError> {
        let tables = self.tables.read().await;

        let mut episodes: Vec<Episode> = tables
            .episodes
            .iter()
            .filter(|e| e.drama_id == drama_id)
            .cloned()
            .collect();
        episodes.sort_by_key(|e| e.episode_number);

        Ok(episodes)
    }

    async fn get_episode(&self, episode_id: &str) -> Result<Option<Episode>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.episodes.iter().find(|e| e.id == episode_id).cloned())
    }

    async fn increment_episode_view(&self, episode_id: &str) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;

        match tables.episodes.iter_mut().find(|e| e.id == episode_id) {
            Some(episode) => {
                episode.view_count += 1;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn favorite_exists(&self, user_id: Uuid, drama_id: &str) -> Result<bool, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .favorites
            .iter()
            .any(|f| f.user_id == user_id && f.drama_id == drama_id))
    }

    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<FavoriteWithDrama>, DatabaseError> {
        let tables = self.tables.read().await;

        // Newest insert first, so equal timestamps still come back newest first.
        let mut favorites: Vec<FavoriteWithDrama> = tables
            .favorites
            .iter()
            .rev()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| {
                tables
                    .dramas
                    .iter()
                    .find(|d| d.id == f.drama_id)
                    .map(|drama| FavoriteWithDrama {
                        favorite: f.clone(),
                        drama: drama.clone(),
                    })
            })
            .collect();
        favorites.sort_by(|a, b| b.favorite.created_at.cmp(&a.favorite.created_at));

        Ok(favorites)
    }

    async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;

        if !tables.dramas.iter().any(|d| d.id == favorite.drama_id) {
            return Err(DatabaseError::ForeignKeyViolation);
        }
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == favorite.user_id && f.drama_id == favorite.drama_id)
        {
            return Err(DatabaseError::UniqueViolation);
        }

        tables.favorites.push(favorite.clone());

        Ok(())
    }

    async fn delete_favorite(&self, user_id: Uuid, drama_id: &str) -> Result<u64, DatabaseError> {
        let mut tables = self.tables.write().await;

        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.user_id == user_id && f.drama_id == drama_id));

        Ok((before - tables.favorites.len()) as u64)
    }
}
