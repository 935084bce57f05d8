use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::model::{
    Drama, DramaFilter, Episode, Favorite, FavoriteWithDrama, SessionRecord, User,
};

use super::{DatabaseError, Store};

pub mod drama;
pub mod episode;
pub mod favorite;
pub mod session;
pub mod user;

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn insert_user(&self, user: &User, password_hash: &str) -> Result<(), DatabaseError> {
        user::insert_user(&self.pool, user, password_hash).await
    }

    async fn get_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, DatabaseError> {
        user::get_user_by_email(&self.pool, email).await
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, DatabaseError> {
        user::get_user_by_id(&self.pool, user_id).await
    }

    async fn insert_session(&self, session: &SessionRecord) -> Result<(), DatabaseError> {
        session::insert_session(&self.pool, session).await
    }

    async fn get_session(&self, token_hash: &str) -> Result<Option<SessionRecord>, DatabaseError> {
        session::get_session(&self.pool, token_hash).await
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), DatabaseError> {
        session::delete_session(&self.pool, token_hash).await
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DatabaseError> {
        session::delete_expired_sessions(&self.pool, now).await
    }

    async fn list_dramas(&self, filter: &DramaFilter) -> Result<Vec<Drama>, DatabaseError> {
        drama::list_dramas(&self.pool, filter).await
    }

    async fn get_drama(&self, drama_id: &str) -> Result<Option<Drama>, DatabaseError> {
        drama::get_drama(&self.pool, drama_id).await
    }

    async fn list_episodes(&self, drama_id: &str) -> Result<Vec<Episode>, DatabaseError> {
        episode::list_episodes(&self.pool, drama_id).await
    }

    async fn get_episode(&self, episode_id: &str) -> Result<Option<Episode>, DatabaseError> {
        episode::get_episode(&self.pool, episode_id).await
    }

    async fn increment_episode_view(&self, episode_id: &str) -> Result<u64, DatabaseError> {
        episode::increment_episode_view(&self.pool, episode_id).await
    }

    async fn favorite_exists(&self, user_id: Uuid, drama_id: &str) -> Result<bool, DatabaseError> {
        favorite::favorite_exists(&self.pool, user_id, drama_id).await
    }

    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<FavoriteWithDrama>, DatabaseError> {
        favorite::list_favorites(&self.pool, user_id).await
    }

    async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), DatabaseError> {
        favorite::insert_favorite(&self.pool, favorite).await
    }

    async fn delete_favorite(&self, user_id: Uuid, drama_id: &str) -> Result<u64, DatabaseError> {
        favorite::delete_favorite(&self.pool, user_id, drama_id).await
    }
}
