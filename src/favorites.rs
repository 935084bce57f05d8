use std::{sync::Arc, time::Duration};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{DatabaseError, Store},
    deadline::bounded,
    error::Error,
    model::{Favorite, FavoriteWithDrama},
};

#[derive(Debug, thiserror::Error)]
pub enum FavoriteError {
    #[error("Already in favorites")]
    AlreadyFavorited,
}

/// Per-user set of favorited dramas.
#[derive(Clone)]
pub struct FavoritesLedger {
    store: Arc<dyn Store>,
    timeout: Duration,
}

impl FavoritesLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn is_favorite(&self, user_id: Uuid, drama_id: &str) -> Result<bool, Error> {
        bounded(
            self.timeout,
            "favorite exists",
            self.store.favorite_exists(user_id, drama_id),
        )
        .await
    }

    /// Newest first.
    pub async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<FavoriteWithDrama>, Error> {
        bounded(
            self.timeout,
            "list favorites",
            self.store.list_favorites(user_id),
        )
        .await
    }

    /// Uniqueness of the pair is decided by the store, so two racing adds
    /// yield one favorite and one `AlreadyFavorited`.
    #[tracing::instrument(name = "add favorite", skip(self))]
    pub async fn add_favorite(&self, user_id: Uuid, drama_id: &str) -> Result<Favorite, Error> {
        let favorite = Favorite {
            id: Uuid::new_v4(),
            user_id,
            drama_id: drama_id.to_string(),
            created_at: Utc::now(),
        };

        match bounded(
            self.timeout,
            "insert favorite",
            self.store.insert_favorite(&favorite),
        )
        .await
        {
            Ok(()) => Ok(favorite),
            Err(Error::Database(DatabaseError::UniqueViolation)) => {
                Err(FavoriteError::AlreadyFavorited.into())
            }
            Err(Error::Database(DatabaseError::ForeignKeyViolation)) => {
                Err(Error::NotFound("Drama"))
            }
            Err(e) => Err(e),
        }
    }

    /// Removing a pair that is not present succeeds.
    #[tracing::instrument(name = "remove favorite", skip(self))]
    pub async fn remove_favorite(&self, user_id: Uuid, drama_id: &str) -> Result<(), Error> {
        bounded(
            self.timeout,
            "delete favorite",
            self.store.delete_favorite(user_id, drama_id),
        )
        .await?;

        Ok(())
    }
}
