use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{
    Drama, DramaFilter, Episode, Favorite, FavoriteWithDrama, SessionRecord, User,
};

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::DatabaseError;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Persistence port shared by every storage backend.
///
/// Implementations must enforce uniqueness of `(user_id, drama_id)` favorites and
/// of case-folded emails themselves, reporting a duplicate as
/// [`DatabaseError::UniqueViolation`]. View increments must be applied in place.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: &User, password_hash: &str) -> Result<(), DatabaseError>;

    /// Looks up a user by email, ignoring case. Returns the user and the stored password hash.
    async fn get_user_by_email(&self, email: &str)
    -> Result<Option<(User, String)>, DatabaseError>;

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn insert_session(&self, session: &SessionRecord) -> Result<(), DatabaseError>;

    async fn get_session(&self, token_hash: &str) -> Result<Option<SessionRecord>, DatabaseError>;

    async fn delete_session(&self, token_hash: &str) -> Result<(), DatabaseError>;

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DatabaseError>;

    async fn list_dramas(&self, filter: &DramaFilter) -> Result<Vec<Drama>, DatabaseError>;

    async fn get_drama(&self, drama_id: &str) -> Result<Option<Drama>, DatabaseError>;

    /// Episodes of a drama, ascending by episode number.
    async fn list_episodes(&self, drama_id: &str) -> Result<Vec<Episode>, DatabaseError>;

    async fn get_episode(&self, episode_id: &str) -> Result<Option<Episode>, DatabaseError>;

    /// Returns the number of episodes touched (0 or 1).
    async fn increment_episode_view(&self, episode_id: &str) -> Result<u64, DatabaseError>;

    async fn favorite_exists(&self, user_id: Uuid, drama_id: &str) -> Result<bool, DatabaseError>;

    /// Favorites of a user joined with their drama, newest first.
    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<FavoriteWithDrama>, DatabaseError>;

    /// Fails with `UniqueViolation` on a duplicate pair and `ForeignKeyViolation`
    /// when the drama does not exist.
    async fn insert_favorite(&self, favorite: &Favorite) -> Result<(), DatabaseError>;

    /// Returns the number of rows removed.
    async fn delete_favorite(&self, user_id: Uuid, drama_id: &str) -> Result<u64, DatabaseError>;
}
