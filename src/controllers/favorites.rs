use axum::{Extension, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    controllers::{AppJson, AppPath, non_blank},
    error::Error,
    model::{Drama, Favorite, FavoriteWithDrama, UserId},
    response::{Data, Empty, Envelope, List},
    state::SharedAppState,
};

/// A favorite as the list endpoint shows it, with the drama nested under `dramas`.
#[derive(Serialize, Deserialize, Debug)]
pub struct FavoriteEntry {
    pub id: Uuid,
    pub drama_id: String,
    pub created_at: DateTime<Utc>,
    pub dramas: Drama,
}

impl From<FavoriteWithDrama> for FavoriteEntry {
    fn from(value: FavoriteWithDrama) -> Self {
        FavoriteEntry {
            id: value.favorite.id,
            drama_id: value.favorite.drama_id,
            created_at: value.favorite.created_at,
            dramas: value.drama,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CheckBody {
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
}

#[derive(Deserialize, Debug)]
pub struct AddFavoriteRequest {
    #[serde(default)]
    pub drama_id: Option<String>,
}

#[tracing::instrument(name = "[GET] favorites", skip_all, fields(user_id = %user_id))]
pub async fn index(
    Extension(UserId(user_id)): Extension<UserId>,
    State(app_state): State<SharedAppState>,
) -> Result<Envelope<List<FavoriteEntry>>, Error> {
    let favorites = app_state.favorites.list_favorites(user_id).await?;

    Ok(Envelope::success(List::new(
        favorites.into_iter().map(FavoriteEntry::from).collect(),
    )))
}

#[tracing::instrument(name = "[GET] favorites/check/{drama_id}", skip_all, fields(user_id = %user_id))]
pub async fn check(
    Extension(UserId(user_id)): Extension<UserId>,
    State(app_state): State<SharedAppState>,
    AppPath(drama_id): AppPath<String>,
) -> Result<Envelope<CheckBody>, Error> {
    let is_favorite = app_state.favorites.is_favorite(user_id, &drama_id).await?;

    Ok(Envelope::success(CheckBody { is_favorite }))
}

#[tracing::instrument(name = "[POST] favorites", skip_all, fields(user_id = %user_id))]
pub async fn store(
    Extension(UserId(user_id)): Extension<UserId>,
    State(app_state): State<SharedAppState>,
    AppJson(request): AppJson<AddFavoriteRequest>,
) -> Result<(StatusCode, Envelope<Data<Favorite>>), Error> {
    let drama_id = non_blank(request.drama_id)
        .ok_or_else(|| Error::BadRequest("drama_id is required".to_string()))?;

    let favorite = app_state.favorites.add_favorite(user_id, &drama_id).await?;

    Ok((StatusCode::CREATED, Envelope::success(Data { data: favorite })))
}

#[tracing::instrument(name = "[DELETE] favorites/{drama_id}", skip_all, fields(user_id = %user_id))]
pub async fn destroy(
    Extension(UserId(user_id)): Extension<UserId>,
    State(app_state): State<SharedAppState>,
    AppPath(drama_id): AppPath<String>,
) -> Result<Envelope<Empty>, Error> {
    app_state.favorites.remove_favorite(user_id, &drama_id).await?;

    Ok(Envelope::success(Empty {}))
}
