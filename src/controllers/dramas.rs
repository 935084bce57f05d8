use axum::extract::State;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use validator::Validate;

use crate::{
    controllers::{AppPath, AppQuery, non_blank},
    error::Error,
    model::{DEFAULT_DRAMA_LIMIT, Drama, DramaFilter, DramaOrder, Episode},
    response::{Data, Envelope, List},
    state::SharedAppState,
};

#[derive(serde::Deserialize, serde::Serialize, Debug, Default, Validate)]
pub struct DramaQuery {
    #[serde(default)]
    pub section: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub featured: Option<bool>,

    #[serde(default)]
    pub search: Option<String>,

    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    #[validate(range(min = 1, max = 200, message = "limit must be between 1 and 200"))]
    pub limit: Option<i64>,

    #[serde(default)]
    pub order: Option<DramaOrder>,
}

impl From<DramaQuery> for DramaFilter {
    fn from(query: DramaQuery) -> Self {
        DramaFilter {
            section: non_blank(query.section),
            featured: query.featured.unwrap_or(false),
            category: non_blank(query.category),
            search: non_blank(query.search),
            limit: query.limit.unwrap_or(DEFAULT_DRAMA_LIMIT),
            order: query.order.unwrap_or_default(),
        }
    }
}

#[tracing::instrument(name = "[GET] dramas", skip_all, fields(query = ?query))]
pub async fn index(
    State(app_state): State<SharedAppState>,
    AppQuery(query): AppQuery<DramaQuery>,
) -> Result<Envelope<List<Drama>>, Error> {
    query.validate().map_err(Error::Validation)?;

    let dramas = app_state.catalog.list_dramas(&query.into()).await?;

    Ok(Envelope::success(List::new(dramas)))
}

#[tracing::instrument(name = "[GET] dramas/{id}", skip_all, fields(drama_id = %id))]
pub async fn show(
    State(app_state): State<SharedAppState>,
    AppPath(id): AppPath<String>,
) -> Result<Envelope<Data<Drama>>, Error> {
    let drama = app_state.catalog.get_drama(&id).await?;

    Ok(Envelope::success(Data { data: drama }))
}

#[tracing::instrument(name = "[GET] dramas/{id}/episodes", skip_all, fields(drama_id = %id))]
pub async fn episodes(
    State(app_state): State<SharedAppState>,
    AppPath(id): AppPath<String>,
) -> Result<Envelope<List<Episode>>, Error> {
    let episodes = app_state.catalog.list_episodes(&id).await?;

    Ok(Envelope::success(List::new(episodes)))
}
