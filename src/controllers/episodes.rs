use axum::extract::State;

use crate::{
    controllers::AppPath,
    error::Error,
    model::EpisodeDetail,
    response::{Data, Empty, Envelope},
    state::SharedAppState,
};

#[tracing::instrument(name = "[GET] episodes/{id}", skip_all, fields(episode_id = %id))]
pub async fn show(
    State(app_state): State<SharedAppState>,
    AppPath(id): AppPath<String>,
) -> Result<Envelope<Data<EpisodeDetail>>, Error> {
    let episode = app_state.catalog.get_episode_detail(&id).await?;

    Ok(Envelope::success(Data { data: episode }))
}

#[tracing::instrument(name = "[POST] episodes/{id}/view", skip_all, fields(episode_id = %id))]
pub async fn view(
    State(app_state): State<SharedAppState>,
    AppPath(id): AppPath<String>,
) -> Result<Envelope<Empty>, Error> {
    app_state.catalog.increment_episode_view(&id).await?;

    Ok(Envelope::success(Empty {}))
}
