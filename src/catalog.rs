use std::{sync::Arc, time::Duration};

use crate::{
    db::Store,
    deadline::bounded,
    error::Error,
    model::{Drama, DramaFilter, Episode, EpisodeDetail},
};

/// Read side of the drama catalog plus the public view counter.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn Store>,
    timeout: Duration,
}

impl Catalog {
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

    pub async fn list_dramas(&self, filter: &DramaFilter) -> Result<Vec<Drama>, Error> {
        bounded(self.timeout, "list dramas", self.store.list_dramas(filter)).await
    }

    pub async fn get_drama(&self, drama_id: &str) -> Result<Drama, Error> {
        bounded(self.timeout, "get drama", self.store.get_drama(drama_id))
            .await?
            .ok_or(Error::NotFound("Drama"))
    }

    /// An unknown drama simply has no episodes.
    pub async fn list_episodes(&self, drama_id: &str) -> Result<Vec<Episode>, Error> {
        bounded(
            self.timeout,
            "list episodes",
            self.store.list_episodes(drama_id),
        )
        .await
    }

    pub async fn get_episode(&self, episode_id: &str) -> Result<Episode, Error> {
        bounded(self.timeout, "get episode", self.store.get_episode(episode_id))
            .await?
            .ok_or(Error::NotFound("Episode"))
    }

    pub async fn get_episode_detail(&self, episode_id: &str) -> Result<EpisodeDetail, Error> {
        let episode = self.get_episode(episode_id).await?;
        let drama = bounded(
            self.timeout,
            "get drama",
            self.store.get_drama(&episode.drama_id),
        )
        .await?;

        Ok(EpisodeDetail {
            drama_title: drama.as_ref().map(|d| d.title.clone()),
            drama_poster: drama.map(|d| d.poster_url),
            episode,
        })
    }

    /// Counts one view. Incrementing an episode that does not exist is a no-op.
    #[tracing::instrument(name = "increment episode view", skip(self))]
    pub async fn increment_episode_view(&self, episode_id: &str) -> Result<(), Error> {
        let touched = bounded(
            self.timeout,
            "increment episode view",
            self.store.increment_episode_view(episode_id),
        )
        .await?;

        if touched == 0 {
            tracing::debug!("No episode to increment");
        }

        Ok(())
    }
}
