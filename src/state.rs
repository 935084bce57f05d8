use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::{
    auth::{CredentialVerifier, SessionStore},
    catalog::Catalog,
    config::{Backend, Config},
    db::{MemoryStore, PostgresStore, Store},
    favorites::FavoritesLedger,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub credentials: CredentialVerifier,
    pub catalog: Catalog,
    pub favorites: FavoritesLedger,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub async fn init(config: Config) -> Result<Self, anyhow::Error> {
        let store: Arc<dyn Store> = match config.storage.backend {
            Backend::Postgres => {
                let pool = PgPoolOptions::new()
                    .min_connections(5)
                    .max_connections(30)
                    .connect_lazy_with(config.database.with_db());

                if config.application.run_migration {
                    tracing::warn!("Running database migrations...");
                    sqlx::migrate!("./migrations").run(&pool).await?;
                }

                Arc::new(PostgresStore::new(pool))
            }
            Backend::Memory => {
                tracing::warn!("Using in-memory storage, nothing survives a restart");

                match &config.storage.seed_file {
                    Some(path) => Arc::new(MemoryStore::from_seed_file(path).await?),
                    None => Arc::new(MemoryStore::new()),
                }
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Self {
        let timeout = config.application.request_timeout();

        AppState {
            sessions: SessionStore::new(store.clone(), config.session.ttl()).with_timeout(timeout),
            credentials: CredentialVerifier::new(store.clone()).with_timeout(timeout),
            catalog: Catalog::new(store.clone()).with_timeout(timeout),
            favorites: FavoritesLedger::new(store).with_timeout(timeout),
            config,
        }
    }
}
