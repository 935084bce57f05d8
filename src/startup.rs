use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tokio::{net::TcpListener, task::JoinHandle};

use crate::{
    auth::SessionStore,
    config::Config,
    routes::init_router,
    state::AppState,
};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub struct Application {
    port: u16,
    host: String,
    listener: TcpListener,
    router: Router,
    sessions: SessionStore,
}

impl Application {
    pub async fn build(config: Config) -> Result<Self, anyhow::Error> {
        let state = AppState::init(config).await?;
        Self::build_with_state(state).await
    }

    /// Binds the configured address; port `0` picks a free one.
    pub async fn build_with_state(state: AppState) -> Result<Self, anyhow::Error> {
        let address = state.config.application.get_address();

        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Unable opening port {address}"))?;

        let address = listener.local_addr()?;
        let port = address.port();
        let host = address.ip().to_string();

        let sessions = state.sessions.clone();
        let router = init_router(state)?;

        Ok(Application {
            port,
            host,
            listener,
            router,
            sessions,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host(&self) -> String {
        self.host.clone()
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        let reaper = spawn_session_reaper(self.sessions);

        let result = axum::serve(self.listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await;

        reaper.abort();
        result
    }
}

/// Deletes expired sessions once an hour. Validation rejects them regardless.
fn spawn_session_reaper(sessions: SessionStore) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match sessions.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Purged expired sessions"),
                Err(e) => tracing::error!(err.msg = %e, err.details = ?e, "Session purge failed"),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(err.msg = %e, "Unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutting down");
}
