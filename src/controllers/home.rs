use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::Error, response::Envelope};

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[tracing::instrument(name = "[GET] health", skip_all)]
pub async fn index() -> Envelope<Health> {
    Envelope::success(Health {
        status: "ok",
        timestamp: Utc::now(),
    })
}

pub async fn fallback() -> Error {
    Error::NotFound("Endpoint")
}

pub async fn method_not_allowed() -> Error {
    Error::MethodNotAllowed
}
