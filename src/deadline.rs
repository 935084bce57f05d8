use std::{future::Future, time::Duration};

use crate::error::Error;

/// Runs `operation` under `timeout`. An elapsed deadline becomes [`Error::Timeout`];
/// the store calls underneath are single statements, so nothing is left half-applied.
pub async fn bounded<T, E, F>(timeout: Duration, name: &'static str, operation: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, E>>,
    Error: From<E>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result.map_err(Error::from),
        Err(_) => {
            tracing::warn!(
                operation = name,
                timeout_ms = timeout.as_millis() as u64,
                "Operation timed out"
            );
            Err(Error::Timeout)
        }
    }
}
