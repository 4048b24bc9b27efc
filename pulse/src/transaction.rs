//! The single measured operation: one GET against the health endpoint.
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Body returned by the service's `/health` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthCheckResponse {
    pub id: Uuid,
    pub service: String,
}

/// Ways a single health check can fail.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The request never completed (connect, TLS, timeout).
    #[error("transport error")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("service responded with {0}")]
    Status(StatusCode),

    /// The service answered 2xx but the body was not a health-check response.
    #[error("malformed health-check response")]
    Body(#[source] reqwest::Error),
}

pub(crate) async fn send_health_check(
    client: &Client,
    url: &Url,
) -> Result<HealthCheckResponse, TransactionError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(TransactionError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransactionError::Status(status));
    }

    response.json().await.map_err(TransactionError::Body)
}
