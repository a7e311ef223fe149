//! Shared reqwest plumbing for the provider clients.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::{Error, Result};

/// User-Agent sent with every provider request.
const USER_AGENT: &str = concat!("impactsim/", env!("CARGO_PKG_VERSION"));

/// Longest slice of an error body echoed into an error message.
const MAX_ERROR_BODY: usize = 512;

/// Build an async client with the given request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Config {
            message: format!("failed to create HTTP client: {}", e),
        })
}

/// Send a request and turn transport failures into upstream errors.
pub(crate) async fn send(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::upstream(service, format!("request failed: {}", without_url(e))))?;

    ensure_success(service, response).await
}

/// Reject non-2xx responses, keeping a prefix of the body for diagnostics.
pub(crate) async fn ensure_success(service: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(MAX_ERROR_BODY).collect();
    Err(Error::upstream(service, format!("HTTP {}: {}", status, body.trim())))
}

/// Read a JSON body, reporting decode failures as an unexpected shape.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T> {
    response.json::<T>().await.map_err(|e| {
        Error::upstream(
            service,
            format!("unexpected response shape: {}", without_url(e)),
        )
    })
}

/// Provider URLs carry API keys in their query strings; keep them out of
/// error messages and logs.
fn without_url(error: reqwest::Error) -> reqwest::Error {
    error.without_url()
}
