//! Health check handlers for liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" or "not_ready: <reason>".
    pub status: String,

    pub service: String,

    pub version: String,

    /// Number of map images held in the cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_images: Option<usize>,

    /// Number of asteroids with a known diameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asteroids_known: Option<usize>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            cached_images: None,
            asteroids_known: None,
        }
    }

    pub fn ready(
        service: &str,
        version: &str,
        cached_images: usize,
        asteroids_known: usize,
    ) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            cached_images: Some(cached_images),
            asteroids_known: Some(asteroids_known),
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            service: service.to_string(),
            version: version.to_string(),
            cached_images: None,
            asteroids_known: None,
        }
    }
}

/// Liveness probe handler. Never touches external resources.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"impactsim-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// Not ready when the artifact root exists but is not a directory, since
/// image edits could not persist their source. Providers are not probed.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"impactsim-service-shared","version":"0.1.0","cached_images":3,"asteroids_known":10}
/// ```
pub async fn health_ready<M, P, G>(State(state): State<AppState<M, P, G>>) -> Response {
    let service_name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let service = state.service();
    let root = service.artifacts().root();
    if root.exists() && !root.is_dir() {
        let status =
            HealthStatus::not_ready(service_name, version, "artifact path is not a directory");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(
        service_name,
        version,
        service.images().len(),
        service.catalog().len(),
    );
    (StatusCode::OK, Json(status)).into_response()
}
