//! Asteroid impact simulator HTTP service.
//!
//! The router is built here, separate from the binary, so tests can drive it
//! over provider fakes.
//!
//! # Endpoints
//!
//! - `GET /asteroids/info/{id}` - Mass proxy, diameter and name of an asteroid
//! - `GET /asteroids/diameter/{id}` - Diameter of an asteroid in kilometres
//! - `GET /asteroids/catalog` - Asteroids with recorded diameters
//! - `GET /asteroids/explosion` - Blast radius for a velocity and mass
//! - `GET /asteroids/image` - Satellite image framing an area
//! - `GET /asteroids/impact-image` - Satellite image framing a blast zone
//! - `GET /asteroids/zone` - Population inside a radius
//! - `GET /asteroids/prediction` - Narrative of the aftermath
//! - `GET /asteroids/modified-image` - Edit a cached image to show the impact
//! - `GET /asteroids/files/{name}` - Persisted artifacts
//! - `GET /metrics` - Prometheus metrics endpoint (path set by `METRICS_PATH`)
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe

#![deny(warnings)]

mod handlers;

use axum::{routing::get, Router};

use impactsim_lib::{GenerativeProvider, PlacesProvider, StaticMapProvider};
use impactsim_service_shared::{
    cors_layer, health_live, health_ready, metrics_handler, AppState, MetricsConfig,
    MetricsLayer,
};

/// Build the service router over `state`.
///
/// The Prometheus endpoint is mounted at `metrics.path`, and left out
/// entirely when metrics are disabled.
pub fn router<M, P, G>(state: AppState<M, P, G>, metrics: &MetricsConfig) -> Router
where
    M: StaticMapProvider + 'static,
    P: PlacesProvider + 'static,
    G: GenerativeProvider + 'static,
{
    let mut app = Router::new()
        .route("/asteroids/info/{id}", get(handlers::asteroid_info::<M, P, G>))
        .route(
            "/asteroids/diameter/{id}",
            get(handlers::asteroid_diameter::<M, P, G>),
        )
        .route("/asteroids/catalog", get(handlers::asteroid_catalog::<M, P, G>))
        .route("/asteroids/explosion", get(handlers::explosion::<M, P, G>))
        .route("/asteroids/image", get(handlers::map_image::<M, P, G>))
        .route(
            "/asteroids/impact-image",
            get(handlers::impact_image::<M, P, G>),
        )
        .route("/asteroids/zone", get(handlers::zone::<M, P, G>))
        .route("/asteroids/prediction", get(handlers::prediction::<M, P, G>))
        .route(
            "/asteroids/modified-image",
            get(handlers::modified_image::<M, P, G>),
        )
        .route("/asteroids/files/{name}", get(handlers::artifact::<M, P, G>))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready::<M, P, G>));

    if metrics.enabled {
        app = app.route(&metrics.path, get(metrics_handler));
    }

    app.layer(cors_layer()).layer(MetricsLayer).with_state(state)
}
