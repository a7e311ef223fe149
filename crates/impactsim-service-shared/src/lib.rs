//! Shared HTTP infrastructure for the impact simulator service.
//!
//! - [`AppState`]: The orchestration service shared across handlers
//! - [`health`]: Liveness and readiness probe handlers
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`ServiceResponse`] and [`BinaryResponse`]: Wrappers for successful responses
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Request ID and metrics middleware
//! - [`cors_layer`]: Cross-origin policy exposing the image metadata headers
//! - Query types with validation for each endpoint
//!
//! # Architecture
//!
//! Handlers are thin; all domain logic resides in `impactsim-lib`. This crate
//! provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse query parameters                                   │
//! │  - Validate parameters                                      │
//! │  - Call impactsim-lib APIs                                  │
//! │  - Format response or problem details                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module builds state over provider fakes. Enable the
//! `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod cors;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cors::cors_layer;
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_explosion_radius, record_image_cached,
    record_image_edit, record_upstream_failure, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_FILE_NOT_FOUND, PROBLEM_IMAGE_NOT_FOUND,
    PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST, PROBLEM_UPSTREAM_FAILURE,
};
pub use request::{
    ExplosionQuery, ImpactImageQuery, MapImageQuery, ModifiedImageQuery, PredictionQuery,
    Validate, ZoneQuery,
};
pub use response::{
    content_type_for, BinaryResponse, ServiceResponse, EXPLOSION_RADIUS_HEADER, IMAGE_ID_HEADER,
    ZOOM_LEVEL_HEADER,
};
pub use state::{AppState, AppStateError};
