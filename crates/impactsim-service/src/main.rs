//! Asteroid impact simulator HTTP service.
//!
//! See the library crate for the list of endpoints.
//!
//! # Configuration
//!
//! - `MAPS_API_KEY`, `GEOAPIFY_API_KEY`, `OPENAI_API_KEY` - Provider credentials
//! - `OPENAI_MODEL` - Chat model used for narratives (default: gpt-3.5-turbo)
//! - `STATIC_MAP_URL`, `GEOAPIFY_PLACES_URL`, `OPENAI_BASE_URL` - Provider base URLs
//! - `IMPACTSIM_ARTIFACT_DIR` - Directory for persisted images (default: ./artifacts)
//! - `IMPACTSIM_MASK_PATH` - PNG mask for image edits (default: synthesized)
//! - `IMPACTSIM_SETTLE_DELAY_MS` - Wait between persisting and re-reading an image (default: 5000)
//! - `UPSTREAM_TIMEOUT_SECS` - Provider request timeout (default: 30)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `METRICS_ENABLED`, `METRICS_PATH` - Prometheus endpoint (default: enabled at /metrics)
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use std::env;
use std::net::SocketAddr;

use tracing::{error, info};

use impactsim_lib::ServiceConfig;
use impactsim_service::router;
use impactsim_service_shared::{
    init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("impactsim");
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        // Metrics are optional
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let config = ServiceConfig::from_env();
    info!(port = port, "starting impact simulator service");

    let state = AppState::from_config(config).map_err(|e| {
        error!(error = %e, "failed to build application state");
        e
    })?;

    let app = router(state, &metrics_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
