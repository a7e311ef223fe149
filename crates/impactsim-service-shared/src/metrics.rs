//! Prometheus metrics for the impact simulator service.
//!
//! The recorder is installed once per process by [`init_metrics`] and rendered
//! by [`metrics_handler`]. HTTP-level metrics are recorded by
//! [`crate::middleware::MetricsLayer`]; the helpers at the bottom of this
//! module record business events.
//!
//! # Example
//!
//! ```no_run
//! use impactsim_service_shared::metrics::{MetricsConfig, init_metrics, metrics_handler};
//! use axum::{Router, routing::get};
//!
//! let config = MetricsConfig::default();
//! init_metrics(&config).expect("failed to initialize metrics");
//!
//! let app: Router = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Path for the metrics endpoint.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "true" or "false" (default: true)
    /// - `METRICS_PATH`: Path for metrics endpoint (default: "/metrics")
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let path = std::env::var("METRICS_PATH").unwrap_or_else(|_| "/metrics".to_string());

        Self::default().with_enabled(enabled).with_path(path)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the endpoint path. A missing leading `/` is added, and an empty
    /// path falls back to `/metrics`.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim();
        self.path = match trimmed {
            "" | "/" => "/metrics".to_string(),
            p if p.starts_with('/') => p.to_string(),
            p => format!("/{}", p),
        };
        self
    }
}

/// Install the Prometheus recorder.
///
/// # Errors
///
/// Fails when metrics are disabled, when a recorder is already installed, or
/// when the exporter cannot be built.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Axum handler for the `/metrics` endpoint.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Record a map image stored in the image cache.
///
/// Increments `impactsim_images_cached_total`, labelled by the route that
/// fetched it (e.g. "image", "impact-image").
pub fn record_image_cached(source: &str) {
    metrics::counter!(
        "impactsim_images_cached_total",
        "source" => source.to_string()
    )
    .increment(1);
}

/// Record a failed call to an upstream provider.
///
/// Increments `impactsim_upstream_failures_total`.
///
/// # Arguments
///
/// * `service` - The provider that failed (e.g. "static-map", "places", "generative")
pub fn record_upstream_failure(service: &str) {
    metrics::counter!(
        "impactsim_upstream_failures_total",
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record a completed image edit.
pub fn record_image_edit(years: u32) {
    metrics::counter!(
        "impactsim_image_edits_total",
        "years" => years.to_string()
    )
    .increment(1);
}

/// Record a computed blast radius in the `impactsim_explosion_radius` histogram.
pub fn record_explosion_radius(radius: f64) {
    metrics::histogram!("impactsim_explosion_radius").record(radius);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_metrics_config_path_is_rooted() {
        let config = MetricsConfig::default().with_path("internal/metrics");
        assert_eq!(config.path, "/internal/metrics");
        assert_eq!(MetricsConfig::default().with_path("/prom").path, "/prom");
        assert_eq!(MetricsConfig::default().with_path("  ").path, "/metrics");
    }

    #[tokio::test]
    async fn test_metrics_handler_without_recorder_is_a_comment() {
        let output = metrics_handler().await;
        assert!(output.starts_with('#'));
    }

    #[test]
    fn test_business_metrics_record_without_recorder() {
        record_image_cached("image");
        record_image_cached("impact-image");
        record_upstream_failure("static-map");
        record_upstream_failure("generative");
        record_image_edit(0);
        record_image_edit(1);
        record_explosion_radius(4.5);
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert_eq!(
            MetricsError::AlreadyInitialized.to_string(),
            "metrics recorder already initialized"
        );
        let failed = MetricsError::InstallFailed("bind error".to_string());
        assert!(failed.to_string().contains("bind error"));
    }
}
