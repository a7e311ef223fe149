//! Service configuration loaded from the environment.
//!
//! # Environment Variables
//!
//! - `MAPS_API_KEY`: static-map provider key
//! - `GEOAPIFY_API_KEY`: places provider key
//! - `OPENAI_API_KEY`: generative provider key
//! - `OPENAI_MODEL`: chat model (default: `gpt-3.5-turbo`)
//! - `STATIC_MAP_URL`, `GEOAPIFY_PLACES_URL`, `OPENAI_BASE_URL`: endpoint overrides
//! - `IMPACTSIM_ARTIFACT_DIR`: directory for persisted images (default: `./artifacts`)
//! - `IMPACTSIM_MASK_PATH`: edit mask asset; a central-disc mask is generated when unset
//! - `IMPACTSIM_SETTLE_DELAY_MS`: wait between persisting and re-reading a source image
//!   (default: 5000)
//! - `UPSTREAM_TIMEOUT_SECS`: per-request timeout for provider calls (default: 30)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_STATIC_MAP_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";
pub const DEFAULT_PLACES_URL: &str = "https://api.geoapify.com/v2/places";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_ARTIFACT_DIR: &str = "./artifacts";
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials and endpoint for one upstream provider.
#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
        }
    }

    /// The API key, or an empty string when none is configured.
    pub fn key(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything the orchestration service needs beyond its collaborators.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub static_map: ProviderConfig,
    pub places: ProviderConfig,
    pub openai: ProviderConfig,
    pub chat_model: String,
    pub artifact_dir: PathBuf,
    pub mask_path: Option<PathBuf>,
    /// Pause between persisting a source image and reading it back for
    /// editing, so the read observes the completed write on storage that
    /// acknowledges writes before they are visible.
    pub settle_delay: Duration,
    pub upstream_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            static_map: ProviderConfig::new(DEFAULT_STATIC_MAP_URL, None),
            places: ProviderConfig::new(DEFAULT_PLACES_URL, None),
            openai: ProviderConfig::new(DEFAULT_OPENAI_BASE_URL, None),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            mask_path: None,
            settle_delay: DEFAULT_SETTLE_DELAY,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// Missing API keys are logged but not fatal: the affected endpoints
    /// fail with an upstream error when called.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let static_map = ProviderConfig::new(
            env::var("STATIC_MAP_URL").unwrap_or(defaults.static_map.base_url),
            non_empty_var("MAPS_API_KEY"),
        );
        let places = ProviderConfig::new(
            env::var("GEOAPIFY_PLACES_URL").unwrap_or(defaults.places.base_url),
            non_empty_var("GEOAPIFY_API_KEY"),
        );
        let openai = ProviderConfig::new(
            env::var("OPENAI_BASE_URL").unwrap_or(defaults.openai.base_url),
            non_empty_var("OPENAI_API_KEY"),
        );

        for (name, provider) in [
            ("MAPS_API_KEY", &static_map),
            ("GEOAPIFY_API_KEY", &places),
            ("OPENAI_API_KEY", &openai),
        ] {
            if provider.api_key.is_none() {
                warn!(variable = name, "API key not set; dependent endpoints will fail");
            }
        }

        let settle_delay = env::var("IMPACTSIM_SETTLE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.settle_delay);

        let upstream_timeout = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.upstream_timeout);

        Self {
            static_map,
            places,
            openai,
            chat_model: env::var("OPENAI_MODEL").unwrap_or(defaults.chat_model),
            artifact_dir: env::var_os("IMPACTSIM_ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_dir),
            mask_path: env::var_os("IMPACTSIM_MASK_PATH").map(PathBuf::from),
            settle_delay,
            upstream_timeout,
        }
    }

    /// Set the artifact directory.
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    /// Set the settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_providers() {
        let config = ServiceConfig::default();
        assert_eq!(config.static_map.base_url, DEFAULT_STATIC_MAP_URL);
        assert_eq!(config.chat_model, "gpt-3.5-turbo");
        assert_eq!(config.settle_delay, Duration::from_secs(5));
        assert!(config.mask_path.is_none());
    }

    #[test]
    fn builders_override_fields() {
        let config = ServiceConfig::default()
            .with_artifact_dir("/tmp/impacts")
            .with_settle_delay(Duration::ZERO);
        assert_eq!(config.artifact_dir, PathBuf::from("/tmp/impacts"));
        assert_eq!(config.settle_delay, Duration::ZERO);
    }

    #[test]
    fn debug_redacts_api_keys() {
        let provider = ProviderConfig::new("https://example.test", Some("secret".to_string()));
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("redacted"));
        assert_eq!(provider.key(), "secret");
    }
}
