//! Application state for the HTTP service.
//!
//! Handlers reach the [`ImpactService`] through axum's `State` extractor. The
//! state is generic over the three upstream providers so tests can swap in
//! fakes; the defaults are the real clients.

use std::sync::Arc;

use impactsim_lib::upstream::{GeoapifyPlacesClient, GoogleStaticMapClient, OpenAiClient};
use impactsim_lib::{Error as LibError, ImpactService, ServiceConfig};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// An upstream client could not be constructed.
    ProviderSetup(LibError),

    /// The artifact directory exists but is not a directory.
    ArtifactDirInvalid(String),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProviderSetup(e) => write!(f, "failed to set up providers: {}", e),
            Self::ArtifactDirInvalid(path) => {
                write!(f, "artifact path is not a directory: {}", path)
            }
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ProviderSetup(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::ProviderSetup(err)
    }
}

/// Shared application state for all axum handlers.
///
/// Cloning is cheap; every clone points at the same service, so the image
/// cache and asteroid catalog are shared across requests.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use impactsim_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) -> String {
///     state.service().images().len().to_string()
/// }
///
/// let state = AppState::from_config(ServiceConfig::from_env())?;
/// let app = Router::new()
///     .route("/cached", get(handler))
///     .with_state(state);
/// ```
pub struct AppState<M = GoogleStaticMapClient, P = GeoapifyPlacesClient, G = OpenAiClient> {
    inner: Arc<ImpactService<M, P, G>>,
}

impl AppState {
    /// Build state backed by the real providers.
    pub fn from_config(config: ServiceConfig) -> Result<Self, AppStateError> {
        let artifact_dir = &config.artifact_dir;
        if artifact_dir.exists() && !artifact_dir.is_dir() {
            return Err(AppStateError::ArtifactDirInvalid(
                artifact_dir.display().to_string(),
            ));
        }

        tracing::info!(
            artifact_dir = %artifact_dir.display(),
            chat_model = %config.chat_model,
            settle_delay_ms = config.settle_delay.as_millis() as u64,
            "configuring impact service"
        );

        let service = ImpactService::from_config(config)?;
        Ok(Self::from_service(service))
    }
}

impl<M, P, G> AppState<M, P, G> {
    /// Wrap an already constructed service.
    pub fn from_service(service: ImpactService<M, P, G>) -> Self {
        Self {
            inner: Arc::new(service),
        }
    }

    pub fn service(&self) -> &ImpactService<M, P, G> {
        &self.inner
    }
}

impl<M, P, G> Clone for AppState<M, P, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M, P, G> std::fmt::Debug for AppState<M, P, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impactsim_lib::test_utils::fake_service;

    #[test]
    fn test_app_state_clone_shares_service() {
        let dir = tempfile::tempdir().unwrap();
        let state1 = AppState::from_service(fake_service(dir.path()));
        let state2 = state1.clone();

        state1.service().images().put(vec![1, 2, 3]);
        assert_eq!(state2.service().images().len(), 1);
    }

    #[test]
    fn test_app_state_debug() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::from_service(fake_service(dir.path()));
        let debug = format!("{:?}", state);

        assert!(debug.contains("AppState"));
        assert!(debug.contains("cached_images"));
    }

    #[test]
    fn test_from_config_rejects_file_as_artifact_dir() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = ServiceConfig::default().with_artifact_dir(file.path());

        match AppState::from_config(config).unwrap_err() {
            AppStateError::ArtifactDirInvalid(path) => {
                assert!(path.contains(&*file.path().to_string_lossy()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_config_builds_live_state() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::default().with_artifact_dir(dir.path().join("artifacts"));

        let state = AppState::from_config(config).unwrap();
        assert!(state.service().images().is_empty());
        assert_eq!(state.service().config().chat_model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_app_state_error_display() {
        let err = AppStateError::ArtifactDirInvalid("/tmp/file".to_string());
        assert!(err.to_string().contains("/tmp/file"));
    }
}
