//! Test utilities for handler testing.
//!
//! Builds [`AppState`] over the in-process provider fakes from
//! `impactsim_lib::test_utils`, so router tests never reach the network.

use std::path::Path;

use impactsim_lib::test_utils::{
    fake_service, fake_service_with, FakeGenerative, FakePlaces, FakeStaticMap,
};

use crate::state::AppState;

pub use impactsim_lib::test_utils::sample_png;

/// State type used by handler tests.
pub type FakeAppState = AppState<FakeStaticMap, FakePlaces, FakeGenerative>;

/// State over the default fakes, persisting artifacts into `artifact_dir`.
pub fn test_state(artifact_dir: &Path) -> FakeAppState {
    AppState::from_service(fake_service(artifact_dir))
}

/// State over the given fakes.
pub fn test_state_with(
    artifact_dir: &Path,
    maps: FakeStaticMap,
    places: FakePlaces,
    generative: FakeGenerative,
) -> FakeAppState {
    AppState::from_service(fake_service_with(artifact_dir, maps, places, generative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_starts_with_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        assert!(state.service().images().is_empty());
        assert_eq!(state.service().artifacts().root(), dir.path());
    }
}
