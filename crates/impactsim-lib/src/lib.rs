//! Impact simulator library entry points.
//!
//! This crate turns an asteroid choice and an impact point into the
//! artefacts the simulator shows: mass and blast radius, a satellite image of
//! the impact site, the population inside the blast zone, a narrative of the
//! aftermath, and an edited image of the site. Higher-level consumers (the
//! HTTP service) should only depend on the items exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod artifacts;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod imaging;
pub mod physics;
pub mod prompts;
pub mod service;
pub mod upstream;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use artifacts::ArtifactStore;
pub use cache::{ImageCache, ImageId};
pub use catalog::{AsteroidCatalog, AsteroidId, KnownAsteroid, KNOWN_ASTEROIDS};
pub use config::{ProviderConfig, ServiceConfig};
pub use error::{Error, Result};
pub use physics::{
    asteroid_profile, destruction_diameter, explosion_radius, zoom_level_for, AsteroidProfile,
};
pub use service::{EditedImage, ImpactImage, ImpactService, LiveImpactService, MapImage};
pub use upstream::{GenerativeProvider, PlacesProvider, StaticMapProvider};
