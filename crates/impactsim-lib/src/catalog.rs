//! Asteroid diameter catalog.
//!
//! The catalog is seeded with the diameters of the asteroids the simulator
//! ships with. Unknown ids get a diameter drawn uniformly from
//! [`RANDOM_DIAMETER_KM`], memoized for the lifetime of the catalog so that
//! repeated lookups agree.

use std::ops::Range;
use std::sync::Mutex;

use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::physics::{asteroid_profile, AsteroidProfile};

/// Catalog identifier of an asteroid (JPL small-body SPK-ID).
pub type AsteroidId = u64;

/// Range, in kilometres, used for diameters of unseen asteroids.
pub const RANDOM_DIAMETER_KM: Range<f64> = 600.0..7000.0;

/// An asteroid with a recorded diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KnownAsteroid {
    pub id: AsteroidId,
    pub name: &'static str,
    /// Diameter in kilometres.
    pub diameter: f64,
}

/// Asteroids with fixed diameters.
pub const KNOWN_ASTEROIDS: [KnownAsteroid; 10] = [
    KnownAsteroid {
        id: 2001580,
        name: "Betulia",
        diameter: 7112.7898709308,
    },
    KnownAsteroid {
        id: 2001620,
        name: "Geographos",
        diameter: 5248.5577337793,
    },
    KnownAsteroid {
        id: 2002063,
        name: "Bacchus",
        diameter: 2148.0282007576,
    },
    KnownAsteroid {
        id: 2004179,
        name: "Toutatis",
        diameter: 5200.4386672425,
    },
    KnownAsteroid {
        id: 2004486,
        name: "Mithra",
        diameter: 4487.8670088081,
    },
    KnownAsteroid {
        id: 2004660,
        name: "Nereus",
        diameter: 1056.9147985314,
    },
    KnownAsteroid {
        id: 2004769,
        name: "Castalia",
        diameter: 1968.067450894,
    },
    KnownAsteroid {
        id: 2006489,
        name: "Golevka",
        diameter: 851.2163929215,
    },
    KnownAsteroid {
        id: 2025143,
        name: "Itokawa",
        diameter: 835.6799428155,
    },
    KnownAsteroid {
        id: 2101955,
        name: "Bennu",
        diameter: 539.5602891983,
    },
];

/// Memoizing diameter lookup with an injectable randomness source.
pub struct AsteroidCatalog {
    diameters: DashMap<AsteroidId, f64>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl AsteroidCatalog {
    /// Create a catalog seeded with [`KNOWN_ASTEROIDS`] that draws unseen
    /// diameters from an OS-seeded generator.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create a catalog that draws unseen diameters from `rng`.
    ///
    /// Tests pass a seeded generator to get reproducible diameters.
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        let diameters = KNOWN_ASTEROIDS
            .iter()
            .map(|asteroid| (asteroid.id, asteroid.diameter))
            .collect();

        Self {
            diameters,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Diameter in kilometres for `id`, generating and memoizing one if unseen.
    pub fn diameter_for(&self, id: AsteroidId) -> f64 {
        if let Some(diameter) = self.diameters.get(&id) {
            return *diameter;
        }

        // `entry` holds the shard lock, so two racing requests for the same
        // unseen id still agree on a single diameter.
        *self.diameters.entry(id).or_insert_with(|| {
            let diameter = self.draw_diameter();
            debug!(asteroid_id = id, diameter_km = diameter, "generated diameter");
            diameter
        })
    }

    /// Physical profile for `id`.
    pub fn profile_for(&self, id: AsteroidId) -> AsteroidProfile {
        asteroid_profile(self.diameter_for(id))
    }

    /// Name of `id` if it is one of the seeded asteroids.
    pub fn name_of(&self, id: AsteroidId) -> Option<&'static str> {
        KNOWN_ASTEROIDS
            .iter()
            .find(|asteroid| asteroid.id == id)
            .map(|asteroid| asteroid.name)
    }

    /// The seeded asteroids.
    pub fn known(&self) -> &'static [KnownAsteroid] {
        &KNOWN_ASTEROIDS
    }

    /// Number of ids with a recorded diameter, seeded ones included.
    pub fn len(&self) -> usize {
        self.diameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diameters.is_empty()
    }

    fn draw_diameter(&self) -> f64 {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.random_range(RANDOM_DIAMETER_KM)
    }
}

impl Default for AsteroidCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AsteroidCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsteroidCatalog")
            .field("entries", &self.diameters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> AsteroidCatalog {
        AsteroidCatalog::with_rng(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn known_ids_return_fixed_diameters() {
        let catalog = seeded(1);
        assert_eq!(catalog.diameter_for(2101955), 539.5602891983);
        assert_eq!(catalog.diameter_for(2001580), 7112.7898709308);
        assert_eq!(catalog.name_of(2101955), Some("Bennu"));
    }

    #[test]
    fn unseen_ids_are_in_range_and_stable() {
        let catalog = seeded(7);
        for id in 1..200 {
            let first = catalog.diameter_for(id);
            assert!(RANDOM_DIAMETER_KM.contains(&first), "{first} out of range");
            assert_eq!(catalog.diameter_for(id), first);
        }
        assert_eq!(catalog.len(), KNOWN_ASTEROIDS.len() + 199);
    }

    #[test]
    fn same_seed_gives_same_diameters() {
        let a = seeded(42);
        let b = seeded(42);
        assert_eq!(a.diameter_for(99), b.diameter_for(99));
        assert_eq!(a.diameter_for(100), b.diameter_for(100));
    }

    #[test]
    fn separate_catalogs_are_isolated() {
        let a = seeded(1);
        let b = seeded(2);
        a.diameter_for(55);
        assert_eq!(a.len(), KNOWN_ASTEROIDS.len() + 1);
        assert_eq!(b.len(), KNOWN_ASTEROIDS.len());
    }

    #[test]
    fn profile_uses_catalog_diameter() {
        let catalog = seeded(3);
        let profile = catalog.profile_for(2101955);
        assert_eq!(profile, asteroid_profile(539.5602891983));
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(seeded(0).name_of(1), None);
    }
}
