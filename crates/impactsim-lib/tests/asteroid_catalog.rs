use std::sync::Arc;
use std::thread;

use impactsim_lib::catalog::RANDOM_DIAMETER_KM;
use impactsim_lib::{AsteroidCatalog, KNOWN_ASTEROIDS};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn every_known_asteroid_resolves_to_its_recorded_diameter() {
    let catalog = AsteroidCatalog::with_rng(StdRng::seed_from_u64(7));

    for asteroid in KNOWN_ASTEROIDS.iter() {
        assert_eq!(catalog.diameter_for(asteroid.id), asteroid.diameter);
        assert_eq!(catalog.name_of(asteroid.id), Some(asteroid.name));
    }
    assert_eq!(catalog.len(), KNOWN_ASTEROIDS.len());
}

#[test]
fn same_seed_draws_same_unseen_diameters() {
    let a = AsteroidCatalog::with_rng(StdRng::seed_from_u64(42));
    let b = AsteroidCatalog::with_rng(StdRng::seed_from_u64(42));

    for id in [1, 2, 3, 99_999_999] {
        let diameter = a.diameter_for(id);
        assert!(RANDOM_DIAMETER_KM.contains(&diameter));
        assert_eq!(diameter, b.diameter_for(id));
    }
}

#[test]
fn concurrent_first_lookups_agree() {
    let catalog = Arc::new(AsteroidCatalog::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || catalog.diameter_for(123_456))
        })
        .collect();

    let diameters: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(diameters.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(catalog.len(), KNOWN_ASTEROIDS.len() + 1);
}
