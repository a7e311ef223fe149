//! Impact physics and map-framing helpers.
//!
//! Everything here is a pure function of its inputs. The asteroid mass is a
//! deterministic proxy derived from the diameter alone (surface area times a
//! fixed density factor), not a calibrated volume/density model.

use serde::{Deserialize, Serialize};

/// Centimetres per kilometre.
pub const CM_PER_KM: f64 = 100_000.0;

/// Density factor applied to the surface area when deriving the mass proxy.
pub const MASS_DENSITY_FACTOR: f64 = 5.0 / 1_000.0;

/// Divisor applied to the mass proxy after the density factor.
pub const MASS_SCALE_DIVISOR: f64 = 50.0;

/// Joules per unit of TNT equivalent used by the blast model.
pub const TNT_EQUIVALENT_JOULES: f64 = 4.18e6;

/// Empirical scaling between cube-root yield and blast radius.
pub const BLAST_SCALING: f64 = 4.5;

/// Most detailed zoom level returned by [`zoom_level_for`].
pub const MAX_ZOOM: u8 = 19;

/// Coarsest zoom level returned by [`zoom_level_for`].
pub const MIN_ZOOM: u8 = 3;

/// Upper bounds (exclusive, in metres) paired with the zoom level they select.
const ZOOM_THRESHOLDS: [(f64, u8); 14] = [
    (125.0, 19),
    (250.0, 18),
    (500.0, 17),
    (1_000.0, 16),
    (2_000.0, 15),
    (4_000.0, 14),
    (8_000.0, 13),
    (16_000.0, 12),
    (32_000.0, 11),
    (64_000.0, 9),
    (128_000.0, 8),
    (256_000.0, 7),
    (512_000.0, 6),
    (1_024_000.0, 5),
];

/// Mass proxy and diameter for an asteroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsteroidProfile {
    /// Derived mass proxy.
    pub mass: f64,
    /// Diameter in kilometres.
    pub diameter: f64,
}

/// Derive the physical profile for an asteroid of `diameter_km`.
///
/// # Examples
/// ```
/// use impactsim_lib::physics::asteroid_profile;
///
/// let profile = asteroid_profile(1.0);
/// assert_eq!(profile.diameter, 1.0);
/// assert!((profile.mass - 3.141_592_653_589_793e6).abs() < 1e-3);
/// ```
pub fn asteroid_profile(diameter_km: f64) -> AsteroidProfile {
    let radius_cm = diameter_km * CM_PER_KM / 2.0;
    let area = 4.0 * std::f64::consts::PI * radius_cm * radius_cm;
    let mass = area * MASS_DENSITY_FACTOR / MASS_SCALE_DIVISOR;

    AsteroidProfile {
        mass,
        diameter: diameter_km,
    }
}

/// Blast radius for an impactor of `mass` travelling at `velocity`.
///
/// Kinetic energy is converted to a TNT equivalent and the radius scales with
/// its cube root. Inputs are used in whatever units the caller supplies.
/// Zero, negative, or non-finite energy yields a radius of `0.0`.
pub fn explosion_radius(velocity: f64, mass: f64) -> f64 {
    let energy = 0.5 * mass * velocity * velocity;
    if !energy.is_finite() || energy <= 0.0 {
        return 0.0;
    }

    let tnt_equivalent = energy / TNT_EQUIVALENT_JOULES;
    tnt_equivalent.cbrt() * BLAST_SCALING
}

/// Diameter of the destruction zone for a blast of `radius`.
pub fn destruction_diameter(radius: f64) -> f64 {
    2.0 * radius
}

/// Static-map zoom level that frames an area `diameter_m` metres across.
///
/// Each threshold is an exclusive upper bound, so a diameter exactly equal to
/// a threshold falls into the next, coarser bucket. Zoom 10 is never
/// produced. NaN and values of at least 1 024 000 m map to [`MIN_ZOOM`].
pub fn zoom_level_for(diameter_m: f64) -> u8 {
    ZOOM_THRESHOLDS
        .iter()
        .find(|(limit, _)| diameter_m < *limit)
        .map(|&(_, zoom)| zoom)
        .unwrap_or(MIN_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_matches_surface_area_formula() {
        let profile = asteroid_profile(539.5602891983);
        let r = 539.5602891983 * 100_000.0 / 2.0;
        let expected = (r * r * std::f64::consts::PI * 4.0) * 5.0 / 1_000.0 / 50.0;
        assert!((profile.mass - expected).abs() / expected < 1e-12);
        assert_eq!(profile.diameter, 539.5602891983);
    }

    #[test]
    fn zero_velocity_has_no_radius() {
        assert_eq!(explosion_radius(0.0, 1.0e20), 0.0);
        assert_eq!(explosion_radius(0.0, 0.0), 0.0);
    }

    #[test]
    fn non_positive_mass_has_no_radius() {
        assert_eq!(explosion_radius(20.0, 0.0), 0.0);
        assert_eq!(explosion_radius(20.0, -5.0), 0.0);
        assert_eq!(explosion_radius(f64::NAN, 5.0), 0.0);
    }

    #[test]
    fn radius_follows_cube_root_of_tnt_equivalent() {
        // E = 0.5 * 8.36e6 * 1 = 4.18e6 J, one TNT unit.
        let radius = explosion_radius(1.0, 8.36e6);
        assert!((radius - 4.5).abs() < 1e-9);

        // Eight times the energy doubles the radius.
        let doubled = explosion_radius(1.0, 8.0 * 8.36e6);
        assert!((doubled - 9.0).abs() < 1e-9);
    }

    #[test]
    fn radius_is_monotonic_in_velocity_and_mass() {
        let mut previous = 0.0;
        for v in [0.5, 1.0, 5.0, 12.0, 30.0, 72.0] {
            let r = explosion_radius(v, 1.0e12);
            assert!(r > previous, "radius should grow with velocity");
            previous = r;
        }

        let mut previous = 0.0;
        for m in [1.0, 1.0e3, 1.0e9, 1.0e15, 1.0e21] {
            let r = explosion_radius(17.0, m);
            assert!(r > previous, "radius should grow with mass");
            previous = r;
        }
    }

    #[test]
    fn zoom_boundaries_are_exclusive() {
        assert_eq!(zoom_level_for(124.0), 19);
        assert_eq!(zoom_level_for(125.0), 18);
        assert_eq!(zoom_level_for(499.9), 17);
        assert_eq!(zoom_level_for(500.0), 16);
        assert_eq!(zoom_level_for(31_999.0), 11);
        assert_eq!(zoom_level_for(32_000.0), 9);
        assert_eq!(zoom_level_for(1_023_999.0), 5);
        assert_eq!(zoom_level_for(1_024_000.0), 3);
        assert_eq!(zoom_level_for(1_024_001.0), 3);
    }

    #[test]
    fn zoom_never_selects_level_ten() {
        let mut d = 1.0;
        while d < 5.0e6 {
            assert_ne!(zoom_level_for(d), 10);
            d *= 1.07;
        }
    }

    #[test]
    fn zoom_is_non_increasing_and_bounded() {
        let mut previous = MAX_ZOOM;
        let mut d = 0.0;
        while d < 3.0e6 {
            let zoom = zoom_level_for(d);
            assert!(zoom <= previous);
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom));
            previous = zoom;
            d += 997.0;
        }
    }

    #[test]
    fn zoom_handles_degenerate_inputs() {
        assert_eq!(zoom_level_for(-10.0), 19);
        assert_eq!(zoom_level_for(f64::NAN), 3);
        assert_eq!(zoom_level_for(f64::INFINITY), 3);
    }

    #[test]
    fn destruction_diameter_doubles_radius() {
        assert_eq!(destruction_diameter(250.0), 500.0);
    }
}
