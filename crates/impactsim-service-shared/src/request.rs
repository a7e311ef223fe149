//! Query parameter types and validation for HTTP endpoints.
//!
//! Each route deserializes its query string into one of these types and calls
//! [`Validate::validate`] before touching the library, so malformed numbers
//! are rejected with a 400 instead of reaching a provider.

use serde::{Deserialize, Serialize};

use crate::ProblemDetails;

/// Validation trait for request types.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// `GET /asteroids/image`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapImageQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Width in metres of the area the image should frame.
    pub diameter: f64,
}

impl Validate for MapImageQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_latitude(self.latitude, request_id)?;
        check_longitude(self.longitude, request_id)?;
        check_non_negative("diameter", self.diameter, request_id)
    }
}

/// `GET /asteroids/impact-image`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactImageQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub velocity: f64,
    pub mass: f64,
}

impl Validate for ImpactImageQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_latitude(self.latitude, request_id)?;
        check_longitude(self.longitude, request_id)?;
        check_finite("velocity", self.velocity, request_id)?;
        check_finite("mass", self.mass, request_id)
    }
}

/// `GET /asteroids/explosion`
///
/// Zero or negative values are accepted and yield a radius of 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionQuery {
    pub velocity: f64,
    pub mass: f64,
}

impl Validate for ExplosionQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_finite("velocity", self.velocity, request_id)?;
        check_finite("mass", self.mass, request_id)
    }
}

/// `GET /asteroids/zone`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneQuery {
    pub longitude: f64,
    pub latitude: f64,
    /// Radius in metres.
    pub radius: f64,
}

impl Validate for ZoneQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_longitude(self.longitude, request_id)?;
        check_latitude(self.latitude, request_id)?;
        check_non_negative("radius", self.radius, request_id)
    }
}

/// `GET /asteroids/prediction`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionQuery {
    pub longitude: f64,
    pub latitude: f64,
    /// Explosion radius in kilometres.
    pub radius: f64,
    #[serde(default)]
    pub years: u32,
}

impl Validate for PredictionQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        check_longitude(self.longitude, request_id)?;
        check_latitude(self.latitude, request_id)?;
        check_non_negative("radius", self.radius, request_id)
    }
}

/// `GET /asteroids/modified-image`
///
/// Supported `years` values are enforced by the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifiedImageQuery {
    pub id: String,
    #[serde(default)]
    pub years: u32,
}

impl Validate for ModifiedImageQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.id.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'id' parameter is required and cannot be empty",
                request_id,
            )));
        }
        Ok(())
    }
}

fn check_finite(field: &str, value: f64, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    if !value.is_finite() {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("The '{}' parameter must be a finite number", field),
            request_id,
        )));
    }
    Ok(())
}

fn check_non_negative(
    field: &str,
    value: f64,
    request_id: &str,
) -> Result<(), Box<ProblemDetails>> {
    check_finite(field, value, request_id)?;
    if value < 0.0 {
        return Err(Box::new(ProblemDetails::bad_request(
            format!("The '{}' parameter cannot be negative", field),
            request_id,
        )));
    }
    Ok(())
}

fn check_latitude(value: f64, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    check_finite("latitude", value, request_id)?;
    if !(-90.0..=90.0).contains(&value) {
        return Err(Box::new(ProblemDetails::bad_request(
            "The 'latitude' parameter must be between -90 and 90",
            request_id,
        )));
    }
    Ok(())
}

fn check_longitude(value: f64, request_id: &str) -> Result<(), Box<ProblemDetails>> {
    check_finite("longitude", value, request_id)?;
    if !(-180.0..=180.0).contains(&value) {
        return Err(Box::new(ProblemDetails::bad_request(
            "The 'longitude' parameter must be between -180 and 180",
            request_id,
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_image_query_valid() {
        let query = MapImageQuery {
            latitude: 40.4,
            longitude: -3.7,
            diameter: 500.0,
        };
        assert!(query.validate("test").is_ok());
    }

    #[test]
    fn test_map_image_query_latitude_out_of_range() {
        let query = MapImageQuery {
            latitude: 91.0,
            longitude: 0.0,
            diameter: 500.0,
        };
        let problem = query.validate("req-lat").unwrap_err();
        assert_eq!(problem.status, 400);
        assert!(problem.detail.as_deref().unwrap().contains("latitude"));
        assert_eq!(problem.instance.as_deref(), Some("req-lat"));
    }

    #[test]
    fn test_map_image_query_negative_diameter() {
        let query = MapImageQuery {
            latitude: 0.0,
            longitude: 0.0,
            diameter: -1.0,
        };
        let problem = query.validate("test").unwrap_err();
        assert!(problem.detail.as_deref().unwrap().contains("diameter"));
    }

    #[test]
    fn test_explosion_query_accepts_degenerate_values() {
        let query = ExplosionQuery {
            velocity: -5.0,
            mass: 0.0,
        };
        assert!(query.validate("test").is_ok());
    }

    #[test]
    fn test_explosion_query_rejects_nan() {
        let query = ExplosionQuery {
            velocity: f64::NAN,
            mass: 1.0,
        };
        let problem = query.validate("test").unwrap_err();
        assert!(problem.detail.as_deref().unwrap().contains("velocity"));
    }

    #[test]
    fn test_impact_image_query_rejects_infinite_mass() {
        let query = ImpactImageQuery {
            latitude: 10.0,
            longitude: 20.0,
            velocity: 17.0,
            mass: f64::INFINITY,
        };
        assert!(query.validate("test").is_err());
    }

    #[test]
    fn test_zone_query_longitude_out_of_range() {
        let query = ZoneQuery {
            longitude: 181.0,
            latitude: 0.0,
            radius: 1000.0,
        };
        let problem = query.validate("test").unwrap_err();
        assert!(problem.detail.as_deref().unwrap().contains("longitude"));
    }

    #[test]
    fn test_prediction_query_years_default_to_zero() {
        let query: PredictionQuery =
            serde_json::from_str(r#"{"longitude":1.0,"latitude":2.0,"radius":3.0}"#).unwrap();
        assert_eq!(query.years, 0);
        assert!(query.validate("test").is_ok());
    }

    #[test]
    fn test_modified_image_query_empty_id() {
        let query = ModifiedImageQuery {
            id: "  ".to_string(),
            years: 0,
        };
        assert!(query.validate("test").is_err());
    }
}
