use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::http::{build_client, read_json, send};
use super::{PlacesProvider, PLACES_SERVICE};
use crate::config::{ProviderConfig, ServiceConfig};
use crate::error::Result;

/// Places category queried for population.
const POPULATED_PLACE_CATEGORY: &str = "populated_place";

/// Maximum number of places returned per query.
const PLACES_LIMIT: u32 = 20;

/// Feature collection returned by the places provider.
///
/// Only the path to the population figure is modelled; everything else in
/// the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub features: Vec<PlaceFeature>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceFeature {
    #[serde(default)]
    pub properties: Option<PlaceProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceProperties {
    #[serde(default)]
    pub datasource: Option<PlaceDatasource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDatasource {
    /// Raw tags from the upstream dataset (OpenStreetMap for most places).
    #[serde(default)]
    pub raw: Option<Value>,
}

impl PlaceFeature {
    /// Population recorded for this place, if present and numeric.
    pub fn population(&self) -> Option<u64> {
        let value = self
            .properties
            .as_ref()?
            .datasource
            .as_ref()?
            .raw
            .as_ref()?
            .get("population")?;

        value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|p| p.is_finite() && *p >= 0.0)
                .map(|p| p.round() as u64)
        })
    }
}

/// Sum the population of every place that reports one.
///
/// Places without a usable population figure contribute nothing.
pub fn sum_population(response: &PlacesResponse) -> u64 {
    response
        .features
        .iter()
        .filter_map(PlaceFeature::population)
        .fold(0u64, u64::saturating_add)
}

/// Geoapify Places API client.
#[derive(Debug, Clone)]
pub struct GeoapifyPlacesClient {
    client: Client,
    config: ProviderConfig,
}

impl GeoapifyPlacesClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.upstream_timeout)?,
            config: config.places.clone(),
        })
    }

    fn query(&self, longitude: f64, latitude: f64, radius_m: f64) -> Vec<(&'static str, String)> {
        vec![
            ("categories", POPULATED_PLACE_CATEGORY.to_string()),
            (
                "filter",
                format!("circle:{},{},{}", longitude, latitude, radius_m),
            ),
            ("bias", format!("proximity:{},{}", longitude, latitude)),
            ("limit", PLACES_LIMIT.to_string()),
            ("apiKey", self.config.key().to_string()),
        ]
    }
}

impl PlacesProvider for GeoapifyPlacesClient {
    async fn populated_places(
        &self,
        longitude: f64,
        latitude: f64,
        radius_m: f64,
    ) -> Result<PlacesResponse> {
        debug!(longitude, latitude, radius_m, "querying populated places");

        let response = send(
            PLACES_SERVICE,
            self.client
                .get(&self.config.base_url)
                .query(&self.query(longitude, latitude, radius_m)),
        )
        .await?;

        read_json(PLACES_SERVICE, response).await
    }
}
