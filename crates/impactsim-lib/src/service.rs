//! Orchestration of the impact pipeline.
//!
//! [`ImpactService`] owns the per-process state (asteroid catalog, image
//! cache, artifact store) and composes it with the upstream providers. Each
//! operation is independent: a failure in one never mutates state another
//! relies on, and the only shared mutable state is the concurrent cache.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::artifacts::ArtifactStore;
use crate::cache::{ImageCache, ImageId};
use crate::catalog::{AsteroidCatalog, AsteroidId, KnownAsteroid};
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::imaging::prepare_edit_inputs;
use crate::physics::{destruction_diameter, explosion_radius, zoom_level_for, AsteroidProfile};
use crate::prompts::{edit_prompt_for_years, narrative_request, EDIT_IMAGE_SIZE};
use crate::upstream::{
    sum_population, GenerativeProvider, GeoapifyPlacesClient, GoogleStaticMapClient,
    ImageEditRequest, MapRequest, OpenAiClient, PlacesProvider, StaticMapProvider,
};

/// Service wired to the real providers.
pub type LiveImpactService =
    ImpactService<GoogleStaticMapClient, GeoapifyPlacesClient, OpenAiClient>;

/// A fetched and cached map image.
#[derive(Debug, Clone, PartialEq)]
pub struct MapImage {
    pub id: ImageId,
    pub zoom: u8,
    pub bytes: Vec<u8>,
}

/// A map image framed on the destruction zone of an impact.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactImage {
    pub explosion_radius: f64,
    pub image: MapImage,
}

/// Result of an image edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditedImage {
    pub id: ImageId,
    /// Reference to the edited image returned by the provider.
    pub url: String,
    /// File name of the persisted source image in the artifact store.
    pub source: String,
}

pub struct ImpactService<M, P, G> {
    catalog: AsteroidCatalog,
    images: ImageCache,
    artifacts: ArtifactStore,
    maps: M,
    places: P,
    generative: G,
    config: ServiceConfig,
}

impl LiveImpactService {
    /// Build a service backed by the real providers described by `config`.
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let maps = GoogleStaticMapClient::new(&config)?;
        let places = GeoapifyPlacesClient::new(&config)?;
        let generative = OpenAiClient::new(&config)?;
        Ok(Self::new(
            AsteroidCatalog::new(),
            maps,
            places,
            generative,
            config,
        ))
    }
}

// No provider bounds: generic state plumbing such as readiness probes reads these.
impl<M, P, G> ImpactService<M, P, G> {
    pub fn catalog(&self) -> &AsteroidCatalog {
        &self.catalog
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn maps(&self) -> &M {
        &self.maps
    }

    pub fn places(&self) -> &P {
        &self.places
    }

    pub fn generative(&self) -> &G {
        &self.generative
    }
}

impl<M, P, G> ImpactService<M, P, G>
where
    M: StaticMapProvider,
    P: PlacesProvider,
    G: GenerativeProvider,
{
    pub fn new(
        catalog: AsteroidCatalog,
        maps: M,
        places: P,
        generative: G,
        config: ServiceConfig,
    ) -> Self {
        Self {
            catalog,
            images: ImageCache::new(),
            artifacts: ArtifactStore::new(config.artifact_dir.clone()),
            maps,
            places,
            generative,
            config,
        }
    }

    /// Diameter in kilometres of asteroid `id`.
    pub fn asteroid_diameter(&self, id: AsteroidId) -> f64 {
        self.catalog.diameter_for(id)
    }

    /// Mass proxy and diameter of asteroid `id`.
    pub fn asteroid_profile(&self, id: AsteroidId) -> AsteroidProfile {
        self.catalog.profile_for(id)
    }

    pub fn known_asteroids(&self) -> &'static [KnownAsteroid] {
        self.catalog.known()
    }

    pub fn explosion_radius(&self, velocity: f64, mass: f64) -> f64 {
        let radius = explosion_radius(velocity, mass);
        debug!(velocity, mass, radius, "computed explosion radius");
        radius
    }

    /// Fetch a satellite image framing an area `diameter` metres across and
    /// cache it under a new id.
    pub async fn map_image(
        &self,
        latitude: f64,
        longitude: f64,
        diameter: f64,
    ) -> Result<MapImage> {
        let zoom = zoom_level_for(diameter);
        let bytes = self
            .maps
            .fetch_map_image(MapRequest {
                latitude,
                longitude,
                zoom,
            })
            .await
            .inspect_err(|e| warn!(error = %e, latitude, longitude, zoom, "map fetch failed"))?;

        let id = self.images.put(bytes.clone());
        info!(image_id = %id, zoom, bytes = bytes.len(), "cached map image");

        Ok(MapImage { id, zoom, bytes })
    }

    /// Fetch a map image framed on the destruction zone of an impactor with
    /// the given `velocity` and `mass`.
    pub async fn impact_image(
        &self,
        latitude: f64,
        longitude: f64,
        velocity: f64,
        mass: f64,
    ) -> Result<ImpactImage> {
        let radius = self.explosion_radius(velocity, mass);
        let image = self
            .map_image(latitude, longitude, destruction_diameter(radius))
            .await?;

        Ok(ImpactImage {
            explosion_radius: radius,
            image,
        })
    }

    /// Total population of the populated places within `radius_m` metres.
    pub async fn zone_population(
        &self,
        longitude: f64,
        latitude: f64,
        radius_m: f64,
    ) -> Result<u64> {
        let places = self
            .places
            .populated_places(longitude, latitude, radius_m)
            .await
            .inspect_err(|e| {
                warn!(error = %e, longitude, latitude, radius_m, "places lookup failed")
            })?;

        let population = sum_population(&places);
        debug!(features = places.features.len(), population, "summed zone population");
        Ok(population)
    }

    /// Narrative of the impact region `years` after the impact.
    pub async fn narrative(
        &self,
        longitude: f64,
        latitude: f64,
        radius_km: f64,
        years: u32,
    ) -> Result<String> {
        let request = narrative_request(
            &self.config.chat_model,
            longitude,
            latitude,
            radius_km,
            years,
        );
        self.generative
            .complete_chat(request)
            .await
            .inspect_err(|e| warn!(error = %e, "narrative generation failed"))
    }

    /// Edit the cached image `id` to show the impact site `years` later.
    ///
    /// Unsupported `years` and unknown ids fail before any file is written or
    /// any provider is called.
    pub async fn edit_image(&self, id: &ImageId, years: u32) -> Result<EditedImage> {
        let prompt = edit_prompt_for_years(years)?;
        let source = self.images.get(id)?;

        let path = self.artifacts.persist(id, &source).await?;

        if !self.config.settle_delay.is_zero() {
            debug!(
                delay_ms = self.config.settle_delay.as_millis() as u64,
                "waiting for persisted image to settle"
            );
            tokio::time::sleep(self.config.settle_delay).await;
        }

        let persisted = tokio::fs::read(&path).await?;
        let inputs = prepare_edit_inputs(persisted, self.config.mask_path.clone()).await?;

        let file_name = ArtifactStore::file_name(id);
        let url = self
            .generative
            .edit_image(ImageEditRequest {
                image: inputs.image.bytes,
                image_name: file_name.clone(),
                mask: inputs.mask.bytes,
                prompt: prompt.to_string(),
                size: EDIT_IMAGE_SIZE.to_string(),
            })
            .await
            .inspect_err(|e| warn!(image_id = %id, error = %e, "image edit failed"))?;

        info!(image_id = %id, years, "image edited");

        Ok(EditedImage {
            id: *id,
            url,
            source: file_name,
        })
    }

    /// Bytes of the persisted artifact `name`.
    pub async fn artifact(&self, name: &str) -> Result<Vec<u8>> {
        self.artifacts.read(name).await
    }
}

impl<M, P, G> std::fmt::Debug for ImpactService<M, P, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImpactService")
            .field("catalog", &self.catalog)
            .field("cached_images", &self.images.len())
            .field("artifact_dir", &self.artifacts.root())
            .finish()
    }
}
