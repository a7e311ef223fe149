//! In-process provider fakes for testing the orchestration layer without
//! network access.
//!
//! Enable the `test-utils` feature to use these from dependent crates.

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::AsteroidCatalog;
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::service::ImpactService;
use crate::upstream::{
    ChatRequest, GenerativeProvider, ImageEditRequest, MapRequest, PlacesProvider, PlacesResponse,
    StaticMapProvider, GENERATIVE_SERVICE, PLACES_SERVICE, STATIC_MAP_SERVICE,
};

/// Service wired to the fakes in this module.
pub type FakeImpactService = ImpactService<FakeStaticMap, FakePlaces, FakeGenerative>;

/// Seed used for the catalog of [`fake_service`].
pub const TEST_RNG_SEED: u64 = 0x5EED;

/// Opaque RGB PNG of the given size, standing in for a satellite image.
pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([34, 85, 51]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encoding an in-memory PNG cannot fail");
    bytes
}

/// Build a service over default fakes that persists into `artifact_dir`
/// and never sleeps.
pub fn fake_service(artifact_dir: &Path) -> FakeImpactService {
    fake_service_with(
        artifact_dir,
        FakeStaticMap::returning(sample_png(16, 9)),
        FakePlaces::returning(PlacesResponse::default()),
        FakeGenerative::new("The region recovers slowly.", "https://images.test/edited.png"),
    )
}

/// Build a service over the given fakes.
pub fn fake_service_with(
    artifact_dir: &Path,
    maps: FakeStaticMap,
    places: FakePlaces,
    generative: FakeGenerative,
) -> FakeImpactService {
    let config = ServiceConfig::default()
        .with_artifact_dir(artifact_dir)
        .with_settle_delay(Duration::ZERO);

    ImpactService::new(
        AsteroidCatalog::with_rng(StdRng::seed_from_u64(TEST_RNG_SEED)),
        maps,
        places,
        generative,
        config,
    )
}

/// Static-map fake that returns fixed bytes or fails.
#[derive(Debug, Default)]
pub struct FakeStaticMap {
    image: Option<Vec<u8>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<MapRequest>>,
}

impl FakeStaticMap {
    pub fn returning(image: Vec<u8>) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<MapRequest> {
        *self.last_request.lock().expect("fake lock poisoned")
    }
}

impl StaticMapProvider for FakeStaticMap {
    async fn fetch_map_image(&self, request: MapRequest) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().expect("fake lock poisoned") = Some(request);
        self.image
            .clone()
            .ok_or_else(|| Error::upstream(STATIC_MAP_SERVICE, "HTTP 503 Service Unavailable"))
    }
}

/// Places fake that returns a fixed feature collection or fails.
#[derive(Debug, Default)]
pub struct FakePlaces {
    response: Option<PlacesResponse>,
    calls: AtomicUsize,
}

impl FakePlaces {
    pub fn returning(response: PlacesResponse) -> Self {
        Self {
            response: Some(response),
            ..Self::default()
        }
    }

    /// Fake answering with the given raw JSON feature collection.
    pub fn from_json(json: &str) -> Self {
        Self::returning(serde_json::from_str(json).expect("valid places fixture"))
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PlacesProvider for FakePlaces {
    async fn populated_places(&self, _: f64, _: f64, _: f64) -> Result<PlacesResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .clone()
            .ok_or_else(|| Error::upstream(PLACES_SERVICE, "request failed: timed out"))
    }
}

/// Generative fake recording every request it receives.
#[derive(Debug, Default)]
pub struct FakeGenerative {
    narrative: Option<String>,
    edit_url: Option<String>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    edit_requests: Mutex<Vec<ImageEditRequest>>,
}

impl FakeGenerative {
    pub fn new(narrative: impl Into<String>, edit_url: impl Into<String>) -> Self {
        Self {
            narrative: Some(narrative.into()),
            edit_url: Some(edit_url.into()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().expect("fake lock poisoned").clone()
    }

    pub fn edit_requests(&self) -> Vec<ImageEditRequest> {
        self.edit_requests.lock().expect("fake lock poisoned").clone()
    }
}

impl GenerativeProvider for FakeGenerative {
    async fn complete_chat(&self, request: ChatRequest) -> Result<String> {
        self.chat_requests
            .lock()
            .expect("fake lock poisoned")
            .push(request);
        self.narrative
            .clone()
            .ok_or_else(|| Error::upstream(GENERATIVE_SERVICE, "HTTP 429 Too Many Requests"))
    }

    async fn edit_image(&self, request: ImageEditRequest) -> Result<String> {
        self.edit_requests
            .lock()
            .expect("fake lock poisoned")
            .push(request);
        self.edit_url
            .clone()
            .ok_or_else(|| Error::upstream(GENERATIVE_SERVICE, "HTTP 500 Internal Server Error"))
    }
}
