//! External provider abstraction.
//!
//! The orchestration service talks to three providers through the traits in
//! this module, which keeps the physics and orchestration logic testable with
//! in-process fakes:
//!
//! - [`StaticMapProvider`]: satellite image for a point and zoom level
//! - [`PlacesProvider`]: populated places inside a circle
//! - [`GenerativeProvider`]: narrative text and masked image edits
//!
//! The reqwest-backed implementations are [`GoogleStaticMapClient`],
//! [`GeoapifyPlacesClient`] and [`OpenAiClient`].

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;

mod http;
mod openai;
mod places;
mod static_map;

pub use openai::OpenAiClient;
pub use places::{sum_population, GeoapifyPlacesClient, PlaceFeature, PlacesResponse};
pub use static_map::GoogleStaticMapClient;

/// Service label used in errors and metrics for the static-map provider.
pub const STATIC_MAP_SERVICE: &str = "static-map";
/// Service label used in errors and metrics for the places provider.
pub const PLACES_SERVICE: &str = "places";
/// Service label used in errors and metrics for the generative provider.
pub const GENERATIVE_SERVICE: &str = "generative";

/// Parameters of a static-map request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

/// Renders satellite imagery centred on a point.
pub trait StaticMapProvider: Send + Sync {
    /// Fetch the raw image bytes for `request`.
    fn fetch_map_image(
        &self,
        request: MapRequest,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Looks up populated places around a point.
pub trait PlacesProvider: Send + Sync {
    /// Populated places within `radius_m` metres of (`longitude`, `latitude`).
    fn populated_places(
        &self,
        longitude: f64,
        latitude: f64,
        radius_m: f64,
    ) -> impl Future<Output = Result<PlacesResponse>> + Send;
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Chat completion request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// Masked image edit submitted to the generative provider.
///
/// `image` and `mask` must both be PNG with an alpha channel and share the
/// same dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEditRequest {
    pub image: Vec<u8>,
    pub image_name: String,
    pub mask: Vec<u8>,
    pub prompt: String,
    pub size: String,
}

/// Produces narrative text and edited images.
pub trait GenerativeProvider: Send + Sync {
    /// Run a chat completion and return the generated text.
    fn complete_chat(&self, request: ChatRequest)
        -> impl Future<Output = Result<String>> + Send;

    /// Submit an image edit and return a reference (URL) to the result.
    fn edit_image(&self, request: ImageEditRequest)
        -> impl Future<Output = Result<String>> + Send;
}
