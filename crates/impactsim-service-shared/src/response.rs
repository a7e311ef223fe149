//! Response wrappers for successful HTTP responses.

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Header carrying the cache id of a returned map image.
pub const IMAGE_ID_HEADER: &str = "x-image-id";

/// Header carrying the zoom level a map image was fetched at.
pub const ZOOM_LEVEL_HEADER: &str = "x-zoom-level";

/// Header carrying the explosion radius behind an impact image.
pub const EXPLOSION_RADIUS_HEADER: &str = "x-explosion-radius";

/// Wrapper for JSON responses with content type metadata.
///
/// This provides symmetry with `ProblemDetails` by including content type
/// information in the response body.
///
/// # Example
///
/// ```
/// use impactsim_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Prediction {
///     text: String,
/// }
///
/// let response = ServiceResponse::new(Prediction { text: "...".into() });
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Binary response with an explicit content type and extra headers.
///
/// Only built from non-empty bytes that were produced successfully; failures
/// are answered with a `ProblemDetails` instead.
#[derive(Debug, Clone)]
pub struct BinaryResponse {
    bytes: Vec<u8>,
    content_type: &'static str,
    headers: HeaderMap,
}

impl BinaryResponse {
    pub fn new(bytes: Vec<u8>, content_type: &'static str) -> Self {
        Self {
            bytes,
            content_type,
            headers: HeaderMap::new(),
        }
    }

    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/png")
    }

    /// Attach a header; values that are not valid header text are dropped.
    pub fn with_header(mut self, name: &'static str, value: impl std::fmt::Display) -> Self {
        if let Ok(value) = HeaderValue::from_str(&value.to_string()) {
            self.headers.insert(HeaderName::from_static(name), value);
        }
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl IntoResponse for BinaryResponse {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, self.bytes).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(self.content_type),
        );
        headers.extend(self.headers);
        response
    }
}

/// Content type for an artifact file, chosen by extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
