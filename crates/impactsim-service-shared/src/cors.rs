//! Cross-origin policy for browser clients.

use axum::http::{HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::response::{EXPLOSION_RADIUS_HEADER, IMAGE_ID_HEADER, ZOOM_LEVEL_HEADER};

/// CORS layer allowing any origin to call the read-only API.
///
/// Browsers hide non-safelisted response headers from scripts, so the image
/// metadata headers are listed explicitly.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(IMAGE_ID_HEADER),
            HeaderName::from_static(ZOOM_LEVEL_HEADER),
            HeaderName::from_static(EXPLOSION_RADIUS_HEADER),
            HeaderName::from_static("x-request-id"),
        ])
}
