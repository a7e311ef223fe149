//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Every failed request is answered with an `application/problem+json` body,
//! never with an empty or partial payload.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use impactsim_lib::Error as LibError;

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for image ids missing from the cache.
pub const PROBLEM_IMAGE_NOT_FOUND: &str = "/problems/image-not-found";

/// Problem type URI for missing artifact files.
pub const PROBLEM_FILE_NOT_FOUND: &str = "/problems/file-not-found";

/// Problem type URI for failed calls to an external provider.
pub const PROBLEM_UPSTREAM_FAILURE: &str = "/problems/upstream-failure";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use impactsim_service_shared::{ProblemDetails, PROBLEM_IMAGE_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_IMAGE_NOT_FOUND,
///     "Image Not Found",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("No cached image with id 'abc'")
/// .with_request_id("req-12345");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Identifies the specific occurrence (the request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Always "application/problem+json".
    pub content_type: String,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            content_type: "application/problem+json".to_string(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400 Bad Request for malformed or out-of-range input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 404 Not Found for an image id that was never cached.
    pub fn image_not_found(id: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_IMAGE_NOT_FOUND,
            "Image Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("No cached image with id '{}'", id))
        .with_request_id(request_id)
    }

    /// 404 Not Found for a missing artifact file.
    pub fn file_not_found(name: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_FILE_NOT_FOUND,
            "File Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("File '{}' does not exist", name))
        .with_request_id(request_id)
    }

    /// 502 Bad Gateway for a failed provider call.
    ///
    /// The provider's own message is logged, not returned, so credentials
    /// and provider internals stay out of responses.
    pub fn upstream_failure(service: &str, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_UPSTREAM_FAILURE,
            "Upstream Failure",
            StatusCode::BAD_GATEWAY,
        )
        .with_detail(format!("The {} provider did not return a usable response", service))
        .with_request_id(request_id)
    }

    /// 500 Internal Server Error.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Lets handlers use `Result<_, Box<ProblemDetails>>`, matching what
/// [`crate::Validate`] returns.
impl IntoResponse for Box<ProblemDetails> {
    fn into_response(self) -> Response {
        (*self).into_response()
    }
}

/// Convert library errors to ProblemDetails.
///
/// The `request_id` must be provided separately since library errors don't have it.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::Validation { message } => {
            ProblemDetails::bad_request(message.clone(), request_id)
        }
        LibError::ImageNotFound { id } => ProblemDetails::image_not_found(id, request_id),
        LibError::FileNotFound { name } => ProblemDetails::file_not_found(name, request_id),
        LibError::Upstream { service, .. } => ProblemDetails::upstream_failure(service, request_id),
        LibError::Image(_) => {
            ProblemDetails::internal_error("The image could not be processed", request_id)
        }
        LibError::Io(_) => ProblemDetails::internal_error("Artifact storage failed", request_id),
        _ => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}
