use thiserror::Error;

/// Convenient result alias for the impact simulator library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// An external provider call failed, timed out, or returned an unexpected shape.
    #[error("upstream {service} request failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// Raised when an image id does not name a cached map image.
    #[error("image {id} is not cached")]
    ImageNotFound { id: String },

    /// Raised when a persisted artifact could not be found.
    #[error("file {name} not found")]
    FileNotFound { name: String },

    /// Raised when caller-supplied parameters are malformed or unsupported.
    #[error("invalid request: {message}")]
    Validation { message: String },

    /// Raised when the service configuration is unusable.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Raised when a blocking worker panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),

    /// Wrapper for image decode/encode errors.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Error::Upstream {
            service,
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Returns `true` for errors that originate from an external provider.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_display_names_service() {
        let err = Error::upstream("static-map", "HTTP 500");
        assert_eq!(
            err.to_string(),
            "upstream static-map request failed: HTTP 500"
        );
        assert!(err.is_upstream());
    }

    #[test]
    fn image_not_found_display() {
        let err = Error::ImageNotFound {
            id: "abc".to_string(),
        };
        assert!(err.to_string().contains("abc"));
        assert!(!err.is_upstream());
    }
}
