//! In-memory cache of fetched map images.
//!
//! Every successful map fetch is stored under a freshly generated id so a
//! later edit request can refer back to the exact image the caller saw.
//! Entries are immutable once inserted and live as long as the cache.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Opaque identifier of a cached image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(Uuid);

impl ImageId {
    /// Generate a new random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ImageId {
    type Err = Error;

    /// Parse an id. Anything that is not a UUID cannot name a cached image and
    /// is reported as [`Error::ImageNotFound`].
    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::ImageNotFound { id: s.to_string() })
    }
}

/// Process-wide image store keyed by [`ImageId`].
#[derive(Debug, Default)]
pub struct ImageCache {
    images: DashMap<ImageId, Arc<[u8]>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under a new id and return the id.
    pub fn put(&self, bytes: impl Into<Arc<[u8]>>) -> ImageId {
        let id = ImageId::generate();
        self.images.insert(id, bytes.into());
        id
    }

    /// Fetch the bytes stored under `id`.
    pub fn get(&self, id: &ImageId) -> Result<Arc<[u8]>> {
        self.images
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::ImageNotFound { id: id.to_string() })
    }

    pub fn contains(&self, id: &ImageId) -> bool {
        self.images.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
