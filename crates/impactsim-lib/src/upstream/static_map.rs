use reqwest::Client;
use tracing::debug;

use super::http::{build_client, send};
use super::{MapRequest, StaticMapProvider, STATIC_MAP_SERVICE};
use crate::config::{ProviderConfig, ServiceConfig};
use crate::error::{Error, Result};

/// Fixed rendering parameters for every static-map request.
const MAP_SCALE: u8 = 2;
const MAP_SIZE: &str = "1920x1080";
const MAP_FORMAT: &str = "png";
const MAP_TYPE: &str = "satellite";

/// Google Static Maps client.
#[derive(Debug, Clone)]
pub struct GoogleStaticMapClient {
    client: Client,
    config: ProviderConfig,
}

impl GoogleStaticMapClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.upstream_timeout)?,
            config: config.static_map.clone(),
        })
    }

    fn query(&self, request: MapRequest) -> Vec<(&'static str, String)> {
        vec![
            (
                "center",
                format!("{},{}", request.latitude, request.longitude),
            ),
            ("scale", MAP_SCALE.to_string()),
            ("zoom", request.zoom.to_string()),
            ("size", MAP_SIZE.to_string()),
            ("format", MAP_FORMAT.to_string()),
            ("maptype", MAP_TYPE.to_string()),
            ("key", self.config.key().to_string()),
        ]
    }
}

impl StaticMapProvider for GoogleStaticMapClient {
    async fn fetch_map_image(&self, request: MapRequest) -> Result<Vec<u8>> {
        debug!(
            latitude = request.latitude,
            longitude = request.longitude,
            zoom = request.zoom,
            "requesting static map"
        );

        let response = send(
            STATIC_MAP_SERVICE,
            self.client
                .get(&self.config.base_url)
                .query(&self.query(request)),
        )
        .await?;

        let bytes = response.bytes().await.map_err(|e| {
            Error::upstream(
                STATIC_MAP_SERVICE,
                format!("failed to read image body: {}", e.without_url()),
            )
        })?;

        if bytes.is_empty() {
            return Err(Error::upstream(STATIC_MAP_SERVICE, "empty image body"));
        }

        Ok(bytes.to_vec())
    }
}
