//! Mapbox Places forward geocoding client

use super::ForwardGeocoder;
use crate::error::{GeocoderError, Result};
use crate::types::{GeocodeResult, QueryParams};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.mapbox.com";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection options for [`MapboxClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// HTTP client bound to one access token
#[derive(Clone)]
pub struct MapboxClient {
    http: reqwest::Client,
    access_token: String,
    base_url: Url,
}

impl std::fmt::Debug for MapboxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxClient")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct FeatureCollection {
    // Missing `features` is treated as an empty result set
    #[serde(default)]
    features: Vec<GeocodeResult>,
}

impl MapboxClient {
    pub fn new(access_token: impl Into<String>, options: ClientOptions) -> Result<Self> {
        let base_url =
            Url::parse(&options.base_url).map_err(|e| GeocoderError::Url(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GeocoderError::Url(format!(
                "{} cannot be used as a base URL",
                options.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("geocomplete/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            access_token: access_token.into(),
            base_url,
        })
    }

    /// Request URL for a forward lookup; the query becomes one percent-encoded path segment
    pub fn forward_url(&self, query: &str, params: &QueryParams) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GeocoderError::Url(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push("geocoding")
            .push("v5")
            .push("mapbox.places")
            .push(&format!("{query}.json"));

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("access_token", &self.access_token);
            for (key, value) in params.iter() {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

/// Decode a Mapbox `FeatureCollection` body
pub fn parse_forward_response(body: &str) -> Result<Vec<GeocodeResult>> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    Ok(collection.features)
}

#[async_trait]
impl ForwardGeocoder for MapboxClient {
    async fn geocode_forward(
        &self,
        query: &str,
        params: &QueryParams,
    ) -> Result<Vec<GeocodeResult>> {
        let url = self.forward_url(query, params)?;
        log::debug!("Forward geocoding '{}' via {}", query, url.path());

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::warn!("Geocoding API returned status {} for '{}'", status, query);
            return Err(GeocoderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let features = parse_forward_response(&body)?;
        log::debug!("Geocoding '{}' returned {} features", query, features.len());
        Ok(features)
    }
}
