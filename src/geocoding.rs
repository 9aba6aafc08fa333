//! Geocoding collaborators
//!
//! - `ForwardGeocoder`: remote free-text lookup (Mapbox by default)
//! - `LocalGeocoder`: synchronous in-memory lookup, consulted before the remote one

pub mod local;
pub mod mapbox;

pub use local::Gazetteer;
pub use mapbox::MapboxClient;

use crate::error::Result;
use crate::types::{GeocodeResult, QueryParams};
use async_trait::async_trait;

/// Remote forward geocoding: resolve a query string to candidate places.
///
/// `params` already carries the requested `limit`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForwardGeocoder: Send + Sync {
    async fn geocode_forward(&self, query: &str, params: &QueryParams)
        -> Result<Vec<GeocodeResult>>;
}

/// Local (offline) lookup consulted before the remote geocoder
pub trait LocalGeocoder: Send + Sync {
    fn lookup(&self, query: &str) -> Vec<GeocodeResult>;
}

impl<F> LocalGeocoder for F
where
    F: Fn(&str) -> Vec<GeocodeResult> + Send + Sync,
{
    fn lookup(&self, query: &str) -> Vec<GeocodeResult> {
        self(query)
    }
}
