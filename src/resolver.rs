//! Result resolution: local lookup first, remote geocoder fills the remaining capacity

use crate::config::GeocoderConfig;
use crate::error::{GeocoderError, Result};
use crate::geocoding::{ForwardGeocoder, LocalGeocoder};
use crate::types::{GeocodeResult, QueryParams};
use std::sync::Arc;

/// Outcome of one lookup.
///
/// A remote failure does not discard the local results: both are reported and the
/// caller decides how to surface the error.
#[derive(Debug)]
pub struct Resolution {
    pub results: Vec<GeocodeResult>,
    pub remote_error: Option<GeocoderError>,
}

impl Resolution {
    fn ok(results: Vec<GeocodeResult>) -> Self {
        Self {
            results,
            remote_error: None,
        }
    }

    /// Propagate a remote failure as an error
    pub fn into_result(self) -> Result<Vec<GeocodeResult>> {
        match self.remote_error {
            Some(err) => Err(err),
            None => Ok(self.results),
        }
    }
}

pub struct ResultResolver {
    remote: Arc<dyn ForwardGeocoder>,
    local: Option<Arc<dyn LocalGeocoder>>,
    query_params: QueryParams,
    limit: usize,
    local_only: bool,
}

impl ResultResolver {
    pub fn new(
        remote: Arc<dyn ForwardGeocoder>,
        local: Option<Arc<dyn LocalGeocoder>>,
        query_params: QueryParams,
        limit: usize,
        local_only: bool,
    ) -> Self {
        Self {
            remote,
            local,
            query_params,
            limit,
            local_only,
        }
    }

    pub fn from_config(config: &GeocoderConfig, remote: Arc<dyn ForwardGeocoder>) -> Self {
        Self::new(
            remote,
            config.local_geocoder.clone(),
            config.query_params.clone(),
            config.limit,
            config.local_only,
        )
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Capacity left for remote results once `local_count` local results are in
    pub fn remaining_limit(&self, local_count: usize) -> usize {
        self.limit.saturating_sub(local_count)
    }

    /// Parameters sent with the remote request
    pub fn remote_params(&self, remaining: usize) -> QueryParams {
        self.query_params.with_limit(remaining)
    }

    pub async fn resolve(&self, query: &str) -> Resolution {
        // Blank input never reaches either geocoder
        if query.trim().is_empty() {
            log::debug!("Empty query, skipping lookup");
            return Resolution::ok(Vec::new());
        }

        let mut results = self
            .local
            .as_ref()
            .map(|local| local.lookup(query))
            .unwrap_or_default();
        results.truncate(self.limit);

        let remaining = self.remaining_limit(results.len());
        if remaining == 0 || self.local_only {
            log::debug!(
                "Resolved '{}' locally with {} results (remote skipped)",
                query,
                results.len()
            );
            return Resolution::ok(results);
        }

        let params = self.remote_params(remaining);
        match self.remote.geocode_forward(query, &params).await {
            Ok(remote) => {
                let local_count = results.len();
                results.extend(remote.into_iter().take(remaining));
                log::debug!(
                    "Resolved '{}': {} local + {} remote",
                    query,
                    local_count,
                    results.len() - local_count
                );
                Resolution::ok(results)
            }
            Err(err) => {
                log::error!("Remote geocoding failed for '{}': {}", query, err);
                Resolution {
                    results,
                    remote_error: Some(err),
                }
            }
        }
    }
}
