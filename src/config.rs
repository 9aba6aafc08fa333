//! Widget configuration
//!
//! `GeocoderConfig` carries every recognized option with its default. Builder-style
//! `with_*` methods keep call sites short; `validate` is called by the widget
//! constructor so misconfiguration fails before any timer or request is created.

use crate::error::{GeocoderError, Result};
use crate::geocoding::LocalGeocoder;
use crate::mercator::FitBoundsOptions;
use crate::types::{GeocodeResult, QueryParams};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(300);
pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_POINT_ZOOM: f64 = 16.0;
/// Delay between input blur and dropdown dismissal, so item clicks land first
pub const BLUR_GRACE_PERIOD: Duration = Duration::from_millis(300);

/// Label for a result in the dropdown and, optionally, in the input after selection
pub type FormatItem = Arc<dyn Fn(&GeocodeResult) -> String + Send + Sync>;

pub fn default_format_item(item: &GeocodeResult) -> String {
    item.place_name.clone()
}

#[derive(Clone)]
pub struct GeocoderConfig {
    /// Debounce delay between the last keystroke and the lookup
    pub timeout: Duration,
    /// Merged into every remote request
    pub query_params: QueryParams,
    /// Milliseconds, copied into the outbound viewport
    pub transition_duration: u64,
    pub hide_on_select: bool,
    /// Zoom used when a selected result has no bounding box
    pub point_zoom: f64,
    pub access_token: String,
    pub format_item: FormatItem,
    pub class_name: String,
    pub limit: usize,
    pub local_geocoder: Option<Arc<dyn LocalGeocoder>>,
    pub local_only: bool,
    pub update_input_on_select: bool,
    pub initial_input_value: String,
    pub fit_bounds: FitBoundsOptions,
}

impl std::fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("timeout", &self.timeout)
            .field("query_params", &self.query_params)
            .field("transition_duration", &self.transition_duration)
            .field("hide_on_select", &self.hide_on_select)
            .field("point_zoom", &self.point_zoom)
            .field("access_token", &"<redacted>")
            .field("class_name", &self.class_name)
            .field("limit", &self.limit)
            .field("local_geocoder", &self.local_geocoder.is_some())
            .field("local_only", &self.local_only)
            .field("update_input_on_select", &self.update_input_on_select)
            .field("initial_input_value", &self.initial_input_value)
            .field("fit_bounds", &self.fit_bounds)
            .finish()
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            query_params: QueryParams::new(),
            transition_duration: 0,
            hide_on_select: false,
            point_zoom: DEFAULT_POINT_ZOOM,
            access_token: String::new(),
            format_item: Arc::new(default_format_item),
            class_name: String::new(),
            limit: DEFAULT_LIMIT,
            local_geocoder: None,
            local_only: false,
            update_input_on_select: false,
            initial_input_value: String::new(),
            fit_bounds: FitBoundsOptions::default(),
        }
    }
}

impl GeocoderConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_query_params(mut self, query_params: QueryParams) -> Self {
        self.query_params = query_params;
        self
    }

    pub fn with_transition_duration(mut self, millis: u64) -> Self {
        self.transition_duration = millis;
        self
    }

    pub fn with_hide_on_select(mut self, hide_on_select: bool) -> Self {
        self.hide_on_select = hide_on_select;
        self
    }

    pub fn with_point_zoom(mut self, point_zoom: f64) -> Self {
        self.point_zoom = point_zoom;
        self
    }

    pub fn with_format_item<F>(mut self, format_item: F) -> Self
    where
        F: Fn(&GeocodeResult) -> String + Send + Sync + 'static,
    {
        self.format_item = Arc::new(format_item);
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_local_geocoder<G: LocalGeocoder + 'static>(mut self, local_geocoder: G) -> Self {
        self.local_geocoder = Some(Arc::new(local_geocoder));
        self
    }

    pub fn with_local_only(mut self, local_only: bool) -> Self {
        self.local_only = local_only;
        self
    }

    pub fn with_update_input_on_select(mut self, update_input_on_select: bool) -> Self {
        self.update_input_on_select = update_input_on_select;
        self
    }

    pub fn with_initial_input_value(mut self, value: impl Into<String>) -> Self {
        self.initial_input_value = value.into();
        self
    }

    pub fn with_fit_bounds(mut self, fit_bounds: FitBoundsOptions) -> Self {
        self.fit_bounds = fit_bounds;
        self
    }

    /// Reject configurations the widget cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.local_only && self.access_token.trim().is_empty() {
            return Err(GeocoderError::Config(
                "an access token is required unless local_only is set".to_string(),
            ));
        }
        if self.local_only && self.local_geocoder.is_none() {
            return Err(GeocoderError::Config(
                "local_only requires a local geocoder".to_string(),
            ));
        }
        if self.limit == 0 {
            return Err(GeocoderError::Config("limit must be at least 1".to_string()));
        }
        if !self.point_zoom.is_finite() || self.point_zoom < 0.0 {
            return Err(GeocoderError::Config(format!(
                "point_zoom must be a non-negative number, got {}",
                self.point_zoom
            )));
        }
        let fit = &self.fit_bounds;
        if !fit.padding.is_finite() || fit.padding < 0.0 {
            return Err(GeocoderError::Config(format!(
                "fit-bounds padding must be non-negative, got {}",
                fit.padding
            )));
        }
        if !fit.max_zoom.is_finite() || fit.max_zoom < 0.0 {
            return Err(GeocoderError::Config(format!(
                "fit-bounds max_zoom out of range: {}",
                fit.max_zoom
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeocoderConfig::new("token");
        assert_eq!(config.timeout, Duration::from_millis(300));
        assert_eq!(config.limit, 5);
        assert_eq!(config.point_zoom, 16.0);
        assert_eq!(config.transition_duration, 0);
        assert!(!config.hide_on_select);
        assert!(!config.local_only);
        assert!(!config.update_input_on_select);
        assert!(config.query_params.is_empty());
        assert_eq!(config.class_name, "");
        assert_eq!(config.initial_input_value, "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_format_item_uses_place_name() {
        let config = GeocoderConfig::new("token");
        let item = GeocodeResult::point("Berlin, Germany", 13.4, 52.5);
        assert_eq!((config.format_item)(&item), "Berlin, Germany");
    }

    #[test]
    fn test_missing_token_fails_fast() {
        let err = GeocoderConfig::default().validate().unwrap_err();
        assert!(matches!(err, GeocoderError::Config(_)));
    }

    #[test]
    fn test_local_only_needs_no_token() {
        let config = GeocoderConfig::default()
            .with_local_only(true)
            .with_local_geocoder(|_: &str| Vec::<GeocodeResult>::new());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_only_without_local_geocoder_is_rejected() {
        let config = GeocoderConfig::new("token").with_local_only(true);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert!(GeocoderConfig::new("token").with_limit(0).validate().is_err());
    }

    #[test]
    fn test_bad_point_zoom_is_rejected() {
        assert!(GeocoderConfig::new("token")
            .with_point_zoom(f64::NAN)
            .validate()
            .is_err());
        assert!(GeocoderConfig::new("token")
            .with_point_zoom(-1.0)
            .validate()
            .is_err());
    }
}
