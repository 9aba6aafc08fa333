//! Selection resolution: chosen result to outbound viewport

use crate::config::GeocoderConfig;
use crate::mercator::{fit_bounds, FitBoundsOptions};
use crate::types::{GeocodeResult, Viewport};

#[derive(Debug, Clone, Copy)]
pub struct SelectionResolver {
    pub point_zoom: f64,
    pub transition_duration: u64,
    pub fit_bounds: FitBoundsOptions,
}

impl SelectionResolver {
    pub fn from_config(config: &GeocoderConfig) -> Self {
        Self {
            point_zoom: config.point_zoom,
            transition_duration: config.transition_duration,
            fit_bounds: config.fit_bounds,
        }
    }

    /// New viewport framing `item`, keeping every other field of `current`
    pub fn resolve(&self, current: &Viewport, item: &GeocodeResult) -> Viewport {
        let (longitude, latitude, zoom) = match &item.bbox {
            Some(bbox) => {
                let fitted = fit_bounds(current.width, current.height, bbox, self.fit_bounds);
                (fitted.longitude, fitted.latitude, fitted.zoom)
            }
            None => (item.longitude(), item.latitude(), self.point_zoom),
        };

        Viewport {
            longitude,
            latitude,
            zoom,
            transition_duration: self.transition_duration,
            ..*current
        }
    }
}
