//! Web-Mercator projection math
//!
//! World coordinates use 512px tiles with y growing southwards, matching the
//! convention of Mapbox GL style viewports. `fit_bounds` is the pure function the
//! selection resolver delegates bounding-box framing to.

use crate::types::{BoundingBox, LngLat, Viewport};
use serde::Serialize;
use std::f64::consts::PI;

/// Pixel size of one tile at zoom 0
pub const TILE_SIZE: f64 = 512.0;
/// Latitude limit of the Web-Mercator square
pub const MAX_LATITUDE: f64 = 85.051129;
pub const DEFAULT_MAX_ZOOM: f64 = 20.0;

/// Project a coordinate to world pixels at the given scale (`2^zoom`)
pub fn lng_lat_to_world(lng_lat: LngLat, scale: f64) -> [f64; 2] {
    let lambda = lng_lat[0].to_radians();
    let phi = lng_lat[1].clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let world = scale * TILE_SIZE;

    [
        world * (lambda + PI) / (2.0 * PI),
        world * (PI - (PI / 4.0 + phi / 2.0).tan().ln()) / (2.0 * PI),
    ]
}

/// Inverse of [`lng_lat_to_world`]
pub fn world_to_lng_lat(xy: [f64; 2], scale: f64) -> LngLat {
    let world = scale * TILE_SIZE;
    let lambda = xy[0] / world * 2.0 * PI - PI;
    let phi = 2.0 * ((PI - xy[1] / world * 2.0 * PI).exp().atan() - PI / 4.0);

    [lambda.to_degrees(), phi.to_degrees()]
}

pub fn zoom_to_scale(zoom: f64) -> f64 {
    2_f64.powf(zoom)
}

/// Options for [`fit_bounds`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBoundsOptions {
    /// Pixels kept free on every side of the box
    pub padding: f64,
    pub max_zoom: f64,
}

impl Default for FitBoundsOptions {
    fn default() -> Self {
        Self {
            padding: 0.0,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

/// Center and zoom that frame a box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FittedView {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
}

/// Smallest-zoom-change framing of `bbox` inside a `width` x `height` pixel view.
///
/// Degenerate boxes (zero width and height) resolve to `max_zoom`.
pub fn fit_bounds(
    width: f64,
    height: f64,
    bbox: &BoundingBox,
    options: FitBoundsOptions,
) -> FittedView {
    let nw = lng_lat_to_world([bbox.west, bbox.north], 1.0);
    let se = lng_lat_to_world([bbox.east, bbox.south], 1.0);

    let size_x = (se[0] - nw[0]).abs();
    let size_y = (se[1] - nw[1]).abs();
    let target_x = (width - 2.0 * options.padding).max(1.0);
    let target_y = (height - 2.0 * options.padding).max(1.0);

    let scale_x = target_x / size_x;
    let scale_y = target_y / size_y;
    let zoom = scale_x.min(scale_y).log2().clamp(0.0, options.max_zoom);

    let center = world_to_lng_lat([(nw[0] + se[0]) / 2.0, (nw[1] + se[1]) / 2.0], 1.0);

    FittedView {
        longitude: center[0],
        latitude: center[1],
        zoom,
    }
}

/// A viewport with projection helpers bound to its center, zoom and size
#[derive(Debug, Clone, Copy)]
pub struct WebMercatorViewport {
    pub viewport: Viewport,
    scale: f64,
    center_world: [f64; 2],
}

impl WebMercatorViewport {
    pub fn new(viewport: Viewport) -> Self {
        let scale = zoom_to_scale(viewport.zoom);
        let center_world = lng_lat_to_world([viewport.longitude, viewport.latitude], scale);
        Self {
            viewport,
            scale,
            center_world,
        }
    }

    /// Screen pixel (origin top-left) of a coordinate
    pub fn project(&self, lng_lat: LngLat) -> [f64; 2] {
        let world = lng_lat_to_world(lng_lat, self.scale);
        [
            world[0] - self.center_world[0] + self.viewport.width / 2.0,
            world[1] - self.center_world[1] + self.viewport.height / 2.0,
        ]
    }

    /// Coordinate under a screen pixel
    pub fn unproject(&self, pixel: [f64; 2]) -> LngLat {
        let world = [
            pixel[0] + self.center_world[0] - self.viewport.width / 2.0,
            pixel[1] + self.center_world[1] - self.viewport.height / 2.0,
        ];
        world_to_lng_lat(world, self.scale)
    }

    /// Geographic extent currently visible
    pub fn bounds(&self) -> BoundingBox {
        let [west, north] = self.unproject([0.0, 0.0]);
        let [east, south] = self.unproject([self.viewport.width, self.viewport.height]);
        BoundingBox::new(west, south, east, north)
    }

    pub fn fit_bounds(&self, bbox: &BoundingBox, options: FitBoundsOptions) -> FittedView {
        fit_bounds(self.viewport.width, self.viewport.height, bbox, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_world_roundtrip_at_origin() {
        let world = lng_lat_to_world([0.0, 0.0], 1.0);
        assert!((world[0] - TILE_SIZE / 2.0).abs() < EPS);
        assert!((world[1] - TILE_SIZE / 2.0).abs() < EPS);

        let back = world_to_lng_lat(world, 1.0);
        assert!(back[0].abs() < EPS);
        assert!(back[1].abs() < EPS);
    }

    #[test]
    fn test_latitude_is_clamped() {
        let pole = lng_lat_to_world([0.0, 90.0], 1.0);
        let limit = lng_lat_to_world([0.0, MAX_LATITUDE], 1.0);
        assert_eq!(pole, limit);
        assert!(pole[1].abs() < 1e-3);
    }

    #[test]
    fn test_fit_symmetric_box() {
        let view = fit_bounds(
            800.0,
            600.0,
            &BoundingBox::new(-10.0, -5.0, 10.0, 5.0),
            FitBoundsOptions::default(),
        );

        assert!(view.longitude.abs() < EPS);
        assert!(view.latitude.abs() < EPS);
        // width-bound: 20 degrees is 512 * 20 / 360 px at zoom 0
        let expected = (800.0 / (TILE_SIZE * 20.0 / 360.0)).log2();
        assert!((view.zoom - expected).abs() < EPS);
    }

    #[test]
    fn test_padding_zooms_out() {
        let bbox = BoundingBox::new(2.2, 48.8, 2.5, 48.9);
        let tight = fit_bounds(800.0, 600.0, &bbox, FitBoundsOptions::default());
        let padded = fit_bounds(
            800.0,
            600.0,
            &bbox,
            FitBoundsOptions {
                padding: 100.0,
                ..Default::default()
            },
        );
        assert!(padded.zoom < tight.zoom);
    }

    #[test]
    fn test_degenerate_box_uses_max_zoom() {
        let view = fit_bounds(
            800.0,
            600.0,
            &BoundingBox::new(13.4, 52.5, 13.4, 52.5),
            FitBoundsOptions::default(),
        );
        assert_eq!(view.zoom, DEFAULT_MAX_ZOOM);
        assert!((view.longitude - 13.4).abs() < 1e-6);
        assert!((view.latitude - 52.5).abs() < 1e-6);
    }

    #[test]
    fn test_viewport_project_center() {
        let vp = WebMercatorViewport::new(Viewport {
            longitude: -122.4,
            latitude: 37.8,
            zoom: 11.0,
            ..Default::default()
        });
        let px = vp.project([-122.4, 37.8]);
        assert!((px[0] - 400.0).abs() < 1e-6);
        assert!((px[1] - 300.0).abs() < 1e-6);

        let back = vp.unproject([400.0, 300.0]);
        assert!((back[0] + 122.4).abs() < 1e-9);
        assert!((back[1] - 37.8).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_contain_center() {
        let vp = WebMercatorViewport::new(Viewport {
            longitude: 10.0,
            latitude: 45.0,
            zoom: 5.0,
            ..Default::default()
        });
        let b = vp.bounds();
        assert!(b.west < 10.0 && 10.0 < b.east);
        assert!(b.south < 45.0 && 45.0 < b.north);
    }
}
