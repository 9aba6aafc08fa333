use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longitude/latitude pair in degrees, in that order (GeoJSON convention)
pub type LngLat = [f64; 2];

/// Geographic rectangle as `[west, south, east, north]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// South-west and north-east corners
    pub fn corners(&self) -> [LngLat; 2] {
        [[self.west, self.south], [self.east, self.north]]
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(b: [f64; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.west, b.south, b.east, b.north]
    }
}

/// One candidate place, either from a local lookup or the remote geocoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub place_name: String,
    pub center: LngLat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub place_type: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
}

impl GeocodeResult {
    /// Point-only result
    pub fn point(place_name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            place_name: place_name.into(),
            center: [longitude, latitude],
            bbox: None,
            id: None,
            text: None,
            place_type: Vec::new(),
            relevance: None,
        }
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn longitude(&self) -> f64 {
        self.center[0]
    }

    pub fn latitude(&self) -> f64 {
        self.center[1]
    }
}

/// Camera state of a map view. Owned by the host; the widget only proposes new values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    /// Pixel width of the map view
    pub width: f64,
    /// Pixel height of the map view
    pub height: f64,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub bearing: f64,
    /// Milliseconds; only meaningful on programmatic transitions
    #[serde(default)]
    pub transition_duration: u64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            longitude: 0.0,
            latitude: 0.0,
            zoom: 1.0,
            width: 800.0,
            height: 600.0,
            pitch: 0.0,
            bearing: 0.0,
            transition_duration: 0,
        }
    }
}

impl Viewport {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn is_finite(&self) -> bool {
        [
            self.longitude,
            self.latitude,
            self.zoom,
            self.width,
            self.height,
            self.pitch,
            self.bearing,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Extra parameters merged into every remote request (`country`, `types`, `proximity`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The requested result count, if one was set
    pub fn limit(&self) -> Option<usize> {
        self.get("limit").and_then(|v| v.parse().ok())
    }

    /// Copy of these params with `limit` overriding any caller-supplied value
    pub fn with_limit(&self, limit: usize) -> Self {
        self.clone().with("limit", limit.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
