//! geocomplete - headless geocoder autocomplete widget
//!
//! Typing is debounced, each settled query is resolved against an optional local
//! geocoder and the Mapbox Places API, and choosing a result proposes a new map
//! viewport to the host. A ratatui front-end and demo page sit on top.

pub mod cli;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod mercator;
pub mod resolver;
pub mod selection;
pub mod tui;
pub mod types;
pub mod widget;

pub use config::GeocoderConfig;
pub use error::{GeocoderError, Result};
pub use geocoding::{ForwardGeocoder, Gazetteer, LocalGeocoder, MapboxClient};
pub use mercator::{fit_bounds, FitBoundsOptions, WebMercatorViewport};
pub use resolver::{Resolution, ResultResolver};
pub use selection::SelectionResolver;
pub use types::{BoundingBox, GeocodeResult, LngLat, QueryParams, Viewport};
pub use widget::{GeocoderHost, GeocoderState, GeocoderWidget, HostEvent, WidgetEvent};
