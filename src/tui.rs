//! Terminal front-end
//!
//! - `renderer`: input box and dropdown drawing with pluggable strategies
//! - `map_view`: world map panel framed by the host viewport
//! - `toast`: transient notifications
//! - `engine`: the demo page and its event loop

pub mod engine;
pub mod map_view;
pub mod renderer;
pub mod toast;

pub use engine::{run_demo, DemoApp, TuiEngine};
pub use renderer::{
    DetailedItem, GeocoderView, InputRenderer, InputView, ItemRenderer, PlainInput, PlainItem,
};
pub use toast::{ToastState, ToastType};
