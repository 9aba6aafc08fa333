//! Geocoder autocomplete widget
//!
//! `GeocoderWidget` owns the component state and the three resolvers. It is driven
//! by direct input calls (`on_input_changed`, `edit`, `on_focus`, `on_blur`,
//! `on_select`) and by timer/lookup completions it receives on its own event
//! channel. The owner pumps those with `next_event().await` followed by
//! `handle_event`, so every state change happens on the owner's task.

pub mod debouncer;
pub mod input;
pub mod visibility;

pub use debouncer::QueryDebouncer;
pub use input::{InputBuffer, InputOperation};
pub use visibility::{DropdownVisibility, Visibility};

use crate::config::{GeocoderConfig, BLUR_GRACE_PERIOD};
use crate::error::Result;
use crate::geocoding::mapbox::{ClientOptions, MapboxClient};
use crate::geocoding::ForwardGeocoder;
use crate::resolver::{Resolution, ResultResolver};
use crate::selection::SelectionResolver;
use crate::types::{GeocodeResult, Viewport};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Completions delivered back to the widget
#[derive(Debug)]
pub enum WidgetEvent {
    /// Debounce timer fired
    QueryReady { seq: u64, query: String },
    /// Lookup finished
    Resolved {
        seq: u64,
        query: String,
        resolution: Resolution,
    },
    /// Blur grace period ended
    BlurElapsed { token: u64 },
}

/// Receiver of viewport proposals and focus notifications
pub trait GeocoderHost: Send {
    fn on_selected(&mut self, viewport: Viewport, item: &GeocodeResult);

    fn on_focus(&mut self) {}

    fn on_blur(&mut self) {}
}

/// Host notifications as messages, for hosts that live on another task
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Selected {
        viewport: Viewport,
        item: GeocodeResult,
    },
    Focused,
    Blurred,
}

impl GeocoderHost for mpsc::UnboundedSender<HostEvent> {
    fn on_selected(&mut self, viewport: Viewport, item: &GeocodeResult) {
        if self
            .send(HostEvent::Selected {
                viewport,
                item: item.clone(),
            })
            .is_err()
        {
            log::warn!("Host receiver dropped, selection of '{}' lost", item.place_name);
        }
    }

    fn on_focus(&mut self) {
        if self.send(HostEvent::Focused).is_err() {
            log::warn!("Host receiver dropped, focus notification lost");
        }
    }

    fn on_blur(&mut self) {
        if self.send(HostEvent::Blurred).is_err() {
            log::warn!("Host receiver dropped, blur notification lost");
        }
    }
}

/// Mutable component state
#[derive(Debug, Clone, Default)]
pub struct GeocoderState {
    pub results: Vec<GeocodeResult>,
    pub input: InputBuffer,
    /// Keyboard highlight within `results`
    pub selected_index: Option<usize>,
    /// A lookup for the current query is in flight
    pub loading: bool,
    /// Message of the last remote failure, cleared by the next successful lookup
    pub last_error: Option<String>,
}

pub struct GeocoderWidget {
    config: GeocoderConfig,
    resolver: Arc<ResultResolver>,
    selection: SelectionResolver,
    debouncer: QueryDebouncer,
    visibility: DropdownVisibility,
    host: Box<dyn GeocoderHost>,
    viewport: Viewport,
    state: GeocoderState,
    event_tx: mpsc::UnboundedSender<WidgetEvent>,
    event_rx: mpsc::UnboundedReceiver<WidgetEvent>,
    disposed: bool,
}

impl std::fmt::Debug for GeocoderWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderWidget")
            .field("config", &self.config)
            .field("viewport", &self.viewport)
            .field("state", &self.state)
            .field("visibility", &self.visibility.state())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl GeocoderWidget {
    /// Widget backed by the Mapbox client, bound to `config.access_token`
    pub fn new(
        config: GeocoderConfig,
        viewport: Viewport,
        host: impl GeocoderHost + 'static,
    ) -> Result<Self> {
        Self::with_client_options(config, viewport, ClientOptions::default(), host)
    }

    pub fn with_client_options(
        config: GeocoderConfig,
        viewport: Viewport,
        options: ClientOptions,
        host: impl GeocoderHost + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let client = MapboxClient::new(config.access_token.clone(), options)?;
        Self::with_geocoder(config, viewport, Arc::new(client), host)
    }

    /// Widget backed by any remote geocoder
    pub fn with_geocoder(
        config: GeocoderConfig,
        viewport: Viewport,
        remote: Arc<dyn ForwardGeocoder>,
        host: impl GeocoderHost + 'static,
    ) -> Result<Self> {
        config.validate()?;
        if !viewport.is_finite() {
            return Err(crate::error::GeocoderError::Config(format!(
                "viewport must be finite: {viewport:?}"
            )));
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let resolver = Arc::new(ResultResolver::from_config(&config, remote));
        let selection = SelectionResolver::from_config(&config);
        let debouncer = QueryDebouncer::new(config.timeout, event_tx.clone());
        let visibility = DropdownVisibility::new(BLUR_GRACE_PERIOD, event_tx.clone());

        // Seeded once; later config changes never overwrite what the user typed
        let state = GeocoderState {
            input: InputBuffer::new(config.initial_input_value.clone()),
            ..GeocoderState::default()
        };

        log::debug!("Geocoder widget created: {:?}", config);

        Ok(Self {
            config,
            resolver,
            selection,
            debouncer,
            visibility,
            host: Box::new(host),
            viewport,
            state,
            event_tx,
            event_rx,
            disposed: false,
        })
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    pub fn state(&self) -> &GeocoderState {
        &self.state
    }

    pub fn results(&self) -> &[GeocodeResult] {
        &self.state.results
    }

    pub fn input(&self) -> &str {
        &self.state.input.text
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Host pushes its current viewport (the widget never changes it itself)
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility.state()
    }

    pub fn is_focused(&self) -> bool {
        self.visibility.is_focused()
    }

    pub fn is_dropdown_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    /// Items the dropdown should render right now
    pub fn visible_results(&self) -> &[GeocodeResult] {
        if self.is_dropdown_visible() {
            &self.state.results
        } else {
            &[]
        }
    }

    /// Label for an item, using the configured formatter
    pub fn format_item(&self, item: &GeocodeResult) -> String {
        (self.config.format_item)(item)
    }

    /// Replace the input text (echoed immediately) and restart the debounce timer
    pub fn on_input_changed(&mut self, text: impl Into<String>) {
        if self.disposed {
            return;
        }
        self.state.input.set_text(text);
        self.schedule_lookup();
    }

    /// Apply an editing operation; a text change restarts the debounce timer
    pub fn edit(&mut self, operation: InputOperation) {
        if self.disposed {
            return;
        }
        if self.state.input.apply(operation) {
            self.schedule_lookup();
        }
    }

    fn schedule_lookup(&mut self) {
        let seq = self.debouncer.schedule(self.state.input.text.clone());
        log::trace!("Scheduled lookup #{} for '{}'", seq, self.state.input.text);
    }

    pub fn on_focus(&mut self) {
        if self.disposed {
            return;
        }
        self.visibility.focus();
        self.host.on_focus();
    }

    pub fn on_blur(&mut self) {
        if self.disposed {
            return;
        }
        self.host.on_blur();
        self.visibility.blur();
    }

    pub fn highlight_next(&mut self) {
        let len = self.state.results.len();
        if len == 0 {
            return;
        }
        self.state.selected_index = Some(match self.state.selected_index {
            Some(i) => (i + 1) % len,
            None => 0,
        });
    }

    pub fn highlight_previous(&mut self) {
        let len = self.state.results.len();
        if len == 0 {
            return;
        }
        self.state.selected_index = Some(match self.state.selected_index {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    /// Select the highlighted item, if the dropdown shows one
    pub fn select_highlighted(&mut self) -> Option<Viewport> {
        let index = self.state.selected_index?;
        self.select_index(index)
    }

    /// Select a visible dropdown item by position
    pub fn select_index(&mut self, index: usize) -> Option<Viewport> {
        let item = self.visible_results().get(index)?.clone();
        Some(self.on_select(&item))
    }

    /// Derive the new viewport for `item` and hand it to the host.
    ///
    /// After `dispose` the viewport is still computed but the host is not told.
    pub fn on_select(&mut self, item: &GeocodeResult) -> Viewport {
        if self.disposed {
            return self.selection.resolve(&self.viewport, item);
        }
        let viewport = self.selection.resolve(&self.viewport, item);
        log::info!(
            "Selected '{}' -> lon {:.5}, lat {:.5}, zoom {:.2}",
            item.place_name,
            viewport.longitude,
            viewport.latitude,
            viewport.zoom
        );
        self.host.on_selected(viewport, item);

        if self.config.hide_on_select {
            self.state.results.clear();
            self.state.selected_index = None;
            self.state.loading = false;
            self.visibility.force_hide();
            // A late response must not re-open the list; a timer still waiting
            // for newer input is left alone
            self.debouncer.retire_dispatched();
        }

        if self.config.update_input_on_select {
            let label = self.format_item(item);
            self.state.input.set_text(label);
        }

        viewport
    }

    /// Wait for the next timer or lookup completion
    pub async fn next_event(&mut self) -> Option<WidgetEvent> {
        self.event_rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<WidgetEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn handle_event(&mut self, event: WidgetEvent) {
        if self.disposed {
            return;
        }

        match event {
            WidgetEvent::QueryReady { seq, query } => {
                if !self.debouncer.is_current(seq) {
                    log::trace!("Dropping superseded timer #{}", seq);
                    return;
                }
                self.dispatch_lookup(seq, query);
            }
            WidgetEvent::Resolved {
                seq,
                query,
                resolution,
            } => {
                if !self.debouncer.accepts_result(seq) {
                    log::debug!("Discarding stale results #{} for '{}'", seq, query);
                    return;
                }
                self.apply_resolution(resolution);
            }
            WidgetEvent::BlurElapsed { token } => {
                self.visibility.on_blur_elapsed(token);
            }
        }
    }

    fn dispatch_lookup(&mut self, seq: u64, query: String) {
        self.state.loading = true;
        self.debouncer.mark_dispatched(seq);

        let resolver = Arc::clone(&self.resolver);
        let events = self.event_tx.clone();
        tokio::spawn(async move {
            let resolution = resolver.resolve(&query).await;
            let _ = events.send(WidgetEvent::Resolved {
                seq,
                query,
                resolution,
            });
        });
    }

    fn apply_resolution(&mut self, resolution: Resolution) {
        let Resolution {
            mut results,
            remote_error,
        } = resolution;
        results.truncate(self.resolver.limit());

        self.state.selected_index = if results.is_empty() { None } else { Some(0) };
        self.state.results = results;
        self.state.loading = false;
        self.state.last_error = remote_error.map(|err| err.to_string());

        if !self.state.results.is_empty() {
            self.visibility.reveal_if_focused();
        }
    }

    /// Cancel pending timers and stop reacting to events
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.debouncer.cancel_pending();
        self.visibility.force_hide();
        self.disposed = true;
        log::debug!("Geocoder widget disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for GeocoderWidget {
    fn drop(&mut self) {
        self.dispose();
    }
}
