//! Shared fakes for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use geocomplete::{
    ForwardGeocoder, GeocodeResult, GeocoderConfig, GeocoderError, GeocoderWidget, HostEvent,
    QueryParams, Viewport,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Clone)]
enum Reply {
    Places(Vec<GeocodeResult>),
    Status(u16),
}

/// Remote geocoder that records every request and answers from a script
#[derive(Clone, Default)]
pub struct MockGeocoder {
    calls: Arc<Mutex<Vec<(String, QueryParams)>>>,
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, query: &str, places: Vec<GeocodeResult>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(query.to_string(), Reply::Places(places));
        self
    }

    pub fn fail(self, query: &str, status: u16) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(query.to_string(), Reply::Status(status));
        self
    }

    pub fn delay(self, query: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(query.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<(String, QueryParams)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls().into_iter().map(|(query, _)| query).collect()
    }
}

#[async_trait]
impl ForwardGeocoder for MockGeocoder {
    async fn geocode_forward(
        &self,
        query: &str,
        params: &QueryParams,
    ) -> geocomplete::Result<Vec<GeocodeResult>> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), params.clone()));

        let delay = self.delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().unwrap().get(query).cloned();
        match reply {
            Some(Reply::Places(places)) => Ok(places),
            Some(Reply::Status(status)) => Err(GeocoderError::Status {
                status,
                body: "{\"message\":\"Not Authorized - Invalid Token\"}".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

pub fn places(prefix: &str, count: usize) -> Vec<GeocodeResult> {
    (0..count)
        .map(|i| GeocodeResult::point(format!("{prefix} {i}"), i as f64, i as f64))
        .collect()
}

pub fn viewport() -> Viewport {
    Viewport::default().with_size(800.0, 600.0)
}

pub fn widget_with(
    config: GeocoderConfig,
    remote: &MockGeocoder,
) -> (GeocoderWidget, mpsc::UnboundedReceiver<HostEvent>) {
    let (host_tx, host_rx) = mpsc::unbounded_channel();
    let widget = GeocoderWidget::with_geocoder(config, viewport(), Arc::new(remote.clone()), host_tx)
        .expect("valid configuration");
    (widget, host_rx)
}

/// Drive timers and lookups until the widget has nothing left to do.
///
/// Needs paused time: the idle timeout advances the clock instead of waiting.
pub async fn settle(widget: &mut GeocoderWidget) {
    while let Ok(Some(event)) =
        tokio::time::timeout(Duration::from_secs(10), widget.next_event()).await
    {
        widget.handle_event(event);
    }
}
