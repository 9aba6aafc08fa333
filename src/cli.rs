//! Command-line entry point
//!
//! Without `--query` the interactive demo page is started. With `--query` the
//! lookup runs once and the results are printed as JSON.

use crate::config::{GeocoderConfig, DEFAULT_LIMIT, DEFAULT_POINT_ZOOM};
use crate::geocoding::mapbox::{ClientOptions, DEFAULT_API_URL};
use crate::geocoding::{Gazetteer, MapboxClient};
use crate::resolver::ResultResolver;
use crate::selection::SelectionResolver;
use crate::tui::{run_demo, DemoApp, DetailedItem, GeocoderView};
use crate::types::{GeocodeResult, QueryParams, Viewport};
use crate::widget::GeocoderWidget;
use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// geocomplete - place search with a debounced autocomplete dropdown
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Mapbox access token
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", hide_env_values = true, default_value = "")]
    pub access_token: String,

    /// Debounce delay in milliseconds
    #[arg(long, default_value_t = 300)]
    pub timeout_ms: u64,

    /// Maximum number of results shown
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Zoom used for results without a bounding box
    #[arg(long, default_value_t = DEFAULT_POINT_ZOOM)]
    pub point_zoom: f64,

    /// Transition duration (ms) attached to proposed viewports
    #[arg(long, default_value_t = 0)]
    pub transition_duration: u64,

    /// Clear and hide the dropdown after a selection
    #[arg(long)]
    pub hide_on_select: bool,

    /// Replace the input text with the selected item's label
    #[arg(long)]
    pub update_input_on_select: bool,

    /// Never query the remote geocoder (requires --places)
    #[arg(long)]
    pub local_only: bool,

    /// Text placed in the input at startup
    #[arg(long, default_value = "")]
    pub initial_input: String,

    /// Extra query parameter sent with every remote request (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Shorthand for --param country=<CODES>
    #[arg(long)]
    pub country: Option<String>,

    /// JSON file of local places searched before the remote geocoder
    #[arg(long)]
    pub places: Option<PathBuf>,

    /// Geocoding API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub http_timeout_secs: u64,

    /// Show coordinates next to each dropdown item
    #[arg(long)]
    pub show_coordinates: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Run one lookup, print the results as JSON and exit
    #[arg(long)]
    pub query: Option<String>,
}

/// Parse `key=value`
pub fn parse_param(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

impl Cli {
    pub fn query_params(&self) -> QueryParams {
        let mut params: QueryParams = self.params.iter().cloned().collect();
        if let Some(country) = &self.country {
            params.insert("country", country.clone());
        }
        params
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.http_timeout_secs),
        }
    }

    /// Widget configuration described by the flags
    pub fn geocoder_config(&self) -> Result<GeocoderConfig> {
        let mut config = GeocoderConfig::new(self.access_token.clone())
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_query_params(self.query_params())
            .with_transition_duration(self.transition_duration)
            .with_hide_on_select(self.hide_on_select)
            .with_point_zoom(self.point_zoom)
            .with_limit(self.limit)
            .with_local_only(self.local_only)
            .with_update_input_on_select(self.update_input_on_select)
            .with_initial_input_value(self.initial_input.clone());

        if let Some(path) = &self.places {
            let gazetteer = Gazetteer::from_json_file(path)
                .with_context(|| format!("failed to load places from {}", path.display()))?;
            config = config.with_local_geocoder(gazetteer);
        }

        config.validate().context("invalid geocoder configuration")?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct QueryOutput<'a> {
    query: &'a str,
    results: &'a [GeocodeResult],
    /// Viewport the first result would produce
    viewport: Option<Viewport>,
}

/// CLI実行エントリーポイント
pub async fn run_cli(cli: Cli) -> Result<()> {
    let config = cli.geocoder_config()?;
    debug!("Configuration: {:?}", config);

    match &cli.query {
        Some(query) => run_query(config, cli.client_options(), query).await,
        None => run_tui_mode(config, &cli).await,
    }
}

async fn run_query(config: GeocoderConfig, options: ClientOptions, query: &str) -> Result<()> {
    let client = MapboxClient::new(config.access_token.clone(), options)?;
    let resolver = ResultResolver::from_config(&config, Arc::new(client));

    let resolution = resolver.resolve(query).await;
    if let Some(err) = resolution.remote_error {
        if resolution.results.is_empty() {
            return Err(err).with_context(|| format!("lookup for '{query}' failed"));
        }
        log::error!("Remote lookup failed, showing local results only: {}", err);
    }

    let results = resolution.results;
    let selection = SelectionResolver::from_config(&config);
    let viewport = results
        .first()
        .map(|item| selection.resolve(&Viewport::default(), item));

    let output = QueryOutput {
        query,
        results: &results,
        viewport,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    if results.is_empty() {
        anyhow::bail!("no results for '{}'", query);
    }
    Ok(())
}

async fn run_tui_mode(config: GeocoderConfig, cli: &Cli) -> Result<()> {
    let (host_tx, host_rx) = mpsc::unbounded_channel();
    let widget = GeocoderWidget::with_client_options(
        config,
        Viewport::default(),
        cli.client_options(),
        host_tx,
    )?;

    let mut view = GeocoderView::new();
    if cli.show_coordinates {
        view = view.with_item_renderer(DetailedItem);
    }

    run_demo(DemoApp::new(widget, host_rx, view)).await
}
