//! World map panel
//!
//! Stand-in for a real map: a ratatui canvas showing the coastlines inside the
//! current viewport's extent, with a marker on the last selected place.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Rectangle},
        Block, Borders, Paragraph,
    },
    Frame,
};

use crate::mercator::{WebMercatorViewport, MAX_LATITUDE};
use crate::types::{BoundingBox, GeocodeResult, Viewport};

/// Approximate pixel size of one terminal cell, used to give the viewport a
/// pixel width and height
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Viewport size matching a panel of `area` cells (inside its borders)
pub fn viewport_size_for(area: Rect) -> (f64, f64) {
    let width = area.width.saturating_sub(2).max(1) as f64 * CELL_WIDTH_PX;
    let height = area.height.saturating_sub(2).max(1) as f64 * CELL_HEIGHT_PX;
    (width, height)
}

/// Visible extent clamped to valid longitude/latitude ranges
pub fn visible_extent(viewport: &Viewport) -> BoundingBox {
    let bounds = WebMercatorViewport::new(*viewport).bounds();
    BoundingBox::new(
        bounds.west.max(-180.0),
        bounds.south.max(-MAX_LATITUDE),
        bounds.east.min(180.0),
        bounds.north.min(MAX_LATITUDE),
    )
}

pub fn render_map(f: &mut Frame, area: Rect, viewport: &Viewport, marker: Option<&GeocodeResult>) {
    let extent = visible_extent(viewport);
    let title = format!(
        "Map  lon {:.4}  lat {:.4}  zoom {:.2}",
        viewport.longitude, viewport.latitude, viewport.zoom
    );

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds([extent.west, extent.east])
        .y_bounds([extent.south, extent.north])
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: Color::Green,
                resolution: MapResolution::High,
            });
            if let Some(item) = marker {
                if let Some(bbox) = &item.bbox {
                    ctx.draw(&Rectangle {
                        x: bbox.west,
                        y: bbox.south,
                        width: bbox.east - bbox.west,
                        height: bbox.north - bbox.south,
                        color: Color::Yellow,
                    });
                }
                ctx.print(
                    item.longitude(),
                    item.latitude(),
                    Span::styled("X", Style::default().fg(Color::Red)),
                );
            }
        });

    f.render_widget(canvas, area);
}

pub fn render_status(f: &mut Frame, area: Rect, status: &str, error: Option<&str>) {
    let mut spans = vec![Span::raw(status.to_string())];
    if let Some(error) = error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(error.to_string(), Style::default().fg(Color::Red)));
    }

    let help = "Tab: focus/blur | Up/Down: highlight | Enter: select | C-a/e/k/y: edit | Esc: quit";
    let paragraph = Paragraph::new(vec![
        Line::from(spans),
        Line::styled(help, Style::default().fg(Color::Gray)),
    ])
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(paragraph, area);
}
