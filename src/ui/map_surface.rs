//! Map rendering
//!
//! Purely presentational: takes a center, a zoom and the markers to draw,
//! and paints the world coastline plus the pins on a ratatui canvas.

use crate::config::config::MapConfig;
use crate::core::{Coordinate, Marker};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    symbols,
    text::Line,
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, Widget,
    },
};

pub const DEFAULT_ZOOM: u8 = 13;
pub const MAX_ZOOM: u8 = 19;
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(51.505, -0.09);

/// How many 256px web-map tiles fit across the terminal view
const VIEW_TILES: f64 = 3.0;

/// What the map widget needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct MapSurfaceProps {
    pub center: Coordinate,
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

impl MapSurfaceProps {
    /// Center on the first marker, or on the configured default when there
    /// are none
    pub fn for_markers(markers: &[Marker], defaults: &MapConfig) -> Self {
        let center = markers
            .first()
            .map(|m| m.position)
            .unwrap_or(defaults.default_center);
        Self {
            center,
            zoom: defaults.zoom,
            markers: markers.to_vec(),
        }
    }
}

impl Default for MapSurfaceProps {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
        }
    }
}

/// Geographic bounds of the visible area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub lng_bounds: [f64; 2],
    pub lat_bounds: [f64; 2],
}

impl Viewport {
    /// Bounds around `center` at web-map `zoom`, clamped to the globe.
    /// Terminal cells are about twice as tall as wide, so half the
    /// longitude span is shown vertically.
    pub fn around(center: Coordinate, zoom: u8) -> Self {
        let lng_span = (VIEW_TILES * 360.0 / 2f64.powi(zoom.min(MAX_ZOOM) as i32)).min(360.0);
        let lat_span = (lng_span / 2.0).min(180.0);

        Self {
            lng_bounds: clamp_window(center.lng, lng_span, -180.0, 180.0),
            lat_bounds: clamp_window(center.lat, lat_span, -90.0, 90.0),
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.lng_bounds[0]..=self.lng_bounds[1]).contains(&point.lng)
            && (self.lat_bounds[0]..=self.lat_bounds[1]).contains(&point.lat)
    }
}

/// A window of `span` centered on `mid`, slid back inside [min, max]
fn clamp_window(mid: f64, span: f64, min: f64, max: f64) -> [f64; 2] {
    let half = span / 2.0;
    let mut lo = mid - half;
    let mut hi = mid + half;
    if lo < min {
        hi += min - lo;
        lo = min;
    }
    if hi > max {
        lo -= hi - max;
        hi = max;
    }
    [lo.max(min), hi.min(max)]
}

pub struct MapSurface<'a> {
    props: &'a MapSurfaceProps,
    zoom: u8,
}

impl<'a> MapSurface<'a> {
    pub fn new(props: &'a MapSurfaceProps) -> Self {
        Self {
            props,
            zoom: props.zoom,
        }
    }

    /// Draw at a different zoom than the props ask for (view-only)
    pub fn zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom.min(MAX_ZOOM);
        self
    }
}

impl Widget for MapSurface<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let viewport = Viewport::around(self.props.center, self.zoom);
        let block = Block::default().borders(Borders::ALL).title(format!(
            " {} · zoom {} ",
            self.props.center, self.zoom
        ));

        let markers = &self.props.markers;
        Canvas::default()
            .block(block)
            .marker(symbols::Marker::Braille)
            .x_bounds(viewport.lng_bounds)
            .y_bounds(viewport.lat_bounds)
            .paint(|ctx| {
                ctx.draw(&Map {
                    resolution: MapResolution::High,
                    color: Color::DarkGray,
                });
                ctx.layer();

                for marker in markers.iter().filter(|m| viewport.contains(m.position)) {
                    ctx.draw(&Points {
                        coords: &[(marker.position.lng, marker.position.lat)],
                        color: Color::Red,
                    });
                    ctx.print(
                        marker.position.lng,
                        marker.position.lat,
                        Line::styled(marker.icon.clone(), Style::default().bold().fg(Color::Red)),
                    );
                }
            })
            .render(area, buf);
    }
}
