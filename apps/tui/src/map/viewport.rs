use census_map_core::LatLng;
use ratatui::layout::Rect;

pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 12;
const PAN_STEP: f64 = 0.1;
const MAX_LAT: f64 = 85.0;

/// Longitude covered by the map pane at zoom 0.
const BASE_LNG_SPAN: f64 = 960.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Bounds {
    pub fn contains(&self, at: LatLng) -> bool {
        (self.west..=self.east).contains(&at.lng) && (self.south..=self.north).contains(&at.lat)
    }
}

/// Equirectangular view onto the map pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    pub fn lng_span(&self) -> f64 {
        (BASE_LNG_SPAN / 2f64.powi(i32::from(self.zoom))).min(360.0)
    }

    /// Visible extent for a pane of `width` x `height` cells. Terminal cells are
    /// about twice as tall as they are wide.
    pub fn bounds(&self, width: u16, height: u16) -> Bounds {
        let lng_span = self.lng_span();
        let lat_span = if width == 0 {
            0.0
        } else {
            lng_span * 2.0 * f64::from(height) / f64::from(width)
        };

        Bounds {
            west: self.center.lng - lng_span / 2.0,
            east: self.center.lng + lng_span / 2.0,
            south: self.center.lat - lat_span / 2.0,
            north: self.center.lat + lat_span / 2.0,
        }
    }

    /// Coordinate under the middle of a terminal cell, if the cell is inside `area`.
    pub fn cell_to_latlng(&self, area: Rect, column: u16, row: u16) -> Option<LatLng> {
        if area.width == 0 || area.height == 0 || !area.contains((column, row).into()) {
            return None;
        }

        let bounds = self.bounds(area.width, area.height);
        let x = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let y = (f64::from(row - area.y) + 0.5) / f64::from(area.height);

        Some(LatLng::new(
            bounds.north - y * (bounds.north - bounds.south),
            bounds.west + x * (bounds.east - bounds.west),
        ))
    }

    pub fn latlng_to_cell(&self, area: Rect, at: LatLng) -> Option<(u16, u16)> {
        let bounds = self.bounds(area.width, area.height);
        if area.width == 0 || area.height == 0 || !bounds.contains(at) {
            return None;
        }

        let x = (at.lng - bounds.west) / (bounds.east - bounds.west);
        let y = (bounds.north - at.lat) / (bounds.north - bounds.south);
        let column = (x * f64::from(area.width)).floor().min(f64::from(area.width - 1));
        let row = (y * f64::from(area.height)).floor().min(f64::from(area.height - 1));

        Some((area.x + column as u16, area.y + row as u16))
    }

    /// Moves by a tenth of the visible longitude span per step.
    pub fn pan(&mut self, east_steps: i32, north_steps: i32) {
        let step = self.lng_span() * PAN_STEP;
        let lng = self.center.lng + f64::from(east_steps) * step;
        let lat = self.center.lat + f64::from(north_steps) * step;

        self.center = LatLng::new(
            lat.clamp(-MAX_LAT, MAX_LAT),
            (lng + 180.0).rem_euclid(360.0) - 180.0,
        );
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }
}
