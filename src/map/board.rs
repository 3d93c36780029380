use std::collections::HashMap;
use std::f64::consts::PI;

use serde::Serialize;
use utoipa::ToSchema;

use crate::map::icon::Icon;
use crate::map::layer::TileLayer;
use crate::map::types::{LatLon, Pixel};
use crate::map::view::MapView;
use crate::preferences::Theme;

pub const DEFAULT_ZOOM: u8 = 3;
pub const MAX_ZOOM: u8 = 19;
const TILE_SIZE: f64 = 256.0;
const MAX_SIN_LAT: f64 = 0.9999;

/// A marker as the map page draws it
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MarkerView {
    pub id: String,
    pub name: String,
    pub position: LatLon,
    pub icon: Icon,
    pub trail: Vec<LatLon>,
}

#[derive(Debug, Clone)]
struct Marker {
    name: String,
    position: LatLon,
    icon: Icon,
}

/// In-memory map scene, snapshotted for the web page.
#[derive(Debug, Clone)]
pub struct MarkerBoard {
    order: Vec<String>,
    markers: HashMap<String, Marker>,
    paths: HashMap<String, Vec<LatLon>>,
    center: LatLon,
    zoom: u8,
    viewport: (f64, f64),
    layer: TileLayer,
}

impl Default for MarkerBoard {
    fn default() -> Self {
        Self::with_viewport(1280.0, 720.0)
    }
}

impl MarkerBoard {
    pub fn with_viewport(width: f64, height: f64) -> Self {
        Self {
            order: Vec::new(),
            markers: HashMap::new(),
            paths: HashMap::new(),
            center: LatLon::new(0.0, 0.0),
            zoom: DEFAULT_ZOOM,
            viewport: (width, height),
            layer: TileLayer::for_theme(Theme::default()),
        }
    }

    pub fn layer(&self) -> &TileLayer {
        &self.layer
    }

    pub fn path(&self, id: &str) -> Option<&[LatLon]> {
        self.paths.get(id).map(Vec::as_slice)
    }

    pub fn icon(&self, id: &str) -> Option<&Icon> {
        self.markers.get(id).map(|m| &m.icon)
    }

    /// Markers in creation order, each with its current trail
    pub fn markers(&self) -> Vec<MarkerView> {
        self.order
            .iter()
            .filter_map(|id| {
                let marker = self.markers.get(id)?;
                Some(MarkerView {
                    id: id.clone(),
                    name: marker.name.clone(),
                    position: marker.position,
                    icon: marker.icon.clone(),
                    trail: self.paths.get(id).cloned().unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Web Mercator world pixel at the current zoom
    fn world_pixel(&self, position: LatLon) -> Pixel {
        let scale = TILE_SIZE * 2f64.powi(self.zoom as i32);
        let sin_lat = position.lat.to_radians().sin().clamp(-MAX_SIN_LAT, MAX_SIN_LAT);
        Pixel {
            x: (position.lon + 180.0) / 360.0 * scale,
            y: (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * scale,
        }
    }
}

impl MapView for MarkerBoard {
    fn has_marker(&self, id: &str) -> bool {
        self.markers.contains_key(id)
    }

    fn marker_ids(&self) -> Vec<String> {
        self.order.clone()
    }

    fn marker_position(&self, id: &str) -> Option<LatLon> {
        self.markers.get(id).map(|m| m.position)
    }

    fn create_marker(&mut self, id: &str, name: &str, position: LatLon, icon: &Icon) {
        let marker = Marker {
            name: name.to_string(),
            position,
            icon: icon.clone(),
        };
        if self.markers.insert(id.to_string(), marker).is_none() {
            self.order.push(id.to_string());
        }
    }

    fn set_marker_position(&mut self, id: &str, position: LatLon) {
        if let Some(marker) = self.markers.get_mut(id) {
            marker.position = position;
        }
    }

    fn set_marker_icon(&mut self, id: &str, icon: &Icon) {
        if let Some(marker) = self.markers.get_mut(id) {
            marker.icon = icon.clone();
        }
    }

    fn draw_path(&mut self, id: &str, points: &[LatLon]) {
        self.paths.insert(id.to_string(), points.to_vec());
    }

    fn pan_to(&mut self, position: LatLon) {
        self.center = position;
    }

    fn center(&self) -> LatLon {
        self.center
    }

    fn project(&self, position: LatLon) -> Pixel {
        let point = self.world_pixel(position);
        let origin = self.world_pixel(self.center);
        Pixel {
            x: point.x - origin.x + self.viewport.0 / 2.0,
            y: point.y - origin.y + self.viewport.1 / 2.0,
        }
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.min(MAX_ZOOM);
    }

    fn set_tile_layer(&mut self, layer: TileLayer) {
        self.layer = layer;
    }
}
