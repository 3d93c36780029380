use crate::map::icon::Icon;
use crate::map::layer::TileLayer;
use crate::map::types::{LatLon, Pixel};

/// What the update loop and the interaction handlers need from a map.
///
/// The map owns marker state; callers only refer to markers by satellite id.
pub trait MapView {
    fn has_marker(&self, id: &str) -> bool;
    fn marker_ids(&self) -> Vec<String>;
    fn marker_position(&self, id: &str) -> Option<LatLon>;
    fn create_marker(&mut self, id: &str, name: &str, position: LatLon, icon: &Icon);
    fn set_marker_position(&mut self, id: &str, position: LatLon);
    fn set_marker_icon(&mut self, id: &str, icon: &Icon);
    fn draw_path(&mut self, id: &str, points: &[LatLon]);
    fn pan_to(&mut self, position: LatLon);
    fn center(&self) -> LatLon;
    fn project(&self, position: LatLon) -> Pixel;
    fn zoom(&self) -> u8;
    fn set_zoom(&mut self, zoom: u8);
    fn set_tile_layer(&mut self, layer: TileLayer);
}
