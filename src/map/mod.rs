mod board;
mod icon;
mod layer;
mod types;
mod view;

pub use board::{MarkerBoard, MarkerView, DEFAULT_ZOOM, MAX_ZOOM};
pub use icon::{Icon, IconKind};
pub use layer::TileLayer;
pub use types::{LatLon, Pixel};
pub use view::MapView;
