use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Position in map container pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Pixel {
    pub x: f64,
    pub y: f64,
}
