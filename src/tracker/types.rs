use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::map::{LatLon, TileLayer};
use crate::preferences::{SpeedUnit, Theme};
use crate::tracker::selection::Popup;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Position {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
    pub speed_kmh: f64,
}

impl Position {
    pub fn lat_lon(&self) -> LatLon {
        LatLon::new(self.latitude_deg, self.longitude_deg)
    }
}

/// Readout for the selected satellite
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Telemetry {
    pub satellite_id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
    pub speed: f64,
    pub unit: SpeedUnit,
    pub text: String,
}

impl Telemetry {
    pub fn new(
        satellite_id: &str,
        name: &str,
        position: &Position,
        unit: SpeedUnit,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let mut telemetry = Telemetry {
            satellite_id: satellite_id.to_string(),
            name: name.to_string(),
            timestamp,
            latitude_deg: position.latitude_deg,
            longitude_deg: position.longitude_deg,
            altitude_km: position.altitude_m / 1000.0,
            speed: unit.convert_kmh(position.speed_kmh),
            unit,
            text: String::new(),
        };
        telemetry.text = telemetry.to_string();
        telemetry
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lat: {:.2}", self.latitude_deg)?;
        writeln!(f, "Lon: {:.2}", self.longitude_deg)?;
        writeln!(f, "Alt: {:.2} km", self.altitude_km)?;
        write!(f, "Vel: {:.2} {}", self.speed, self.unit.label())
    }
}

/// User actions, applied one at a time by the update loop
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Select(String),
    MarkerClick(String),
    MapClick,
    SetUnit(SpeedUnit),
    SetTheme(Theme),
    CycleTheme,
    ToggleFullscreen,
    Zoom(u8),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ViewState {
    pub center: LatLon,
    pub zoom: u8,
    pub selected: String,
    pub unit: SpeedUnit,
    pub theme: Theme,
    pub body_class: String,
    pub tile_layer: TileLayer,
    pub popup: Option<Popup>,
    pub panel_visible: bool,
    pub fullscreen: bool,
    pub fullscreen_icon: String,
}

/// Outcome of one pass over the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
}
