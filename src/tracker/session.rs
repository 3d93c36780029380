use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::catalog::{Catalog, SatelliteRecord};
use crate::map::{Icon, IconKind, MapView, TileLayer};
use crate::preferences::{Preferences, SpeedUnit, Theme};
use crate::tracker::position::Propagator;
use crate::tracker::selection::Selection;
use crate::tracker::trail::Trails;
use crate::tracker::types::{Event, Position, Telemetry, TickReport, ViewState};
use crate::tracker::TrackerError;

/// Everything the map page shows, mutated only through the methods below.
pub struct Session<P> {
    catalog: Arc<Catalog>,
    propagator: P,
    primary_id: String,
    trails: Trails,
    selection: Selection,
    preferences: Preferences,
    unit: SpeedUnit,
    theme: Theme,
    telemetry: Option<Telemetry>,
    panel_visible: bool,
    fullscreen: bool,
}

impl<P: Propagator> Session<P> {
    pub fn new(
        catalog: Arc<Catalog>,
        propagator: P,
        primary_id: &str,
        trail_length: usize,
        preferences: Preferences,
    ) -> Self {
        Self {
            catalog,
            propagator,
            primary_id: primary_id.to_string(),
            trails: Trails::new(trail_length),
            selection: Selection::new(primary_id),
            unit: preferences.unit(),
            theme: preferences.theme(),
            preferences,
            telemetry: None,
            panel_visible: false,
            fullscreen: false,
        }
    }

    pub fn selected(&self) -> &str {
        self.selection.current()
    }

    pub fn telemetry(&self) -> Option<&Telemetry> {
        self.telemetry.as_ref()
    }

    pub fn trails(&self) -> &Trails {
        &self.trails
    }

    pub fn unit(&self) -> SpeedUnit {
        self.unit
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Reapply the persisted theme to a fresh map.
    pub fn attach(&self, map: &mut impl MapView) {
        map.set_tile_layer(TileLayer::for_theme(self.theme));
    }

    /// Move every satellite to its position at `now`.
    ///
    /// A satellite that fails to resolve is skipped for this tick only.
    pub fn tick(&mut self, now: DateTime<Utc>, map: &mut impl MapView) -> TickReport {
        let catalog = Arc::clone(&self.catalog);
        let mut report = TickReport::default();

        for record in catalog.records() {
            let position = match self.propagator.resolve(&record.element_set, now) {
                Ok(position) => position,
                Err(e) => {
                    log::debug!("Skipping {} this tick: {}", record.id, e);
                    report.skipped.push(record.id.clone());
                    continue;
                }
            };

            self.track(record, &position, map);
            if self.selection.is_selected(&record.id) {
                self.show(record, &position, now, map);
            }
            report.updated.push(record.id.clone());
        }

        report
    }

    fn track(&mut self, record: &SatelliteRecord, position: &Position, map: &mut impl MapView) {
        let point = position.lat_lon();
        let trail = if map.has_marker(&record.id) {
            map.set_marker_position(&record.id, point);
            self.trails.append(&record.id, point)
        } else {
            let icon = Icon::scaled(self.icon_kind(&record.id), map.zoom());
            map.create_marker(&record.id, &record.name, point, &icon);
            self.trails.start(&record.id, point)
        };
        map.draw_path(&record.id, &trail.points());
    }

    fn show(
        &mut self,
        record: &SatelliteRecord,
        position: &Position,
        now: DateTime<Utc>,
        map: &mut impl MapView,
    ) {
        map.pan_to(position.lat_lon());
        self.telemetry = Some(Telemetry::new(
            &record.id,
            &record.name,
            position,
            self.unit,
            now,
        ));
    }

    fn icon_kind(&self, id: &str) -> IconKind {
        if id == self.primary_id {
            IconKind::Station
        } else {
            IconKind::Constellation
        }
    }

    pub fn dispatch(
        &mut self,
        event: Event,
        now: DateTime<Utc>,
        map: &mut impl MapView,
    ) -> Result<(), TrackerError> {
        match event {
            Event::Select(id) => self.select(&id, now, map)?,
            Event::MarkerClick(id) => self.click_marker(&id, now, map)?,
            Event::MapClick => self.click_map(),
            Event::SetUnit(unit) => self.set_unit(unit),
            Event::SetTheme(theme) => self.set_theme(theme, map),
            Event::CycleTheme => self.cycle_theme(map),
            Event::ToggleFullscreen => self.toggle_fullscreen(),
            Event::Zoom(zoom) => self.zoom_changed(zoom, map),
        }
        Ok(())
    }

    /// Select a satellite and refresh its telemetry right away. Trails are
    /// left alone; they only grow on ticks.
    pub fn select(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
        map: &mut impl MapView,
    ) -> Result<(), TrackerError> {
        let catalog = Arc::clone(&self.catalog);
        let record = catalog
            .get(id)
            .ok_or_else(|| TrackerError::UnknownSatellite(id.to_string()))?;

        if self.selection.set(id) {
            log::info!("Selected {} ({})", record.name, record.id);
        }

        match self.propagator.resolve(&record.element_set, now) {
            Ok(position) => self.show(record, &position, now, map),
            Err(e) => {
                log::debug!("Cannot refresh telemetry for {}: {}", id, e);
                if self.telemetry.as_ref().is_some_and(|t| t.satellite_id != id) {
                    self.telemetry = None;
                }
            }
        }
        Ok(())
    }

    pub fn click_marker(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
        map: &mut impl MapView,
    ) -> Result<(), TrackerError> {
        let name = self
            .catalog
            .get(id)
            .map(|r| r.name.clone())
            .ok_or_else(|| TrackerError::UnknownSatellite(id.to_string()))?;
        let position = map
            .marker_position(id)
            .ok_or_else(|| TrackerError::MarkerNotFound(id.to_string()))?;

        self.selection.toggle_popup(id, &name, map.project(position));
        self.panel_visible = true;
        self.select(id, now, map)
    }

    pub fn click_map(&mut self) {
        self.selection.close_popup();
    }

    pub fn set_unit(&mut self, unit: SpeedUnit) {
        self.unit = unit;
        if let Err(e) = self.preferences.set_unit(unit) {
            log::warn!("Failed to persist speed unit: {}", e);
        }
        if let Some(telemetry) = self.telemetry.take() {
            let position = Position {
                latitude_deg: telemetry.latitude_deg,
                longitude_deg: telemetry.longitude_deg,
                altitude_m: telemetry.altitude_km * 1000.0,
                speed_kmh: telemetry.unit.to_kmh(telemetry.speed),
            };
            self.telemetry = Some(Telemetry::new(
                &telemetry.satellite_id,
                &telemetry.name,
                &position,
                unit,
                telemetry.timestamp,
            ));
        }
    }

    pub fn set_theme(&mut self, theme: Theme, map: &mut impl MapView) {
        self.theme = theme;
        if let Err(e) = self.preferences.set_theme(theme) {
            log::warn!("Failed to persist theme: {}", e);
        }
        map.set_tile_layer(TileLayer::for_theme(theme));
    }

    pub fn cycle_theme(&mut self, map: &mut impl MapView) {
        self.set_theme(self.theme.next(), map);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    /// Rescale every marker icon for the new zoom level.
    pub fn zoom_changed(&mut self, zoom: u8, map: &mut impl MapView) {
        map.set_zoom(zoom);
        let zoom = map.zoom();
        for id in map.marker_ids() {
            let icon = Icon::scaled(self.icon_kind(&id), zoom);
            map.set_marker_icon(&id, &icon);
        }
    }

    pub fn view_state(&self, map: &impl MapView) -> ViewState {
        ViewState {
            center: map.center(),
            zoom: map.zoom(),
            selected: self.selection.current().to_string(),
            unit: self.unit,
            theme: self.theme,
            body_class: self.theme.body_class().to_string(),
            tile_layer: TileLayer::for_theme(self.theme),
            popup: self.selection.popup().cloned(),
            panel_visible: self.panel_visible,
            fullscreen: self.fullscreen,
            fullscreen_icon: if self.fullscreen {
                "fa-eye-slash"
            } else {
                "fa-eye"
            }
            .to_string(),
        }
    }
}
