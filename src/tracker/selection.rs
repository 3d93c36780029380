use serde::Serialize;
use utoipa::ToSchema;

use crate::map::Pixel;

/// Pixels between a marker and the popup floating above it
pub const POPUP_OFFSET_PX: f64 = 40.0;

/// Info popup floating above a clicked marker
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Popup {
    pub satellite_id: String,
    pub name: String,
    /// Pixels on the tracker's own map viewport (1280x720 for `MarkerBoard`),
    /// taken when the marker was clicked. Browsers with another viewport
    /// anchor their popup to the marker instead.
    pub anchor: Pixel,
}

#[derive(Debug, Clone)]
pub struct Selection {
    current: String,
    popup: Option<Popup>,
}

impl Selection {
    pub fn new(default_id: &str) -> Self {
        Self {
            current: default_id.to_string(),
            popup: None,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.current == id
    }

    /// Returns whether the selection changed.
    pub fn set(&mut self, id: &str) -> bool {
        if self.current == id {
            return false;
        }
        self.current = id.to_string();
        true
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Close the popup if it already belongs to `id`, otherwise open it there.
    /// Returns whether the popup is open afterwards.
    pub fn toggle_popup(&mut self, id: &str, name: &str, marker: Pixel) -> bool {
        if self.popup.as_ref().is_some_and(|p| p.satellite_id == id) {
            self.popup = None;
            return false;
        }
        self.popup = Some(Popup {
            satellite_id: id.to_string(),
            name: name.to_string(),
            anchor: Pixel {
                x: marker.x,
                y: marker.y - POPUP_OFFSET_PX,
            },
        });
        true
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{LatLon, MapView, MarkerBoard};

    const MARKER: Pixel = Pixel { x: 100.0, y: 200.0 };

    #[test]
    fn set_reports_changes_only() {
        let mut selection = Selection::new("iss");
        assert!(!selection.set("iss"));
        assert!(selection.set("starlink-3"));
        assert!(selection.is_selected("starlink-3"));
    }

    #[test]
    fn popup_toggles_per_marker() {
        let mut selection = Selection::new("iss");
        assert!(selection.toggle_popup("iss", "ISS (ZARYA)", MARKER));
        assert_eq!(selection.popup().unwrap().anchor, Pixel { x: 100.0, y: 160.0 });

        // another marker moves the popup
        assert!(selection.toggle_popup("starlink-0", "STARLINK-1007", MARKER));
        assert_eq!(selection.popup().unwrap().satellite_id, "starlink-0");

        // same marker again closes it
        assert!(!selection.toggle_popup("starlink-0", "STARLINK-1007", MARKER));
        assert!(selection.popup().is_none());

        selection.toggle_popup("iss", "ISS (ZARYA)", MARKER);
        selection.close_popup();
        assert!(selection.popup().is_none());
    }

    #[test]
    fn anchor_is_relative_to_the_board_viewport() {
        let position = LatLon::new(51.5, -0.12);
        let mut board = MarkerBoard::with_viewport(800.0, 600.0);
        board.pan_to(position);

        let mut selection = Selection::new("iss");
        selection.toggle_popup("iss", "ISS (ZARYA)", board.project(position));
        let anchor = selection.popup().unwrap().anchor;
        assert!((anchor.x - 400.0).abs() < 1e-6);
        assert!((anchor.y - (300.0 - POPUP_OFFSET_PX)).abs() < 1e-6);

        let default_board = MarkerBoard::default();
        let centered = default_board.project(default_board.center());
        assert!((centered.x - 640.0).abs() < 1e-6);
        assert!((centered.y - 360.0).abs() < 1e-6);
    }
}
