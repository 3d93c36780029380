use utoipa::OpenApi;

use super::api::controls::{SelectRequest, ThemeRequest, UnitRequest, ZoomRequest};
use super::api::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::satellites::list_satellites,
        super::api::tracker::status_mode,
        super::api::tracker::stop,
        super::api::tracker::markers,
        super::api::tracker::telemetry,
        super::api::tracker::view,
        super::api::controls::select,
        super::api::controls::click_marker,
        super::api::controls::click_map,
        super::api::controls::set_unit,
        super::api::controls::set_theme,
        super::api::controls::cycle_theme,
        super::api::controls::zoom,
        super::api::controls::toggle_fullscreen,
    ),
    components(
        schemas(
            ErrorResponse,
            SelectRequest,
            UnitRequest,
            ThemeRequest,
            ZoomRequest,
            crate::catalog::SatelliteChoice,
            crate::map::MarkerView,
            crate::map::Icon,
            crate::map::IconKind,
            crate::map::LatLon,
            crate::map::Pixel,
            crate::map::TileLayer,
            crate::preferences::SpeedUnit,
            crate::preferences::Theme,
            crate::tracker::Popup,
            crate::tracker::Telemetry,
            crate::tracker::TrackerMode,
            crate::tracker::ViewState,
        )
    ),
    info(
        title = "Groundtrack API",
        description = "Live satellite positions, trails and map controls",
        version = "0.1.0"
    ),
    tags(
        (name = "satellites", description = "Loaded satellite catalog"),
        (name = "tracker", description = "Update loop state"),
        (name = "controls", description = "User actions applied by the update loop")
    )
)]
pub struct ApiDoc;
