//! User actions. Each handler only queues an [`Event`] for the update loop.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::map::MAX_ZOOM;
use crate::preferences::{SpeedUnit, Theme};
use crate::tracker::Event;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectRequest {
    pub id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UnitRequest {
    pub unit: SpeedUnit,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ThemeRequest {
    pub theme: Theme,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ZoomRequest {
    pub zoom: u8,
}

async fn enqueue(state: &AppState, event: Event) -> ApiResult<StatusCode> {
    let tracker = state.tracker.lock().await;
    tracker.send(event)?;
    Ok(StatusCode::ACCEPTED)
}

fn known(state: &AppState, id: &str) -> ApiResult<()> {
    if state.knows(id) {
        Ok(())
    } else {
        Err(ApiError::NotFound(id.to_string()))
    }
}

#[utoipa::path(
    post,
    path = "/api/select",
    request_body = SelectRequest,
    responses(
        (status = 202, description = "Selection queued"),
        (status = 404, description = "Unknown satellite", body = ErrorResponse),
        (status = 503, description = "Tracker not running", body = ErrorResponse)
    ),
    tag = "controls"
)]
pub async fn select(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<StatusCode> {
    known(&state, &request.id)?;
    enqueue(&state, Event::Select(request.id)).await
}

#[utoipa::path(
    post,
    path = "/api/markers/{id}/click",
    params(("id" = String, Path, description = "Satellite id")),
    responses(
        (status = 202, description = "Click queued"),
        (status = 404, description = "Unknown satellite", body = ErrorResponse),
        (status = 503, description = "Tracker not running", body = ErrorResponse)
    ),
    tag = "controls"
)]
pub async fn click_marker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    known(&state, &id)?;
    enqueue(&state, Event::MarkerClick(id)).await
}

#[utoipa::path(
    post,
    path = "/api/map/click",
    responses(
        (status = 202, description = "Click queued"),
        (status = 503, description = "Tracker not running", body = ErrorResponse)
    ),
    tag = "controls"
)]
pub async fn click_map(State(state): State<AppState>) -> ApiResult<StatusCode> {
    enqueue(&state, Event::MapClick).await
}

#[utoipa::path(
    post,
    path = "/api/unit",
    request_body = UnitRequest,
    responses(
        (status = 202, description = "Unit change queued"),
        (status = 503, description = "Tracker not running", body = ErrorResponse)
    ),
    tag = "controls"
)]
pub async fn set_unit(
    State(state): State<AppState>,
    Json(request): Json<UnitRequest>,
) -> ApiResult<StatusCode> {
    enqueue(&state, Event::SetUnit(request.unit)).await
}

#[utoipa::path(
    post,
    path = "/api/theme",
    request_body = ThemeRequest,
    responses(
        (status = 202, description = "Theme change queued"),
        (status = 503, description = "Tracker not running", body = ErrorResponse)
    ),
    tag = "controls"
)]
pub async fn set_theme(
    State(state): State<AppState>,
    Json(request): Json<ThemeRequest>,
) -> ApiResult<StatusCode> {
    enqueue(&state, Event::SetTheme(request.theme)).await
}

#[utoipa::path(
    post,
    path = "/api/theme/cycle",
    responses(
        (status = 202, description = "Theme change queued"),
        (status = 503, description = "Tracker not running", body = ErrorResponse)
    ),
    tag = "controls"
)]
pub async fn cycle_theme(State(state): State<AppState>) -> ApiResult<StatusCode> {
    enqueue(&state, Event::CycleTheme).await
}

#[utoipa::path(
    post,
    path = "/api/zoom",
    request_body = ZoomRequest,
    responses(
        (status = 202, description = "Zoom change queued"),
        (status = 400, description = "Zoom out of range", body = ErrorResponse),
        (status = 503, description = "Tracker not running", body = ErrorResponse)
    ),
    tag = "controls"
)]
pub async fn zoom(
    State(state): State<AppState>,
    Json(request): Json<ZoomRequest>,
) -> ApiResult<StatusCode> {
    if request.zoom > MAX_ZOOM {
        return Err(ApiError::Validation(format!(
            "zoom must be between 0 and {}",
            MAX_ZOOM
        )));
    }
    enqueue(&state, Event::Zoom(request.zoom)).await
}

#[utoipa::path(
    post,
    path = "/api/fullscreen/toggle",
    responses(
        (status = 202, description = "Toggle queued"),
        (status = 503, description = "Tracker not running", body = ErrorResponse)
    ),
    tag = "controls"
)]
pub async fn toggle_fullscreen(State(state): State<AppState>) -> ApiResult<StatusCode> {
    enqueue(&state, Event::ToggleFullscreen).await
}
