use axum::{extract::State, Json};

use crate::map::MarkerView;
use crate::tracker::{Telemetry, TrackerMode, ViewState};
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/tracker/mode",
    responses(
        (status = 200, description = "Tracker mode", body = TrackerMode)
    ),
    tag = "tracker"
)]
pub async fn status_mode(State(state): State<AppState>) -> Json<TrackerMode> {
    let tracker = state.tracker.lock().await;
    Json(tracker.status().mode)
}

#[utoipa::path(
    post,
    path = "/api/tracker/stop",
    responses(
        (status = 200, description = "Tracker stopped", body = TrackerMode)
    ),
    tag = "tracker"
)]
pub async fn stop(State(state): State<AppState>) -> Json<TrackerMode> {
    let mut tracker = state.tracker.lock().await;
    tracker.stop().await;
    Json(tracker.status().mode)
}

#[utoipa::path(
    get,
    path = "/api/markers",
    responses(
        (status = 200, description = "Markers with their trails", body = Vec<MarkerView>)
    ),
    tag = "tracker"
)]
pub async fn markers(State(state): State<AppState>) -> Json<Vec<MarkerView>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.status().markers)
}

#[utoipa::path(
    get,
    path = "/api/telemetry",
    responses(
        (status = 200, description = "Telemetry of the selected satellite", body = Option<Telemetry>)
    ),
    tag = "tracker"
)]
pub async fn telemetry(State(state): State<AppState>) -> Json<Option<Telemetry>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.status().telemetry)
}

#[utoipa::path(
    get,
    path = "/api/view",
    responses(
        (status = 200, description = "Map view, selection and preferences", body = Option<ViewState>)
    ),
    tag = "tracker"
)]
pub async fn view(State(state): State<AppState>) -> Json<Option<ViewState>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.status().view)
}
