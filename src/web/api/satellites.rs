use axum::{extract::State, Json};

use crate::catalog::SatelliteChoice;
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/satellites",
    responses(
        (status = 200, description = "Satellites in load order", body = Vec<SatelliteChoice>)
    ),
    tag = "satellites"
)]
pub async fn list_satellites(State(state): State<AppState>) -> Json<Vec<SatelliteChoice>> {
    let choices = state
        .catalog
        .as_ref()
        .map(|catalog| catalog.choices())
        .unwrap_or_default();
    Json(choices)
}
