use axum::{extract::State, response::IntoResponse};

use crate::preferences::Theme;
use crate::web::state::AppState;

use super::templates::MapTemplate;

pub async fn map(State(state): State<AppState>) -> impl IntoResponse {
    let view = state.tracker.lock().await.status().view;
    let satellites = state
        .catalog
        .as_ref()
        .map(|catalog| catalog.choices())
        .unwrap_or_default();

    let (selected, body_class) = match view {
        Some(view) => (view.selected, view.body_class),
        None => (
            state.config.tracker.primary_id.clone(),
            Theme::default().body_class().to_string(),
        ),
    };

    MapTemplate {
        satellites,
        selected,
        body_class,
        poll_ms: state.config.tracker.update_interval.as_millis(),
        loaded: state.catalog.is_some(),
    }
}
