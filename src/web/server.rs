use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::Catalog;
use crate::tracker::Tracker;

use super::api::controls as control_handlers;
use super::api::satellites as satellite_handlers;
use super::api::tracker as tracker_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;
use super::ui::handlers as ui_handlers;

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let mut tracker = Tracker::new(config.tracker_settings());

    // A failed load leaves the tracker idle and the map empty
    let catalog = match Catalog::load(
        &config.sources.primary,
        &config.sources.bulk,
        &config.naming(),
    )
    .await
    {
        Ok(catalog) => Some(Arc::new(catalog)),
        Err(e) => {
            log::error!("Failed to load satellites: {}", e);
            None
        }
    };

    if let Some(catalog) = &catalog {
        if let Err(e) = tracker.start(catalog.clone(), config.open_preferences()) {
            log::error!("Failed to start tracker: {}", e);
        }
    }

    let state = AppState {
        config: Arc::new(config),
        tracker: Arc::new(Mutex::new(tracker)),
        catalog,
    };

    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let static_dir = state.config.web.static_dir.clone();

    Router::new()
        // UI routes
        .route("/", get(ui_handlers::map))
        // Read API
        .route("/api/satellites", get(satellite_handlers::list_satellites))
        .route("/api/tracker/mode", get(tracker_handlers::status_mode))
        .route("/api/tracker/stop", post(tracker_handlers::stop))
        .route("/api/markers", get(tracker_handlers::markers))
        .route("/api/telemetry", get(tracker_handlers::telemetry))
        .route("/api/view", get(tracker_handlers::view))
        // Controls
        .route("/api/select", post(control_handlers::select))
        .route(
            "/api/markers/{id}/click",
            post(control_handlers::click_marker),
        )
        .route("/api/map/click", post(control_handlers::click_map))
        .route("/api/unit", post(control_handlers::set_unit))
        .route("/api/theme", post(control_handlers::set_theme))
        .route("/api/theme/cycle", post(control_handlers::cycle_theme))
        .route("/api/zoom", post(control_handlers::zoom))
        .route(
            "/api/fullscreen/toggle",
            post(control_handlers::toggle_fullscreen),
        )
        // Static files
        .nest_service("/static", ServeDir::new(static_dir))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::catalog::Naming;
    use crate::preferences::Preferences;
    use crate::web::config::PreferencesConfig;

    fn config() -> Config {
        Config {
            preferences: PreferencesConfig { path: None },
            ..Config::default()
        }
    }

    /// State after a failed load: no catalog, tracker idle
    fn idle_state() -> AppState {
        let config = config();
        AppState {
            tracker: Arc::new(Mutex::new(Tracker::new(config.tracker_settings()))),
            config: Arc::new(config),
            catalog: None,
        }
    }

    fn running_state() -> AppState {
        let config = config();
        let catalog = Arc::new(
            Catalog::from_texts("ISS\nl1\nl2", "A\nl1\nl2", &Naming::default()).unwrap(),
        );
        let mut tracker = Tracker::new(config.tracker_settings());
        tracker
            .start(catalog.clone(), Preferences::in_memory())
            .unwrap();
        AppState {
            tracker: Arc::new(Mutex::new(tracker)),
            config: Arc::new(config),
            catalog: Some(catalog),
        }
    }

    async fn call(state: &AppState, method: &str, uri: &str, body: Option<&str>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        router(state.clone())
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn failed_load_serves_an_empty_map() {
        let state = idle_state();

        let response = call(&state, "GET", "/api/satellites", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await, serde_json::json!([]));

        let response = call(&state, "GET", "/api/markers", None).await;
        assert_eq!(json(response).await, serde_json::json!([]));

        let response = call(&state, "GET", "/api/tracker/mode", None).await;
        assert_eq!(json(response).await, serde_json::json!("Idle"));
    }

    #[tokio::test]
    async fn controls_need_a_running_tracker() {
        let state = idle_state();

        let response = call(&state, "POST", "/api/map/click", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json(response).await["error"], "tracker_not_running");

        let response = call(&state, "POST", "/api/unit", Some(r#"{"unit":"mph"}"#)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unknown_satellite_is_not_found_and_not_queued() {
        let state = running_state();

        let response = call(&state, "POST", "/api/select", Some(r#"{"id":"starlink-9"}"#)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["message"], "starlink-9");

        let response = call(&state, "POST", "/api/markers/starlink-9/click", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let view = state.tracker.lock().await.status().view.unwrap();
        assert_eq!(view.selected, "iss");
        assert!(!view.panel_visible);
    }

    #[tokio::test]
    async fn zoom_above_the_maximum_is_rejected() {
        let state = running_state();

        let response = call(&state, "POST", "/api/zoom", Some(r#"{"zoom":42}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["error"], "validation_failed");

        let response = call(&state, "POST", "/api/zoom", Some(r#"{"zoom":5}"#)).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn accepted_controls_reach_the_update_loop() {
        let state = running_state();

        let response = call(&state, "POST", "/api/select", Some(r#"{"id":"starlink-0"}"#)).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let response = call(&state, "POST", "/api/theme/cycle", None).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let mut selected = String::new();
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let response = call(&state, "GET", "/api/view", None).await;
            let view = json(response).await;
            selected = view["selected"].as_str().unwrap_or_default().to_string();
            if selected == "starlink-0" && view["theme"] == "dark" {
                break;
            }
        }
        assert_eq!(selected, "starlink-0");

        let response = call(&state, "POST", "/api/tracker/stop", None).await;
        assert_eq!(json(response).await, serde_json::json!("Idle"));
        let response = call(&state, "POST", "/api/map/click", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
