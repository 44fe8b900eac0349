use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "ask-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness probe: ready once the knowledge file can be loaded.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.ask_service.load_knowledge().await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unavailable",
                "error": e.to_string()
            })),
        ),
    }
}
