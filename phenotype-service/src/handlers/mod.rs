//! HTTP handlers for phenotype-service.

pub mod prediction;

use crate::dtos::MessageResponse;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// GET /
pub async fn read_root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "The API is working".to_string(),
    })
}

/// Liveness probe. The model is loaded before the listener opens, so a
/// running process is a healthy one.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": state.config.service_name,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

pub async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ready" })))
}

pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::get_metrics()
}

pub async fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Endpoint not found"))
}
