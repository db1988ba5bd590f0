use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::schemas::HealthEnvelope;
use crate::state::AppState;

/// Health check endpoint
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Server is alive", body = HealthEnvelope))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "environment": state.config.mode,
        "timestamp": Utc::now(),
    }))
}

/// Service index listing the available endpoints
///
/// GET /
pub async fn index() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "User Management API",
        "version": env!("CARGO_PKG_VERSION"),
        "documentation": "/api-docs",
        "endpoints": {
            "users": "/users",
            "health": "/health",
        },
    }))
}

/// Fallback for unmatched routes
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
