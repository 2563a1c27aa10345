//! Health, status, and provisioning control.
//!
//! - `GET /health`
//! - `GET /api/v1/status`
//! - `POST /api/v1/provision`
//! - `POST /api/v1/reset`

use axum::{extract::State, Json};
use serde_json::json;
use tracing::warn;

use crate::state::{AppState, StatusSnapshot};
use crate::ApiError;

/// Liveness, provider reachability, and readiness to answer questions.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let provider = state.ctx.backend.health_check().await.unwrap_or_else(|e| {
        warn!(subsystem = "api", component = "health", error = %e, "Provider check failed");
        false
    });
    let snapshot = state.snapshot().await;
    Json(json!({
        "status": if provider { "healthy" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "provider": provider,
        "ready": snapshot.ready,
    }))
}

pub async fn status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.snapshot().await)
}

/// Rerun provisioning. Failures are reported and can be retried.
pub async fn provision(State(state): State<AppState>) -> Result<Json<StatusSnapshot>, ApiError> {
    state.provision().await?;
    Ok(Json(state.snapshot().await))
}

/// Clear the cached ids so the next provisioning creates new resources.
pub async fn reset(State(state): State<AppState>) -> Result<Json<StatusSnapshot>, ApiError> {
    state.reset().await?;
    Ok(Json(state.snapshot().await))
}
