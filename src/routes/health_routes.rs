use axum::{extract::State, http::StatusCode, response::Response, Json};

use super::plain;
use crate::state::SharedState;

/// Readiness check: the session store must answer.
pub async fn readiness(State(state): State<SharedState>) -> Response {
    if state.engine.store().health_check().await {
        plain(StatusCode::OK, "ready")
    } else {
        tracing::warn!(
            backend = state.engine.store().name(),
            "readiness check failed: session store unreachable"
        );
        plain(StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

/// Liveness check.
pub async fn liveness() -> Response {
    plain(StatusCode::OK, "alive")
}

pub async fn health(State(state): State<SharedState>) -> Json<serde_json::Value> {
    let store = state.engine.store();
    let status = if store.health_check().await {
        "ok"
    } else {
        "degraded"
    };
    Json(serde_json::json!({
        "status": status,
        "service": env!("CARGO_PKG_NAME"),
        "store": store.name(),
        "checked_at": chrono::Utc::now().to_rfc3339(),
    }))
}
