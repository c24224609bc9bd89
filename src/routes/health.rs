use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::routes::AppState;

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// GET /ready - Readiness probe
///
/// Ready once the habit store answers a full read.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.load_all().await {
        Ok(_) => (StatusCode::OK, Json(json!({"status": "ready"}))),
        Err(e) => {
            tracing::error!("Readiness check failed: store unavailable - {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "reason": "store_unavailable"
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habitrack_core::SystemClock;
    use habitrack_habit::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_endpoint_with_memory_store() {
        let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock));

        let response = ready(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
