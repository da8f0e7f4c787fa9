use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::repository::DailyLogRepository;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "lifelog-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn readyz<R: DailyLogRepository>(
    State(state): State<AppState<R>>,
) -> (StatusCode, Json<Value>) {
    match state.daily_logs.repository().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "checks": { "storage": "ok" },
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "checks": { "storage": "failed" },
                })),
            )
        }
    }
}
