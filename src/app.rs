use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers;
use crate::repository::DailyLogRepository;
use crate::services::DailyLogService;

pub struct AppState<R> {
    pub daily_logs: Arc<DailyLogService<R>>,
}

impl<R> AppState<R> {
    pub fn new(daily_logs: DailyLogService<R>) -> Self {
        Self {
            daily_logs: Arc::new(daily_logs),
        }
    }
}

// Derived Clone would require `R: Clone`.
impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            daily_logs: Arc::clone(&self.daily_logs),
        }
    }
}

pub fn build_router<R>(state: AppState<R>, config: &Config) -> Router
where
    R: DailyLogRepository + 'static,
{
    use handlers::daily_logs::{
        delete_daily_log, get_daily_log, list_monthly_daily_logs, register_daily_log,
        update_daily_log,
    };

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz::<R>))
        .route("/api/daily-logs", post(register_daily_log::<R>))
        .route(
            "/api/daily-logs/:user_id/:log_date",
            get(get_daily_log::<R>)
                .put(update_daily_log::<R>)
                .delete(delete_daily_log::<R>),
        )
        .route(
            "/api/daily-logs/:user_id/months/:year_month",
            get(list_monthly_daily_logs::<R>),
        )
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::repository::InMemoryDailyLogRepository;

    fn test_config() -> Config {
        Config {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: vec!["not a header\u{7f}".into()],
            db_max_connections: 1,
            db_acquire_timeout_secs: 1,
        }
    }

    fn app() -> Router {
        let state = AppState::new(DailyLogService::new(InMemoryDailyLogRepository::new()));
        build_router(state, &test_config())
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_service_name() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["service"], "lifelog-api");
    }

    #[tokio::test]
    async fn test_readyz_with_memory_engine() {
        let response = app()
            .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app()
            .oneshot(Request::get("/api/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
