use anyhow::Context;
use axum::Router;

use lifelog_api::config::Config;
use lifelog_api::repository::{InMemoryDailyLogRepository, PgDailyLogRepository};
use lifelog_api::services::DailyLogService;
use lifelog_api::{build_router, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifelog_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env()?;

    let app: Router = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url, &config)
                .await
                .context("Failed to connect to the database")?;
            db::migrate(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            let service = DailyLogService::new(PgDailyLogRepository::new(pool));
            build_router(AppState::new(service), &config)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, daily logs are kept in memory only");
            let service = DailyLogService::new(InMemoryDailyLogRepository::new());
            build_router(AppState::new(service), &config)
        }
    };

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
