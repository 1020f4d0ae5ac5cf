use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use timeline_service::config::Config;
use timeline_service::handlers::{self, AppState};
use timeline_service::repository::{
    FollowRepository, PostLikeRepository, PostRepository, TimelineRepository,
};
use timeline_service::store::memory::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting timeline-service");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        env = %config.app.env,
        port = config.app.port,
        "Configuration loaded"
    );

    let state = match &config.database.url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(10))
                .connect(url)
                .await
                .context("Failed to connect to database")?;

            sqlx::query("SELECT 1")
                .execute(&pool)
                .await
                .context("Failed to verify database connection")?;
            info!("Database pool created and verified");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            info!("Database migrations completed");

            timeline_service::build_state(
                Arc::new(PostRepository::new(pool.clone())),
                Arc::new(TimelineRepository::new(pool.clone())),
                Arc::new(PostLikeRepository::new(pool.clone())),
                Arc::new(FollowRepository::new(pool)),
                &config.feed,
            )
        }
        None => {
            warn!("DATABASE_URL not set; running on the in-memory store (data is not durable)");
            let store = Arc::new(MemoryStore::new());
            timeline_service::build_state(
                store.clone(),
                store.clone(),
                store.clone(),
                store,
                &config.feed,
            )
        }
    };

    let bind_addr = format!("{}:{}", config.app.host, config.app.port);
    info!(%bind_addr, "HTTP server listening");

    run_http_server(state, &bind_addr).await?;

    info!("timeline-service stopped");
    Ok(())
}

async fn run_http_server(state: AppState, bind_addr: &str) -> Result<()> {
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure)
    })
    .bind(bind_addr)
    .with_context(|| format!("Failed to bind {bind_addr}"))?
    .run()
    .await
    .context("HTTP server error")
}
