//! PayGate server entry point.
//!
//! # Startup Flow
//!
//! 1. Initialize logging
//! 2. Load configuration from environment variables
//! 3. Open storage (postgres pool + migrations, or in-memory)
//! 4. Build HTTP router
//! 5. Start server on configured port

use std::sync::Arc;

use anyhow::Context;
use paygate::{
    config::{Config, StorageBackend},
    db, routes,
    state::AppState,
    storage::{MemoryStorage, PgStorage, Storage},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(backend = ?config.storage_backend, "Configuration loaded");

    let storage = open_storage(&config).await?;

    let app = routes::router(AppState::new(storage, &config));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_storage(config: &Config) -> anyhow::Result<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres storage backend")?;

            let pool = db::create_pool(database_url, config.db_max_connections).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Ok(Arc::new(PgStorage::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data will not survive a restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
