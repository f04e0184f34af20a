//! HTTP server initialization and runtime setup.
//!
//! Builds the configured record source and runs the Axum server until a
//! shutdown signal arrives.

use crate::config::{Config, DataSource};
use crate::domain::repositories::SurveyRepository;
use crate::infrastructure::files::CsvSurveyRepository;
use crate::infrastructure::persistence::PgSurveyRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens a PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Returns an error if the URL is missing or the connection fails.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres source")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Builds the record source selected by `DATA_SOURCE`.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or migrated.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn SurveyRepository>> {
    match config.data_source {
        DataSource::Csv => {
            tracing::info!(dir = %config.data_dir.display(), "Using CSV record source");
            Ok(Arc::new(CsvSurveyRepository::new(config.data_dir.clone())))
        }
        DataSource::Postgres => {
            let pool = connect_pool(config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to migrate")?;

            Ok(Arc::new(PgSurveyRepository::new(Arc::new(pool))))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The record source cannot be set up
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;

    if let Err(e) = repository.ping().await {
        tracing::warn!(error = %e, "Record source not reachable yet");
    }

    let state = AppState::new(repository, config.data_source.as_str());
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
