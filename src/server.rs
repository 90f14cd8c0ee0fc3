//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, repository wiring and the Axum server lifecycle.

use crate::application::services::ContentService;
use crate::config::Config;
use crate::domain::repositories::{
    ContentRepository, SharedRepository, TermRepository, UserRepository,
};
use crate::infrastructure::persistence::{
    MySqlContentRepository, MySqlSharedRepository, MySqlTermRepository, MySqlUserRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the MySQL pool with the configured limits.
pub async fn connect(config: &Config) -> Result<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Wires the MySQL repositories into a content service.
pub fn build_service(pool: MySqlPool) -> ContentService {
    let pool = Arc::new(pool);

    let content: Arc<dyn ContentRepository> = Arc::new(MySqlContentRepository::new(pool.clone()));
    let terms: Arc<dyn TermRepository> = Arc::new(MySqlTermRepository::new(pool.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(MySqlUserRepository::new(pool.clone()));
    let shared: Arc<dyn SharedRepository> = Arc::new(MySqlSharedRepository::new(pool));

    ContentService::new(content, terms, users, shared)
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect(&config).await?;
    tracing::info!("Connected to database");

    let api_config = Arc::new(config.api_config());
    let state = AppState::new(Arc::new(build_service(pool)), api_config.clone());

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "Listening on http://{addr}, API at {}",
        api_config.api_base_url
    );

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
