//! Serve command - Starts the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::commands::jobs::connect_cleanup_storage;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{
    CleanupQueue, CloudinaryStorage, Database, ImageStorage, JobCleanupQueue, NoopCleanupQueue,
    UnconfiguredStorage,
};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    // Initialize database (applies pending migrations)
    let db = Arc::new(Database::connect(&config).await?);

    let storage = image_storage(&config)?;
    let queue = cleanup_queue(&config).await;

    let app_state = AppState::from_config(db, config.clone(), storage, queue);

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

fn image_storage(config: &Config) -> AppResult<Arc<dyn ImageStorage>> {
    match &config.cloudinary {
        Some(cloudinary) => {
            let timeout = Duration::from_secs(config.http_timeout_seconds);
            let storage = CloudinaryStorage::new(cloudinary.clone(), timeout)?;
            tracing::info!(cloud = %cloudinary.cloud_name, "Remote image storage configured");
            Ok(Arc::new(storage))
        }
        None => Ok(Arc::new(UnconfiguredStorage)),
    }
}

/// Persistent queue when the job tables are reachable, otherwise a logging no-op.
async fn cleanup_queue(config: &Config) -> Arc<dyn CleanupQueue> {
    match connect_cleanup_storage(config).await {
        Ok(storage) => Arc::new(JobCleanupQueue::new(storage)),
        Err(e) => {
            tracing::warn!(error = %e, "Cleanup queue unavailable, failed remote deletes will be dropped");
            Arc::new(NoopCleanupQueue)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
