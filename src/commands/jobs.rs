//! Jobs command - Remote image cleanup queue management.
//!
//! - `work`: Start the cleanup worker process
//! - `list`: Show job counts by status
//! - `clear`: Remove failed jobs from the queue
//!
//! ## Usage
//!
//! ```bash
//! cargo run -- jobs work
//! cargo run -- jobs list
//! cargo run -- jobs clear
//! ```

use std::sync::Arc;
use std::time::Duration;

use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{Config, JOB_NAME_IMAGE_CLEANUP};
use crate::errors::{AppError, AppResult};
use crate::infra::{CloudinaryStorage, Database, ImageStorage};
use crate::jobs::{image_cleanup_handler, ImageCleanupJob};

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

/// Connect to the job tables, creating them on first use.
pub(crate) async fn connect_cleanup_storage(
    config: &Config,
) -> AppResult<PostgresStorage<ImageCleanupJob>> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    Ok(PostgresStorage::new(pool))
}

/// Start the image cleanup worker.
///
/// Deleting remote files needs image host credentials; without them the
/// worker refuses to start instead of failing every job.
async fn run_worker(config: &Config) -> AppResult<()> {
    use apalis::prelude::*;

    let cloudinary = config.cloudinary.clone().ok_or_else(|| {
        AppError::internal("Cloudinary credentials are required to run the cleanup worker")
    })?;
    let storage: Arc<dyn ImageStorage> = Arc::new(CloudinaryStorage::new(
        cloudinary,
        Duration::from_secs(config.http_timeout_seconds),
    )?);

    tracing::info!("Connecting to database for job worker...");
    let backend = connect_cleanup_storage(config).await?;

    tracing::info!("Job worker started. Press Ctrl+C to stop.");

    let worker = WorkerBuilder::new(JOB_NAME_IMAGE_CLEANUP)
        .data(storage)
        .backend(backend)
        .build_fn(image_cleanup_handler);

    let monitor = Monitor::new().register(worker);

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                tracing::error!("Worker error: {}", e);
                return Err(AppError::internal(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Job worker stopped.");
    Ok(())
}

/// Queue status counts.
#[derive(Debug, Default, PartialEq, Eq)]
struct QueueCounts {
    pending: i64,
    running: i64,
    failed: i64,
    done: i64,
}

impl QueueCounts {
    fn record(&mut self, status: &str, count: i64) {
        match status {
            "Pending" => self.pending = count,
            "Running" => self.running = count,
            "Failed" => self.failed = count,
            "Done" => self.done = count,
            _ => {}
        }
    }
}

async fn queue_initialized(db: &DatabaseConnection) -> AppResult<bool> {
    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') as exists".to_string(),
        ))
        .await?;

    Ok(row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false))
}

/// Show job counts by status for the cleanup queue.
async fn list_jobs(config: &Config) -> AppResult<()> {
    tracing::info!("Connecting to database...");
    let db = Database::connect_without_migrations(config).await?;
    let db = db.connection();

    if !queue_initialized(db).await? {
        println!("\n=== Image Cleanup Queue ===");
        println!("Job queue not initialized.");
        println!("Run 'jobs work' or 'serve' first to create the queue tables.");
        println!("===========================\n");
        return Ok(());
    }

    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT status::text as status, COUNT(*)::bigint as count FROM apalis.jobs GROUP BY status".to_string(),
        ))
        .await?;

    let mut counts = QueueCounts::default();
    for row in rows {
        if let (Ok(status), Ok(count)) = (
            row.try_get::<String>("", "status"),
            row.try_get::<i64>("", "count"),
        ) {
            counts.record(&status, count);
        }
    }

    println!("\n=== Image Cleanup Queue ===");
    println!("Pending:  {}", counts.pending);
    println!("Running:  {}", counts.running);
    println!("Failed:   {}", counts.failed);
    println!("Done:     {}", counts.done);
    println!("===========================\n");

    Ok(())
}

/// Clear failed jobs from the queue
async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    tracing::info!("Connecting to database...");
    let db = Database::connect_without_migrations(config).await?;
    let db = db.connection();

    if !queue_initialized(db).await? {
        println!("Job queue not initialized. Nothing to clear.");
        return Ok(());
    }

    let result = db
        .execute(Statement::from_string(
            DatabaseBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status = 'Failed'".to_string(),
        ))
        .await?;

    println!(
        "Cleared {} failed job(s) from the queue.",
        result.rows_affected()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_counts_ignore_unknown_status() {
        let mut counts = QueueCounts::default();
        counts.record("Pending", 3);
        counts.record("Failed", 1);
        counts.record("Killed", 9);

        assert_eq!(
            counts,
            QueueCounts {
                pending: 3,
                running: 0,
                failed: 1,
                done: 0,
            }
        );
    }
}
