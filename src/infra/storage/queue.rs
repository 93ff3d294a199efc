//! Cleanup queues for failed remote deletions.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CleanupQueue;
use crate::errors::{AppError, AppResult};

/// Background job: delete one remote image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCleanupJob {
    pub public_id: String,
}

/// Persists cleanup jobs in the apalis PostgreSQL queue.
#[derive(Clone)]
pub struct JobCleanupQueue {
    storage: PostgresStorage<ImageCleanupJob>,
}

impl JobCleanupQueue {
    pub fn new(storage: PostgresStorage<ImageCleanupJob>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl CleanupQueue for JobCleanupQueue {
    async fn enqueue(&self, public_id: String) -> AppResult<()> {
        let mut storage = self.storage.clone();
        storage
            .push(ImageCleanupJob {
                public_id: public_id.clone(),
            })
            .await
            .map_err(|e| AppError::internal(format!("Failed to enqueue image cleanup: {}", e)))?;
        tracing::info!(public_id = %public_id, "Image cleanup queued");
        Ok(())
    }
}

/// Drops cleanup requests after logging them.
pub struct NoopCleanupQueue;

#[async_trait]
impl CleanupQueue for NoopCleanupQueue {
    async fn enqueue(&self, public_id: String) -> AppResult<()> {
        tracing::warn!(public_id = %public_id, "No cleanup queue, remote image left behind");
        Ok(())
    }
}
