//! Remote image cleanup job.
//!
//! Deletions against the image host that failed during a request are queued
//! as [`ImageCleanupJob`]s and retried here, outside the request path.

use std::sync::Arc;

use apalis::prelude::Data;

use crate::errors::AppResult;
use crate::infra::{ImageCleanupJob, ImageStorage};

/// Delete one remote image. An image that is already gone counts as done.
pub async fn image_cleanup_handler(
    job: ImageCleanupJob,
    storage: Data<Arc<dyn ImageStorage>>,
) -> AppResult<()> {
    tracing::info!(public_id = %job.public_id, "Processing image cleanup job");

    if let Err(e) = storage.delete(&job.public_id).await {
        tracing::warn!(public_id = %job.public_id, error = %e, "Image cleanup failed");
        return Err(e);
    }

    tracing::info!(public_id = %job.public_id, "Remote image removed");
    Ok(())
}
