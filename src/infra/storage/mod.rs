//! Remote image storage.
//!
//! Uploaded files live on a third-party image host. Deletions there are
//! best-effort: a failed delete is handed to a [`CleanupQueue`] so a worker
//! can retry it later instead of leaking the remote file.

mod cloudinary;
mod janitor;
mod queue;

use std::path::Path;

use async_trait::async_trait;

use crate::domain::StoredImage;
use crate::errors::{AppError, AppResult};

pub use cloudinary::CloudinaryStorage;
pub use janitor::ImageJanitor;
pub use queue::{ImageCleanupJob, JobCleanupQueue, NoopCleanupQueue};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A remote host for image files.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Push a local file into `folder`; returns its public URL and id.
    async fn upload(&self, path: &Path, folder: &str) -> AppResult<StoredImage>;

    /// Remove a stored file. Deleting an already missing file succeeds.
    async fn delete(&self, public_id: &str) -> AppResult<()>;
}

/// Where failed remote deletions go to be retried.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CleanupQueue: Send + Sync {
    async fn enqueue(&self, public_id: String) -> AppResult<()>;
}

/// Stand-in used when no image host credentials are configured.
pub struct UnconfiguredStorage;

#[async_trait]
impl ImageStorage for UnconfiguredStorage {
    async fn upload(&self, _path: &Path, _folder: &str) -> AppResult<StoredImage> {
        Err(AppError::storage("image host credentials are not configured"))
    }

    async fn delete(&self, _public_id: &str) -> AppResult<()> {
        Err(AppError::storage("image host credentials are not configured"))
    }
}
