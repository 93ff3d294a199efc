//! Best-effort removal of remote images.

use std::sync::Arc;

use futures::future::join_all;

use super::{CleanupQueue, ImageStorage};

/// Deletes remote images concurrently; failures go to the cleanup queue.
#[derive(Clone)]
pub struct ImageJanitor {
    storage: Arc<dyn ImageStorage>,
    queue: Arc<dyn CleanupQueue>,
}

impl ImageJanitor {
    pub fn new(storage: Arc<dyn ImageStorage>, queue: Arc<dyn CleanupQueue>) -> Self {
        Self { storage, queue }
    }

    /// Delete every id. Never fails; returns how many were queued for retry.
    pub async fn remove_all(&self, public_ids: Vec<String>) -> usize {
        if public_ids.is_empty() {
            return 0;
        }

        let results = join_all(public_ids.iter().map(|id| self.storage.delete(id))).await;

        let mut queued = 0;
        for (public_id, result) in public_ids.into_iter().zip(results) {
            let Err(err) = result else { continue };
            tracing::warn!(public_id = %public_id, error = %err, "Remote image delete failed");
            match self.queue.enqueue(public_id).await {
                Ok(()) => queued += 1,
                Err(e) => tracing::error!(error = %e, "Could not queue image cleanup"),
            }
        }
        queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::storage::{MockCleanupQueue, MockImageStorage};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_failed_deletes_are_queued() {
        let mut storage = MockImageStorage::new();
        storage
            .expect_delete()
            .returning(|id| match id {
                "properties/bad" => Err(AppError::storage("timeout")),
                _ => Ok(()),
            });

        let mut queue = MockCleanupQueue::new();
        queue
            .expect_enqueue()
            .with(eq("properties/bad".to_string()))
            .times(1)
            .returning(|_| Ok(()));

        let janitor = ImageJanitor::new(Arc::new(storage), Arc::new(queue));
        let queued = janitor
            .remove_all(vec!["properties/ok".to_string(), "properties/bad".to_string()])
            .await;

        assert_eq!(queued, 1);
    }

    #[tokio::test]
    async fn test_nothing_to_delete() {
        let janitor = ImageJanitor::new(
            Arc::new(MockImageStorage::new()),
            Arc::new(MockCleanupQueue::new()),
        );
        assert_eq!(janitor.remove_all(vec![]).await, 0);
    }
}
