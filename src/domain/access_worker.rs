//! Background worker applying fire-and-forget access-count increments.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info};

use crate::domain::access_event::AccessEvent;
use crate::domain::repositories::LinkRepository;

/// Consumes access events and increments counts in the store.
///
/// At most `concurrency` increments are in flight at once. Failures are
/// logged and the event is dropped; there is no retry. The worker returns
/// once every sender is dropped and in-flight increments have finished.
pub async fn run_access_worker<R>(
    mut rx: mpsc::Receiver<AccessEvent>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: LinkRepository + ?Sized + 'static,
{
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        tokio::spawn(async move {
            let _permit = permit;
            match repository.increment_access_count(&event.code).await {
                Ok(()) => debug!("Access recorded: {}", event.code),
                Err(e) => error!(
                    code = %event.code,
                    accessed_at = %event.accessed_at,
                    "Failed to record access: {}",
                    e
                ),
            }
        });
    }

    // Wait for in-flight increments before reporting shutdown.
    let _ = permits.acquire_many(concurrency as u32).await;
    info!("Access worker stopped");
}
