//! Bounded parallel map over blocking work.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{IngestionError, Result};

/// Apply `f` to every item on at most `workers` blocking threads.
///
/// Output order equals input order regardless of completion order. Cancellation
/// is observed before each task starts and after each task completes; on
/// cancellation the remaining tasks are aborted and no output is returned.
pub async fn parallel_map<T, R, F>(
    items: Vec<T>,
    workers: usize,
    cancel: &CancellationToken,
    f: F,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    let total = items.len();
    let f = Arc::new(f);
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = JoinSet::new();
    let mut results: Vec<Option<R>> = (0..total).map(|_| None).collect();

    for (idx, item) in items.into_iter().enumerate() {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tasks.abort_all();
                return Err(IngestionError::Cancelled);
            }
            permit = Arc::clone(&semaphore).acquire_owned() => {
                permit.map_err(|e| IngestionError::WorkerFailed { message: e.to_string() })?
            }
        };

        let f = Arc::clone(&f);
        tasks.spawn_blocking(move || {
            let _permit = permit;
            (idx, f(item))
        });
    }

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tasks.abort_all();
                return Err(IngestionError::Cancelled);
            }
            joined = tasks.join_next() => match joined {
                None => break,
                Some(Ok((idx, value))) => results[idx] = Some(value),
                Some(Err(e)) => {
                    tasks.abort_all();
                    return Err(IngestionError::WorkerFailed { message: e.to_string() });
                }
            }
        }
    }

    debug!(tasks = total, workers, "parallel map completed");
    Ok(results.into_iter().flatten().collect())
}
