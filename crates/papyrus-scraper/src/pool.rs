//! Bounded pool for CPU-bound work.
//!
//! Jobs run on tokio's blocking threads, at most `size` at a time. A worker
//! slot is held by the blocking job itself, so it only frees up once the job
//! has returned, even when the batch that submitted it is gone.
//!
//! Dropping the future returned by [`WorkerPool::run_all`] (or failing the
//! batch) raises the batch's [`Cancellation`]: jobs that have not started
//! never run, and running jobs can poll the flag to stop early.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::ScrapeError;

/// Cancellation flag shared by the jobs of one batch.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// `Err` once the batch has been cancelled.
    pub fn check(&self) -> Result<(), ScrapeError> {
        if self.is_cancelled() {
            return Err(ScrapeError::Internal("run cancelled".to_string()));
        }
        Ok(())
    }

    fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Raises the flag when the owning batch goes away, however that happens.
struct CancelOnDrop(Cancellation);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

#[derive(Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
}

impl WorkerPool {
    /// A pool running at most `size` jobs concurrently. Zero is treated as one.
    pub fn new(size: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(size.max(1))),
        }
    }

    /// Run a single job on the pool.
    pub async fn run<T, F>(&self, job: F) -> Result<T, ScrapeError>
    where
        T: Send + 'static,
        F: FnOnce(&Cancellation) -> Result<T, ScrapeError> + Send + 'static,
    {
        let mut results = self.run_all(vec![job]).await?;
        results
            .pop()
            .ok_or_else(|| ScrapeError::Internal("job produced no result".to_string()))
    }

    /// Run every job and return their results in submission order.
    ///
    /// Fails with the first error observed and cancels the rest of the batch.
    /// A panicking job surfaces as [`ScrapeError::Internal`].
    pub async fn run_all<T, F>(&self, jobs: Vec<F>) -> Result<Vec<T>, ScrapeError>
    where
        T: Send + 'static,
        F: FnOnce(&Cancellation) -> Result<T, ScrapeError> + Send + 'static,
    {
        let count = jobs.len();
        let cancel = Cancellation::default();
        let mut set = JoinSet::new();
        // Declared after `set` so the flag is up before the wrappers are aborted.
        let _guard = CancelOnDrop(cancel.clone());

        for (index, job) in jobs.into_iter().enumerate() {
            let permits = Arc::clone(&self.permits);
            let cancel = cancel.clone();
            set.spawn(async move {
                let permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|_| ScrapeError::Internal("worker pool closed".to_string()))?;
                let result = tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    cancel.check()?;
                    job(&cancel)
                })
                .await??;
                Ok::<_, ScrapeError>((index, result))
            });
        }

        let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(count).collect();
        while let Some(joined) = set.join_next().await {
            let (index, value) = joined??;
            slots[index] = Some(value);
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.ok_or_else(|| ScrapeError::Internal("job result missing".to_string()))
            })
            .collect()
    }
}
