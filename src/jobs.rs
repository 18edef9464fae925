//! Bounded pool for ingestion jobs.
//!
//! Each job runs as its own tokio task once a permit is free. The caller
//! awaits the job's result; there is no cancellation.

use crate::error::FfdbError;
use crate::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

pub const DEFAULT_WORKERS: usize = 3;

#[derive(Debug, Clone)]
pub struct JobPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl JobPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Jobs that could start right now without waiting
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `job` on the pool and wait for its result.
    pub async fn run<F, T>(&self, job: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| FfdbError::Job {
                message: e.to_string(),
            })?;
        debug!("Job started ({} slots free)", self.available());

        let handle = tokio::spawn(async move {
            let _permit = permit;
            job.await
        });

        handle.await.map_err(|e| FfdbError::Job {
            message: e.to_string(),
        })?
    }
}

impl Default for JobPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}
