//! Bounded background worker pool for event processing.
//!
//! The webhook delivery handler enqueues a job and returns immediately;
//! workers pull jobs off a bounded queue and run them to completion. On
//! shutdown the pool stops accepting work, drains whatever is already
//! queued, and waits for in-flight jobs to finish.
//!
//! Saturation policy: `enqueue` never blocks the request path. When the
//! queue is full the job is dropped and `false` returned; the caller logs
//! and still acknowledges the delivery.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A fixed set of workers sharing one bounded job queue.
#[derive(Clone)]
pub struct WorkerPool {
    tx: mpsc::Sender<Job>,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl WorkerPool {
    /// Spawn `workers` workers sharing a queue of `capacity` jobs.
    pub fn new(workers: usize, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel::<Job>(capacity.max(1));
        let rx = Arc::new(tokio::sync::Mutex::new(rx));
        let tracker = TaskTracker::new();
        let shutdown = CancellationToken::new();

        for worker_id in 0..workers.max(1) {
            let rx = Arc::clone(&rx);
            let shutdown = shutdown.clone();
            tracker.spawn(async move {
                loop {
                    let next = {
                        let mut rx = rx.lock().await;
                        tokio::select! {
                            job = rx.recv() => job,
                            // Cancelled: drain what is already queued,
                            // one job per iteration, then exit.
                            _ = shutdown.cancelled() => rx.try_recv().ok(),
                        }
                    };
                    match next {
                        Some(job) => job.await,
                        None => break,
                    }
                }
                tracing::debug!(worker_id, "background worker stopped");
            });
        }

        Self {
            tx,
            tracker,
            shutdown,
        }
    }

    /// Enqueue a background job without blocking.
    ///
    /// Returns false if the queue is saturated or the pool is shutting
    /// down; the job is dropped in either case.
    pub fn enqueue<F>(&self, job: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.shutdown.is_cancelled() {
            tracing::error!("background pool is shut down, dropping job");
            return false;
        }
        match self.tx.try_send(Box::pin(job)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("background queue full, dropping job");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::error!("background queue closed, dropping job");
                false
            }
        }
    }

    /// Stop accepting work and wait for queued and in-flight jobs to finish.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Number of jobs the queue can still accept right now.
    pub fn available_capacity(&self) -> usize {
        self.tx.capacity()
    }
}
