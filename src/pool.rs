//! Persistent worker threads driven by a [`ColumnBarrier`].
//!
//! The pool is spawned once per decoder and reused across decodes. Lanes are
//! split into contiguous ranges at spawn time, one range per worker, so the
//! per-column work needs no further distribution. Dropping the pool requests
//! shutdown and joins every thread.

use std::ops::Range;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::barrier::{ColumnBarrier, Command};

/// Contiguous lane range owned by worker `worker` out of `workers`.
///
/// Ranges tile `0..lanes` in order without gaps or overlap. When there are
/// more workers than lanes the trailing ranges are empty; those workers
/// still check in at the barrier each round.
fn partition_lanes(lanes: usize, workers: usize, worker: usize) -> Range<usize> {
    let chunk = lanes.div_ceil(workers);
    let start = (worker * chunk).min(lanes);
    let end = (start + chunk).min(lanes);
    start..end
}

/// A fixed set of worker threads that run one job per published column.
///
/// Idle workers busy-wait at the barrier, so a pool costs CPU while parked;
/// it is meant to live inside a decoder that feeds it steadily.
pub struct WorkerPool {
    barrier: Arc<ColumnBarrier>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` threads that each run `job(column, lane_range)` for
    /// every published column.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0` or if the OS refuses to spawn a thread.
    pub fn spawn<F>(lanes: usize, workers: usize, job: F) -> Self
    where
        F: Fn(usize, Range<usize>) + Send + Sync + 'static,
    {
        let barrier = Arc::new(ColumnBarrier::new(workers));
        let job = Arc::new(job);
        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let barrier = Arc::clone(&barrier);
            let job = Arc::clone(&job);
            let range = partition_lanes(lanes, workers, worker);
            handles.push(thread::spawn(move || {
                let mut last_ticket = 0u64;
                loop {
                    match barrier.wait_for_work(&mut last_ticket) {
                        Command::Column(column) => {
                            job(column, range.clone());
                            barrier.complete_one();
                        }
                        Command::Shutdown => break,
                    }
                }
            }));
        }
        Self { barrier, handles }
    }

    /// Run one round: publish `column` and wait until every worker is done.
    ///
    /// On return, all writes the workers made for this column are visible to
    /// the caller.
    pub fn run_column(&self, column: usize) {
        self.barrier.publish(column);
        self.barrier.await_completion();
    }

    /// Number of worker threads.
    #[inline]
    pub fn workers(&self) -> usize {
        self.barrier.workers()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.barrier.request_shutdown();
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("worker thread panicked before shutdown");
            }
        }
    }
}
