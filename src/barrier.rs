//! Busy-wait barrier coordinating the controller and the worker threads.
//!
//! Each decode column is one round: the controller publishes the column
//! index, every worker computes its lane range of that column, and the
//! controller waits until all workers have checked in before moving on. All
//! coordination is raw atomics with spin loops; for trellis columns the wait
//! is short enough that parking would cost more than it saves.
//!
//! Rounds are numbered by a monotonically increasing ticket. Workers watch
//! the ticket rather than the column index itself, so two consecutive rounds
//! that happen to carry the same column value (as back-to-back decodes of
//! equal-length inputs do) are still seen as distinct rounds.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

/// What a worker should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Compute the worker's lane range of this trellis column.
    Column(usize),
    /// Exit the worker loop.
    Shutdown,
}

/// Reusable rendezvous between one controller and `workers` worker threads.
#[derive(Debug)]
pub struct ColumnBarrier {
    workers: usize,
    /// Round number, bumped once per publish and never reset.
    ticket: AtomicU64,
    column: AtomicUsize,
    remaining: AtomicUsize,
    stop: AtomicBool,
}

impl ColumnBarrier {
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn new(workers: usize) -> Self {
        assert!(workers > 0, "barrier needs at least one worker");
        Self {
            workers,
            ticket: AtomicU64::new(0),
            column: AtomicUsize::new(0),
            remaining: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
        }
    }

    /// Number of worker threads this barrier synchronizes.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Start a round for `column`. Controller side.
    ///
    /// Must not be called again until [`await_completion`] has returned for
    /// the previous round. The Release increment of the ticket makes every
    /// store sequenced before this call visible to a worker that observes
    /// the new ticket.
    ///
    /// [`await_completion`]: ColumnBarrier::await_completion
    pub fn publish(&self, column: usize) {
        self.column.store(column, Ordering::Relaxed);
        self.remaining.store(self.workers, Ordering::Relaxed);
        self.ticket.fetch_add(1, Ordering::Release);
    }

    /// Spin until every worker has called [`complete_one`] for the current
    /// round. Controller side.
    ///
    /// On return, all worker writes made during the round are visible to the
    /// controller.
    ///
    /// [`complete_one`]: ColumnBarrier::complete_one
    pub fn await_completion(&self) {
        while self.remaining.load(Ordering::Acquire) != 0 {
            std::hint::spin_loop();
        }
    }

    /// Wake all workers and direct them to exit. Controller side.
    pub fn request_shutdown(&self) {
        self.stop.store(true, Ordering::Relaxed);
        self.ticket.fetch_add(1, Ordering::Release);
    }

    /// Spin until a round newer than `last_ticket` is published, then return
    /// the command for it. Worker side.
    ///
    /// `last_ticket` is the worker's private round cursor; it starts at 0
    /// and is advanced by this call.
    pub fn wait_for_work(&self, last_ticket: &mut u64) -> Command {
        loop {
            let ticket = self.ticket.load(Ordering::Acquire);
            if ticket != *last_ticket {
                *last_ticket = ticket;
                if self.stop.load(Ordering::Relaxed) {
                    return Command::Shutdown;
                }
                return Command::Column(self.column.load(Ordering::Relaxed));
            }
            std::hint::spin_loop();
        }
    }

    /// Check in for the current round. Worker side.
    ///
    /// The Release decrement publishes the worker's writes to the controller
    /// (and, through the next round's ticket, to the other workers).
    pub fn complete_one(&self) {
        self.remaining.fetch_sub(1, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn run_rounds(workers: usize, columns: &[usize]) -> usize {
        let barrier = ColumnBarrier::new(workers);
        let executed = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..workers {
                let barrier = &barrier;
                let executed = &executed;
                scope.spawn(move || {
                    let mut last = 0u64;
                    loop {
                        match barrier.wait_for_work(&mut last) {
                            Command::Column(_) => {
                                executed.fetch_add(1, Ordering::Relaxed);
                                barrier.complete_one();
                            }
                            Command::Shutdown => break,
                        }
                    }
                });
            }
            for &col in columns {
                barrier.publish(col);
                barrier.await_completion();
            }
            barrier.request_shutdown();
        });
        executed.load(Ordering::Relaxed)
    }

    #[test]
    fn every_worker_runs_every_round() {
        assert_eq!(run_rounds(4, &[0, 1, 2, 3, 4]), 4 * 5);
    }

    #[test]
    fn single_worker_round_trips() {
        assert_eq!(run_rounds(1, &[0, 1, 2]), 3);
    }

    #[test]
    fn repeated_column_values_are_distinct_rounds() {
        // Back-to-back rounds carrying the same column index must each run;
        // a worker keying on the column value alone would miss the second.
        assert_eq!(run_rounds(3, &[5, 5, 5, 5]), 3 * 4);
    }

    #[test]
    fn workers_observe_columns_in_publish_order() {
        let barrier = ColumnBarrier::new(2);
        let order = std::sync::Mutex::new(Vec::new());
        std::thread::scope(|scope| {
            for _ in 0..2 {
                let barrier = &barrier;
                let order = &order;
                scope.spawn(move || {
                    let mut last = 0u64;
                    loop {
                        match barrier.wait_for_work(&mut last) {
                            Command::Column(col) => {
                                order.lock().unwrap().push(col);
                                barrier.complete_one();
                            }
                            Command::Shutdown => break,
                        }
                    }
                });
            }
            for col in [3, 1, 4, 1, 5] {
                barrier.publish(col);
                barrier.await_completion();
            }
            barrier.request_shutdown();
        });
        let seen = order.into_inner().unwrap();
        // Both workers record each round; rounds never interleave.
        assert_eq!(seen, vec![3, 3, 1, 1, 4, 4, 1, 1, 5, 5]);
    }

    #[test]
    fn shutdown_releases_waiting_workers() {
        let barrier = ColumnBarrier::new(3);
        std::thread::scope(|scope| {
            for _ in 0..3 {
                let barrier = &barrier;
                scope.spawn(move || {
                    let mut last = 0u64;
                    assert_eq!(barrier.wait_for_work(&mut last), Command::Shutdown);
                });
            }
            barrier.request_shutdown();
        });
    }

    #[test]
    #[should_panic(expected = "at least one worker")]
    fn zero_workers_is_rejected() {
        let _ = ColumnBarrier::new(0);
    }
}
