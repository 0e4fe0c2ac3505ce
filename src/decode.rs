//! Parallel lane-batched Viterbi decoding.
//!
//! The decoder owns the trellis and backpointer matrices plus a persistent
//! [`WorkerPool`]. Columns are computed strictly left to right; within a
//! column the workers fill disjoint lane ranges, reading the whole previous
//! column freely. The barrier round in [`WorkerPool::run_column`] is the
//! only synchronization: its publish edge hands the buffers to the workers
//! and its completion edge hands them back.
//!
//! Scores are log-probabilities. Padding rows carry negative infinity
//! everywhere, so they lose every strictly-greater comparison and the
//! termination scan, which only visits real rows, never sees them.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::ptr;
use std::sync::Arc;
use std::thread;

use crate::builder::DecoderBuilder;
use crate::lanes::{add, scalar_select_greater, select_greater, splat, LANE_WIDTH};
use crate::matrix::LaneMatrix;
use crate::model::Model;
use crate::pool::WorkerPool;

/// Columns preallocated before the first decode.
pub(crate) const INITIAL_COLUMNS: usize = 8;

/// Pointers and dimensions for one decode, published to the workers.
///
/// Raw pointers rather than references: the matrices stay owned by the
/// decoder, and the barrier protocol decides who may touch them when.
#[derive(Clone, Copy)]
struct Frame {
    trellis: *mut f64,
    backptr: *mut usize,
    observations: *const usize,
    columns: usize,
    /// Element stride between columns (the padded row count).
    stride: usize,
}

impl Frame {
    const fn empty() -> Self {
        Self {
            trellis: ptr::null_mut(),
            backptr: ptr::null_mut(),
            observations: ptr::null(),
            columns: 0,
            stride: 0,
        }
    }
}

/// Mailbox for the current [`Frame`].
///
/// The controller writes it between barrier rounds, workers read it during
/// rounds.
struct SharedFrame(std::cell::UnsafeCell<Frame>);

// SAFETY: the frame is written only while every worker is parked at the
// barrier and read only during a round. The barrier's Release ticket
// increment orders each write before all reads of that round, so no two
// conflicting accesses are ever unordered.
unsafe impl Send for SharedFrame {}
unsafe impl Sync for SharedFrame {}

/// Most-likely label sequence decoder for a fixed [`Model`].
///
/// Construction spawns the worker threads; they persist across calls and
/// busy-wait between columns. The trellis and backpointer matrices are
/// likewise reused, growing to the longest input seen so far and never
/// shrinking. Decoding therefore takes `&mut self` and allocates nothing
/// but the returned path once the buffers are warm.
///
/// Results are identical for every worker count: each cell's max/argmax is
/// computed by exactly one worker, scanning predecessors in the same order
/// the single-threaded loop would.
pub struct ViterbiDecoder {
    // Dropped first: workers are joined before the buffers they point into.
    pool: WorkerPool,
    shared: Arc<SharedFrame>,
    model: Arc<Model>,
    trellis: LaneMatrix<f64>,
    backptr: LaneMatrix<usize>,
}

impl ViterbiDecoder {
    /// Create a decoder with one worker per available CPU.
    pub fn new(model: Model) -> Self {
        DecoderBuilder::new(model).build()
    }

    /// Create a decoder with an explicit worker count.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn with_workers(model: Model, workers: usize) -> Self {
        DecoderBuilder::new(model).with_workers(workers).build()
    }

    /// Start configuring a decoder.
    pub fn builder(model: Model) -> DecoderBuilder {
        DecoderBuilder::new(model)
    }

    pub(crate) fn from_builder(model: Model, workers: usize, capacity: usize) -> Self {
        let model = Arc::new(model);
        let capacity = capacity.max(1);
        let trellis = LaneMatrix::new(model.labels(), capacity, f64::NEG_INFINITY);
        let backptr = LaneMatrix::new(model.labels(), capacity, 0usize);
        let shared = Arc::new(SharedFrame(std::cell::UnsafeCell::new(Frame::empty())));
        let pool = {
            let model = Arc::clone(&model);
            let shared = Arc::clone(&shared);
            WorkerPool::spawn(model.label_lanes(), workers, move |column, lanes| {
                // SAFETY: a round is in progress, so the controller has
                // published a frame whose pointers cover this decode's
                // buffers and observation slice, and no other worker
                // writes the lanes in `lanes`.
                unsafe {
                    let frame = *shared.0.get();
                    fill_lanes(&model, frame, column, lanes);
                }
            })
        };
        Self {
            pool,
            shared,
            model,
            trellis,
            backptr,
        }
    }

    /// The model being decoded against.
    #[inline]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Number of worker threads.
    #[inline]
    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Current column capacity of the reusable buffers.
    ///
    /// Grows to the longest input decoded so far and never shrinks.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.trellis.cols()
    }

    /// Most likely label sequence for `observations`, one label id per
    /// observation.
    ///
    /// Ties between equally likely predecessors always go to the smallest
    /// label id, so the result is deterministic. If no path has nonzero
    /// probability the scores are all negative infinity and the same tie
    /// rule yields the all-zeros path. An empty input decodes to an empty
    /// path without touching the buffers.
    ///
    /// # Panics
    ///
    /// Panics if any observation id is `>= self.model().emissions()`.
    pub fn decode(&mut self, observations: &[usize]) -> Vec<usize> {
        let columns = observations.len();
        if columns == 0 {
            return Vec::new();
        }
        for (position, &symbol) in observations.iter().enumerate() {
            assert!(
                symbol < self.model.emissions(),
                "observation {symbol} at position {position} out of range ({} symbols)",
                self.model.emissions()
            );
        }
        tracing::debug!(
            columns,
            labels = self.model.labels(),
            workers = self.pool.workers(),
            "decoding observation sequence"
        );
        self.trellis.reserve(columns);
        self.backptr.reserve(columns);
        let frame = Frame {
            trellis: self.trellis.as_mut_ptr(),
            backptr: self.backptr.as_mut_ptr(),
            observations: observations.as_ptr(),
            columns,
            stride: self.trellis.padded_rows(),
        };
        // SAFETY: every worker is parked at the barrier, so nothing reads
        // the frame concurrently; run_column publishes it with a Release
        // edge before any worker wakes.
        unsafe {
            *self.shared.0.get() = frame;
        }
        for column in 0..columns {
            self.pool.run_column(column);
        }
        // All rounds complete: the workers' writes are visible and the
        // buffers are exclusively ours again.
        let last = self.best_final_label(columns - 1);
        self.retrace(last, columns)
    }

    /// Scalar argmax over the real rows of the final column.
    fn best_final_label(&self, column: usize) -> usize {
        let mut best = f64::NEG_INFINITY;
        let mut arg = 0usize;
        for label in 0..self.model.labels() {
            scalar_select_greater(&mut best, &mut arg, self.trellis.get(label, column), label);
        }
        arg
    }

    /// Walk the backpointers from `last` to the first column.
    fn retrace(&self, last: usize, columns: usize) -> Vec<usize> {
        let mut path = vec![0usize; columns];
        path[columns - 1] = last;
        for column in (1..columns).rev() {
            path[column - 1] = self.backptr.get(path[column], column);
        }
        path
    }
}

/// One worker's share of one trellis column.
///
/// Column 0 scores are `start + emission`; later columns take, per
/// destination label, the maximum over all predecessors of
/// `previous score + transition`, then add the emission score. The
/// strictly-greater select keeps the earliest predecessor on ties.
///
/// # Safety
///
/// `frame` must point into live trellis/backpointer buffers with at least
/// `frame.columns` columns of `frame.stride` elements and an observation
/// slice of `frame.columns` ids, `column` must be less than
/// `frame.columns`, column `column - 1` must already be fully written, and
/// no other thread may concurrently write any cell in `lanes` of column
/// `column`.
unsafe fn fill_lanes(model: &Model, frame: Frame, column: usize, lanes: Range<usize>) {
    debug_assert!(column < frame.columns);
    // SAFETY: column is in bounds of the observation slice.
    let symbol = unsafe { *frame.observations.add(column) };
    if column == 0 {
        for lane in lanes {
            let scores = add(model.start_lane(lane), model.emission_lane(lane, symbol));
            // SAFETY: the lane lies inside column 0 and is ours alone.
            unsafe {
                let dst = frame.trellis.add(lane * LANE_WIDTH);
                ptr::copy_nonoverlapping(scores.as_ptr(), dst, LANE_WIDTH);
            }
        }
        return;
    }
    // SAFETY: the previous column is complete and in bounds.
    let prev_column = unsafe { frame.trellis.add((column - 1) * frame.stride) };
    let base = column * frame.stride;
    for lane in lanes {
        let mut best = splat(f64::NEG_INFINITY);
        let mut arg = [0usize; LANE_WIDTH];
        for from in 0..model.labels() {
            // SAFETY: `from` is a real row of the completed previous column.
            let prev = unsafe { *prev_column.add(from) };
            let cand = add(splat(prev), model.transition_lane(lane, from));
            select_greater(&mut best, &mut arg, cand, from);
        }
        let scores = add(best, model.emission_lane(lane, symbol));
        // SAFETY: the lane lies inside column `column` and is ours alone.
        unsafe {
            let dst = frame.trellis.add(base + lane * LANE_WIDTH);
            ptr::copy_nonoverlapping(scores.as_ptr(), dst, LANE_WIDTH);
            let dst = frame.backptr.add(base + lane * LANE_WIDTH);
            ptr::copy_nonoverlapping(arg.as_ptr(), dst, LANE_WIDTH);
        }
    }
}

/// One worker per available CPU, or a single worker when the count cannot
/// be determined.
pub(crate) fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
