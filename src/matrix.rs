//! Column-major storage padded to whole lanes.
//!
//! A [`LaneMatrix`] rounds its row count up to a multiple of
//! [`LANE_WIDTH`](crate::lanes::LANE_WIDTH) so every column is a whole number
//! of lanes and a batched read never straddles a column boundary. Padding
//! cells hold the construction-time default and are never addressable through
//! the checked accessors.

use crate::lanes::LANE_WIDTH;

/// Dense matrix stored column by column, each column padded to whole lanes.
///
/// `T` is `Copy` because cells are read and written as plain values from the
/// worker threads' hot loop.
#[derive(Debug, Clone)]
pub struct LaneMatrix<T: Copy> {
    rows: usize,
    cols: usize,
    lanes_per_col: usize,
    default: T,
    data: Vec<T>,
}

impl<T: Copy> LaneMatrix<T> {
    /// Create a `rows x cols` matrix with every cell set to `default`.
    ///
    /// The default is remembered: capacity added later by [`reserve`] is
    /// filled with the same value, so a freshly grown column reads exactly
    /// like a freshly constructed one.
    ///
    /// # Panics
    ///
    /// Panics if `rows == 0`.
    ///
    /// [`reserve`]: LaneMatrix::reserve
    pub fn new(rows: usize, cols: usize, default: T) -> Self {
        assert!(rows > 0, "matrix must have at least one row");
        let lanes_per_col = rows.div_ceil(LANE_WIDTH);
        let data = vec![default; lanes_per_col * LANE_WIDTH * cols];
        Self {
            rows,
            cols,
            lanes_per_col,
            default,
            data,
        }
    }

    /// Logical row count (excluding padding).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Current column capacity.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of lanes in one column.
    #[inline]
    pub fn lanes_per_col(&self) -> usize {
        self.lanes_per_col
    }

    /// Row count including padding; also the element stride between columns.
    #[inline]
    pub fn padded_rows(&self) -> usize {
        self.lanes_per_col * LANE_WIDTH
    }

    /// Flat index of `(row, col)` in the backing storage.
    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(row < self.rows, "row {row} out of bounds ({} rows)", self.rows);
        assert!(col < self.cols, "col {col} out of bounds ({} cols)", self.cols);
        col * self.padded_rows() + row
    }

    /// Flat index of the first element of lane `lane` in column `col`.
    #[inline]
    pub(crate) fn lane_offset(&self, lane: usize, col: usize) -> usize {
        assert!(
            lane < self.lanes_per_col,
            "lane {lane} out of bounds ({} lanes)",
            self.lanes_per_col
        );
        assert!(col < self.cols, "col {col} out of bounds ({} cols)", self.cols);
        col * self.padded_rows() + lane * LANE_WIDTH
    }

    /// Read one cell.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[self.index(row, col)]
    }

    /// Write one cell.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let i = self.index(row, col);
        self.data[i] = value;
    }

    /// Read one whole lane of column `col`.
    ///
    /// The tail lane of a column includes padding cells, which always hold
    /// the construction default.
    #[inline]
    pub fn lane(&self, lane: usize, col: usize) -> [T; LANE_WIDTH] {
        let base = self.lane_offset(lane, col);
        let mut out = [self.default; LANE_WIDTH];
        out.copy_from_slice(&self.data[base..base + LANE_WIDTH]);
        out
    }

    /// Overwrite one whole lane of column `col`.
    #[inline]
    pub fn set_lane(&mut self, lane: usize, col: usize, values: [T; LANE_WIDTH]) {
        let base = self.lane_offset(lane, col);
        self.data[base..base + LANE_WIDTH].copy_from_slice(&values);
    }

    /// Grow the column capacity to at least `min_cols`.
    ///
    /// Capacity never shrinks; a smaller request is a no-op. Existing cells
    /// keep their values and new cells are filled with the construction
    /// default.
    pub fn reserve(&mut self, min_cols: usize) {
        if min_cols <= self.cols {
            return;
        }
        self.data.resize(self.padded_rows() * min_cols, self.default);
        self.cols = min_cols;
    }

    /// Raw pointer to the backing storage, for the worker threads.
    #[inline]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }
}
