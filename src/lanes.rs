//! Fixed-width batch primitives for the lane-grouped numeric kernel.
//!
//! The decoder processes `LANE_WIDTH` destination labels at a time. Batches
//! are plain arrays so the code stays portable; the loops are written in the
//! shape the compiler auto-vectorizes. Every operation has a scalar twin
//! with the identical comparison, so the batched and scalar paths make
//! bitwise-identical max/argmax selections.

/// Number of rows processed together as one batch.
pub const LANE_WIDTH: usize = 8;

/// One batch of log-probabilities.
pub type Lane = [f64; LANE_WIDTH];

/// One batch of predecessor-label indices.
pub type IndexLane = [usize; LANE_WIDTH];

/// Broadcast a scalar across a lane.
#[inline]
pub fn splat(value: f64) -> Lane {
    [value; LANE_WIDTH]
}

/// Elementwise sum of two lanes.
#[inline]
pub fn add(a: Lane, b: Lane) -> Lane {
    let mut out = a;
    for (o, v) in out.iter_mut().zip(b) {
        *o += v;
    }
    out
}

/// Per-element compare-and-select for the running max/argmax.
///
/// An element is replaced only when the candidate is strictly greater, so
/// among equal maxima the earliest-seen `idx` wins and the selection is
/// deterministic. NaN candidates never win (`NaN > x` is false).
#[inline]
pub fn select_greater(best: &mut Lane, arg: &mut IndexLane, cand: Lane, idx: usize) {
    for k in 0..LANE_WIDTH {
        if cand[k] > best[k] {
            best[k] = cand[k];
            arg[k] = idx;
        }
    }
}

/// Scalar twin of [`select_greater`]: same comparison, same tie-break.
///
/// Used by the termination scan and as the reference path when checking the
/// batched kernel.
#[inline]
pub fn scalar_select_greater(best: &mut f64, arg: &mut usize, cand: f64, idx: usize) {
    if cand > *best {
        *best = cand;
        *arg = idx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_elementwise() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let b = splat(0.5);
        let s = add(a, b);
        for k in 0..LANE_WIDTH {
            assert_eq!(s[k], a[k] + 0.5);
        }
    }

    #[test]
    fn neg_infinity_absorbs() {
        let s = add(splat(f64::NEG_INFINITY), splat(-1.25));
        assert!(s.iter().all(|v| *v == f64::NEG_INFINITY));
    }

    #[test]
    fn earliest_candidate_wins_ties() {
        let mut best = splat(f64::NEG_INFINITY);
        let mut arg = [0usize; LANE_WIDTH];
        select_greater(&mut best, &mut arg, splat(-2.0), 3);
        // Equal candidate from a later index must not displace the winner.
        select_greater(&mut best, &mut arg, splat(-2.0), 7);
        assert_eq!(best, splat(-2.0));
        assert_eq!(arg, [3; LANE_WIDTH]);
    }

    #[test]
    fn strictly_greater_replaces() {
        let mut best = splat(-2.0);
        let mut arg = [1usize; LANE_WIDTH];
        select_greater(&mut best, &mut arg, splat(-1.0), 4);
        assert_eq!(best, splat(-1.0));
        assert_eq!(arg, [4; LANE_WIDTH]);
    }

    #[test]
    fn nan_candidates_never_win() {
        let mut best = splat(-3.0);
        let mut arg = [2usize; LANE_WIDTH];
        select_greater(&mut best, &mut arg, splat(f64::NAN), 5);
        assert_eq!(best, splat(-3.0));
        assert_eq!(arg, [2; LANE_WIDTH]);
    }

    #[test]
    fn mixed_lanes_select_independently() {
        let mut best = [-1.0, -5.0, 0.0, -2.0, -2.0, -9.0, 1.0, -0.5];
        let mut arg = [0usize; LANE_WIDTH];
        let cand = [-0.5, -6.0, 0.0, -1.0, -3.0, -8.0, 2.0, -0.5];
        select_greater(&mut best, &mut arg, cand, 9);
        assert_eq!(best, [-0.5, -5.0, 0.0, -1.0, -2.0, -8.0, 2.0, -0.5]);
        assert_eq!(arg, [9, 0, 0, 9, 0, 9, 9, 0]);
    }

    #[test]
    fn scalar_twin_matches_batched() {
        let candidates = [
            (-1.0, 0usize),
            (f64::NEG_INFINITY, 1),
            (-1.0, 2),
            (0.25, 3),
            (0.25, 4),
            (f64::NAN, 5),
        ];
        let mut best = splat(f64::NEG_INFINITY);
        let mut arg = [0usize; LANE_WIDTH];
        let mut sbest = f64::NEG_INFINITY;
        let mut sarg = 0usize;
        for (v, i) in candidates {
            select_greater(&mut best, &mut arg, splat(v), i);
            scalar_select_greater(&mut sbest, &mut sarg, v, i);
        }
        for k in 0..LANE_WIDTH {
            assert_eq!(best[k].to_bits(), sbest.to_bits());
            assert_eq!(arg[k], sarg);
        }
    }
}
