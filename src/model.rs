//! First-order hidden-Markov model parameters in log space.
//!
//! All probabilities are natural-log values; cells never written stay at
//! negative infinity, meaning impossible. No smoothing is applied anywhere:
//! an event unseen at estimation time stays impossible at decode time.

use crate::lanes::{Lane, LANE_WIDTH};
use crate::matrix::LaneMatrix;

/// Start, transition and emission log-probabilities for `labels` hidden
/// labels over `emissions` observable symbols.
///
/// Transitions are stored transposed: the cell for `from -> to` lives at
/// `(row = to, col = from)`. One lane read of a `from` column therefore
/// yields the scores into `LANE_WIDTH` consecutive destination labels, which
/// is the access pattern of the decode recurrence.
#[derive(Debug, Clone)]
pub struct Model {
    labels: usize,
    emissions: usize,
    start: LaneMatrix<f64>,
    transition: LaneMatrix<f64>,
    emission: LaneMatrix<f64>,
}

impl Model {
    /// Create a model with every probability initialized to `-inf`.
    ///
    /// # Panics
    ///
    /// Panics if `labels == 0` or `emissions == 0`.
    pub fn new(labels: usize, emissions: usize) -> Self {
        assert!(labels > 0, "model must have at least one label");
        assert!(emissions > 0, "model must have at least one emission symbol");
        Self {
            labels,
            emissions,
            start: LaneMatrix::new(labels, 1, f64::NEG_INFINITY),
            transition: LaneMatrix::new(labels, labels, f64::NEG_INFINITY),
            emission: LaneMatrix::new(labels, emissions, f64::NEG_INFINITY),
        }
    }

    /// Number of hidden labels.
    #[inline]
    pub fn labels(&self) -> usize {
        self.labels
    }

    /// Number of observable emission symbols.
    #[inline]
    pub fn emissions(&self) -> usize {
        self.emissions
    }

    /// Log-probability of starting in `label`.
    #[inline]
    pub fn start(&self, label: usize) -> f64 {
        self.start.get(label, 0)
    }

    /// Set the log-probability of starting in `label`.
    #[inline]
    pub fn set_start(&mut self, label: usize, log_p: f64) {
        self.start.set(label, 0, log_p);
    }

    /// Log-probability of the transition `from -> to`.
    #[inline]
    pub fn transition(&self, from: usize, to: usize) -> f64 {
        self.transition.get(to, from)
    }

    /// Set the log-probability of the transition `from -> to`.
    #[inline]
    pub fn set_transition(&mut self, from: usize, to: usize, log_p: f64) {
        self.transition.set(to, from, log_p);
    }

    /// Log-probability of `label` emitting `symbol`.
    #[inline]
    pub fn emission(&self, label: usize, symbol: usize) -> f64 {
        self.emission.get(label, symbol)
    }

    /// Set the log-probability of `label` emitting `symbol`.
    #[inline]
    pub fn set_emission(&mut self, label: usize, symbol: usize, log_p: f64) {
        self.emission.set(label, symbol, log_p);
    }

    /// Start scores for the labels of lane `lane`.
    #[inline]
    pub fn start_lane(&self, lane: usize) -> Lane {
        self.start.lane(lane, 0)
    }

    /// Transition scores from `from` into the labels of lane `lane`.
    #[inline]
    pub fn transition_lane(&self, lane: usize, from: usize) -> Lane {
        self.transition.lane(lane, from)
    }

    /// Emission scores of `symbol` for the labels of lane `lane`.
    #[inline]
    pub fn emission_lane(&self, lane: usize, symbol: usize) -> Lane {
        self.emission.lane(lane, symbol)
    }

    /// Number of lanes covering the label dimension.
    #[inline]
    pub fn label_lanes(&self) -> usize {
        self.labels.div_ceil(LANE_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_probabilities_are_impossible() {
        let m = Model::new(3, 2);
        for label in 0..3 {
            assert_eq!(m.start(label), f64::NEG_INFINITY);
            for to in 0..3 {
                assert_eq!(m.transition(label, to), f64::NEG_INFINITY);
            }
            for sym in 0..2 {
                assert_eq!(m.emission(label, sym), f64::NEG_INFINITY);
            }
        }
    }

    #[test]
    fn setters_round_trip() {
        let mut m = Model::new(4, 3);
        m.set_start(2, -0.5);
        m.set_transition(1, 3, -1.5);
        m.set_emission(3, 0, -2.5);
        assert_eq!(m.start(2), -0.5);
        assert_eq!(m.transition(1, 3), -1.5);
        assert_eq!(m.emission(3, 0), -2.5);
        // Cells not written stay impossible.
        assert_eq!(m.transition(3, 1), f64::NEG_INFINITY);
        assert_eq!(m.emission(0, 0), f64::NEG_INFINITY);
    }

    #[test]
    fn transition_lane_groups_destinations_for_one_source() {
        let mut m = Model::new(10, 1);
        for to in 0..10 {
            m.set_transition(7, to, -(to as f64));
        }
        let lo = m.transition_lane(0, 7);
        let hi = m.transition_lane(1, 7);
        for k in 0..LANE_WIDTH {
            assert_eq!(lo[k], -(k as f64));
        }
        assert_eq!(hi[0], -8.0);
        assert_eq!(hi[1], -9.0);
        // Padding beyond the last real label is impossible.
        for k in 2..LANE_WIDTH {
            assert_eq!(hi[k], f64::NEG_INFINITY);
        }
    }

    #[test]
    fn label_lanes_round_up() {
        assert_eq!(Model::new(1, 1).label_lanes(), 1);
        assert_eq!(Model::new(8, 1).label_lanes(), 1);
        assert_eq!(Model::new(9, 1).label_lanes(), 2);
    }

    #[test]
    #[should_panic(expected = "at least one label")]
    fn zero_labels_is_rejected() {
        let _ = Model::new(0, 5);
    }

    #[test]
    #[should_panic(expected = "at least one emission")]
    fn zero_emissions_is_rejected() {
        let _ = Model::new(5, 0);
    }
}
