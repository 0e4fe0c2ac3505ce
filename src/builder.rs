use crate::decode::{default_workers, ViterbiDecoder, INITIAL_COLUMNS};
use crate::model::Model;

/// Configures a [`ViterbiDecoder`]: worker count and initial column
/// capacity, each defaulted when unset.
pub struct DecoderBuilder {
    model: Model,
    workers: Option<usize>,
    capacity: Option<usize>,
}

impl DecoderBuilder {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            workers: None,
            capacity: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_capacity(mut self, columns: usize) -> Self {
        self.capacity = Some(columns);
        self
    }

    /// Spawn the workers and hand over the decoder.
    ///
    /// # Panics
    ///
    /// Panics if a worker count of 0 was requested.
    pub fn build(self) -> ViterbiDecoder {
        let workers = self.workers.unwrap_or_else(default_workers);
        let capacity = self.capacity.unwrap_or(INITIAL_COLUMNS);
        ViterbiDecoder::from_builder(self.model, workers, capacity)
    }
}
