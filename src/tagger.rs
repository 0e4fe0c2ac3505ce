//! String-level tagging on top of the trainer and the decoder.

use std::io::BufRead;

use crate::decode::ViterbiDecoder;
use crate::error::Result;
use crate::model::Model;
use crate::trainer::{TrainedModel, Trainer};
use crate::vocab::Vocab;

/// Tags token sequences with the labels a trained model finds most likely.
///
/// Holds the two vocabularies next to the decoder so callers deal only in
/// strings. A token outside the training vocabulary is mapped to emission
/// id 0, the first token the corpus introduced; every such fallback is
/// counted and logged.
pub struct Tagger {
    decoder: ViterbiDecoder,
    tokens: Vocab,
    labels: Vocab,
    unknown_tokens: u64,
}

impl Tagger {
    /// Wrap a trained model, spawning one worker per available CPU.
    pub fn new(trained: TrainedModel) -> Self {
        let (model, tokens, labels) = trained.into_parts();
        Self {
            decoder: ViterbiDecoder::new(model),
            tokens,
            labels,
            unknown_tokens: 0,
        }
    }

    /// Wrap a trained model with an explicit worker count.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn with_workers(trained: TrainedModel, workers: usize) -> Self {
        let (model, tokens, labels) = trained.into_parts();
        Self {
            decoder: ViterbiDecoder::with_workers(model, workers),
            tokens,
            labels,
            unknown_tokens: 0,
        }
    }

    /// Train on one corpus and wrap the result. See [`Trainer`] for the
    /// corpus format.
    pub fn train<R: BufRead>(corpus: R) -> Result<Self> {
        let mut trainer = Trainer::new();
        trainer.read_corpus(corpus)?;
        Ok(Self::new(trainer.estimate()?))
    }

    /// [`train`](Tagger::train) with an explicit worker count.
    ///
    /// # Panics
    ///
    /// Panics if `workers == 0`.
    pub fn train_with_workers<R: BufRead>(corpus: R, workers: usize) -> Result<Self> {
        let mut trainer = Trainer::new();
        trainer.read_corpus(corpus)?;
        Ok(Self::with_workers(trainer.estimate()?, workers))
    }

    /// Most likely label for each token, in order.
    ///
    /// Ties resolve the same way for every worker count, so equal inputs
    /// always tag equally. An empty input yields an empty output.
    pub fn tag<S: AsRef<str>>(&mut self, tokens: &[S]) -> Vec<String> {
        let ids: Vec<usize> = tokens
            .iter()
            .map(|token| self.emission_id(token.as_ref()))
            .collect();
        self.decoder
            .decode(&ids)
            .into_iter()
            .map(|label| {
                self.labels
                    .token(label)
                    .expect("decoded label id is in the label vocabulary")
                    .to_owned()
            })
            .collect()
    }

    fn emission_id(&mut self, token: &str) -> usize {
        match self.tokens.id(token) {
            Some(id) => id,
            None => {
                self.unknown_tokens += 1;
                tracing::warn!(token, "token not in training vocabulary, using first-seen token");
                0
            }
        }
    }

    /// Running count of tokens that fell back to the unknown mapping.
    #[inline]
    pub fn unknown_tokens(&self) -> u64 {
        self.unknown_tokens
    }

    /// The trained model being decoded against.
    #[inline]
    pub fn model(&self) -> &Model {
        self.decoder.model()
    }

    /// Token vocabulary from training.
    #[inline]
    pub fn tokens(&self) -> &Vocab {
        &self.tokens
    }

    /// Label vocabulary from training.
    #[inline]
    pub fn labels(&self) -> &Vocab {
        &self.labels
    }

    /// Number of decoder worker threads.
    #[inline]
    pub fn workers(&self) -> usize {
        self.decoder.workers()
    }
}
