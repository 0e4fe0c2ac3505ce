//! Maximum-likelihood model estimation from a labeled corpus.
//!
//! The corpus format is line-oriented: a token line followed by its label
//! line, repeated, with a blank line closing each sentence (including the
//! last). A trainer accumulates event counts over any number of corpus
//! reads and turns them into log-probability ratios at the end. Nothing is
//! smoothed: an unseen event estimates to log zero and stays impossible.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Model;
use crate::vocab::Vocab;

/// A [`Model`] together with the vocabularies its ids are defined over.
///
/// Only [`Trainer::estimate`] constructs one, so the model dimensions and
/// the vocabulary sizes always agree.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    model: Model,
    tokens: Vocab,
    labels: Vocab,
}

impl TrainedModel {
    #[inline]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Observable tokens, in corpus first-appearance order.
    #[inline]
    pub fn tokens(&self) -> &Vocab {
        &self.tokens
    }

    /// Hidden labels, in corpus first-appearance order.
    #[inline]
    pub fn labels(&self) -> &Vocab {
        &self.labels
    }

    /// Take the pieces apart, consuming the bundle.
    pub fn into_parts(self) -> (Model, Vocab, Vocab) {
        (self.model, self.tokens, self.labels)
    }
}

/// Accumulates corpus counts and estimates model parameters from them.
///
/// Counts follow the events the decoder scores: a label starting a
/// sentence, a label following a label, a label emitting a token. The
/// per-label totals count every occurrence of the label, so a label that
/// ends sentences transitions out less than it occurs and its outgoing
/// ratios reflect that.
#[derive(Debug, Default)]
pub struct Trainer {
    tokens: Vocab,
    labels: Vocab,
    sentences: u64,
    /// Sentence-initial occurrences per label.
    initial: Vec<u64>,
    /// Total occurrences per label; the ratio denominator.
    label_totals: Vec<u64>,
    transition_counts: HashMap<(usize, usize), u64>,
    emission_counts: HashMap<(usize, usize), u64>,
}

fn bump(counts: &mut Vec<u64>, index: usize) {
    if counts.len() <= index {
        counts.resize(index + 1, 0);
    }
    counts[index] += 1;
}

impl Trainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sentences counted so far.
    #[inline]
    pub fn sentences(&self) -> u64 {
        self.sentences
    }

    /// Distinct tokens seen so far.
    #[inline]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Distinct labels seen so far.
    #[inline]
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Read one corpus from `reader`, adding its events to the counts.
    ///
    /// Fails on the first malformed construct: a token line without a label
    /// line, a sentence separator with nothing before it, or a final
    /// sentence not closed by a blank line. Counts already accumulated from
    /// earlier reads are unaffected by a failed read of a later one.
    pub fn read_corpus<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut lines = reader.lines();
        let mut line_no = 0usize;
        let mut prev_label: Option<usize> = None;
        while let Some(line) = lines.next() {
            line_no += 1;
            let line = line?;
            let token = line.strip_suffix('\r').unwrap_or(&line);
            if token.is_empty() {
                match prev_label.take() {
                    Some(_) => self.sentences += 1,
                    None => return Err(Error::EmptySentence { line: line_no }),
                }
                continue;
            }
            let token_line = line_no;
            let label_line = match lines.next() {
                Some(next) => {
                    line_no += 1;
                    next?
                }
                None => {
                    return Err(Error::MissingLabel {
                        line: token_line,
                        token: token.to_owned(),
                    })
                }
            };
            let label = label_line.strip_suffix('\r').unwrap_or(&label_line);
            if label.is_empty() {
                return Err(Error::MissingLabel {
                    line: token_line,
                    token: token.to_owned(),
                });
            }
            let token_id = self.tokens.intern(token);
            let label_id = self.labels.intern(label);
            bump(&mut self.label_totals, label_id);
            match prev_label {
                None => bump(&mut self.initial, label_id),
                Some(prev) => {
                    *self.transition_counts.entry((prev, label_id)).or_insert(0) += 1;
                }
            }
            *self.emission_counts.entry((label_id, token_id)).or_insert(0) += 1;
            prev_label = Some(label_id);
        }
        if prev_label.is_some() {
            return Err(Error::UnterminatedSentence);
        }
        Ok(())
    }

    /// Read the corpus file at `path`. See [`read_corpus`].
    ///
    /// [`read_corpus`]: Trainer::read_corpus
    pub fn read_corpus_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path)?;
        self.read_corpus(BufReader::new(file))
    }

    /// Turn the accumulated counts into log-probability parameters.
    ///
    /// Start ratios are over sentences, transition and emission ratios over
    /// the source label's total occurrences. Events never counted keep the
    /// log-zero default.
    pub fn estimate(self) -> Result<TrainedModel> {
        if self.sentences == 0 {
            return Err(Error::EmptyCorpus);
        }
        let mut model = Model::new(self.labels.len(), self.tokens.len());
        let sentences = self.sentences as f64;
        for label in 0..self.labels.len() {
            if let Some(&count) = self.initial.get(label).filter(|c| **c > 0) {
                model.set_start(label, (count as f64 / sentences).ln());
            }
        }
        for (&(from, to), &count) in &self.transition_counts {
            let ratio = count as f64 / self.label_totals[from] as f64;
            model.set_transition(from, to, ratio.ln());
        }
        for (&(label, token), &count) in &self.emission_counts {
            let ratio = count as f64 / self.label_totals[label] as f64;
            model.set_emission(label, token, ratio.ln());
        }
        tracing::info!(
            sentences = self.sentences,
            tokens = self.tokens.len(),
            labels = self.labels.len(),
            "estimated model from corpus counts"
        );
        Ok(TrainedModel {
            model,
            tokens: self.tokens,
            labels: self.labels,
        })
    }
}
