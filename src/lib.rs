//! Lane-batched parallel Viterbi decoding for part-of-speech tagging.
//!
//! This crate trains a first-order hidden-Markov model from a labeled token
//! corpus and decodes observation sequences with a Viterbi kernel that is
//! batched across label lanes and parallelized across a persistent pool of
//! worker threads.
//!
//! ## Core idea
//! 1. [`Trainer`] streams a token/label corpus into event counts and turns
//!    them into log-ratio [`Model`] parameters, with unseen events staying
//!    at log zero.
//! 2. [`ViterbiDecoder`] fills the trellis one column per barrier round;
//!    each worker owns a fixed range of label lanes and computes their
//!    max/argmax over all predecessors.
//! 3. [`Tagger`] wraps both behind a strings-in, strings-out API.
//!
//! Results are exact and deterministic: the recurrence resolves ties toward
//! the earliest label id with a strictly-greater comparison, so every worker
//! count, and the scalar reference path, selects the identical sequence.
//!
//! ## Quick start
//! ```
//! use lanetag::Tagger;
//!
//! // Token line, label line, blank line after each sentence.
//! let corpus = "the\nD\ncat\nN\n\n";
//! let mut tagger = Tagger::train(std::io::Cursor::new(corpus)).unwrap();
//! assert_eq!(tagger.tag(&["the", "cat"]), vec!["D", "N"]);
//! ```
//!
//! The trellis and backpointer storage grow to the longest input seen and
//! are reused across decodes, so steady-state tagging allocates only the
//! output path.

pub mod barrier;
pub mod builder;
pub mod decode;
pub mod error;
pub mod lanes;
pub mod matrix;
pub mod model;
pub mod pool;
pub mod tagger;
pub mod trainer;
pub mod vocab;

pub use crate::builder::DecoderBuilder;
pub use crate::decode::ViterbiDecoder;
pub use crate::error::{Error, Result};
pub use crate::model::Model;
pub use crate::tagger::Tagger;
pub use crate::trainer::{TrainedModel, Trainer};
pub use crate::vocab::Vocab;
