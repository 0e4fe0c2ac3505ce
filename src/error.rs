//! Crate-wide error type.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while reading a corpus and estimating a
/// model from it.
///
/// Corpus shape problems carry the 1-based line number where they were
/// detected, so a bad file can be fixed without bisecting it.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying reader failed.
    #[error("corpus I/O: {0}")]
    Io(#[from] std::io::Error),

    /// A token line was not followed by a label line.
    #[error("corpus line {line}: token {token:?} has no label line")]
    MissingLabel { line: usize, token: String },

    /// A sentence separator appeared with no token/label pairs before it.
    #[error("corpus line {line}: empty sentence")]
    EmptySentence { line: usize },

    /// The corpus ended inside a sentence; every sentence must be closed by
    /// a blank line.
    #[error("corpus ended mid-sentence; expected a blank separator line")]
    UnterminatedSentence,

    /// The corpus contained no sentences at all.
    #[error("corpus contains no sentences")]
    EmptyCorpus,
}
