//! Error types for vocab-core.
//!
//! Each concern gets its own enum: validation failures are boundary errors,
//! session errors are contract violations that should be unreachable with a
//! well-behaved caller, and store errors wrap transient persistence failures.

use thiserror::Error;

/// Errors raised when creating or editing a word.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("word is missing required {field} text")]
    EmptyField { field: &'static str },
}

/// Errors raised while validating imported vocabulary data.
///
/// Import is all-or-nothing: the first violation rejects the entire payload,
/// and the error identifies the offending entry's position.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("import payload is not a JSON object")]
    NotAnObject,

    #[error("import payload has no vocabulary field")]
    MissingVocabulary,

    #[error("vocabulary field is not an array")]
    VocabularyNotArray,

    #[error("vocabulary entry {index}: missing or empty {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("vocabulary entry {index}: {field} has the wrong type")]
    WrongType { index: usize, field: &'static str },

    #[error("vocabulary entry {index}: {message}")]
    MalformedEntry { index: usize, message: String },
}

/// Errors raised by the learning session state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("vocabulary is empty")]
    EmptyVocabulary,

    #[error("no words are due for review")]
    NoWordsDue,

    #[error("no card is currently displayed")]
    NoCurrentCard,

    #[error("current card is not a typing exercise")]
    NotReverseExercise,

    #[error("word {0} is no longer in the vocabulary")]
    WordNotFound(String),
}

/// Failure reported by a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}
