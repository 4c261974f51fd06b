//! Vocabulary export and import.
//!
//! Export produces a self-describing bundle of every word with its full
//! scheduling state. Import validates the bundle entry by entry and is
//! all-or-nothing: one malformed entry rejects the whole payload with an
//! error naming its position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ImportError;
use crate::types::{Vocabulary, Word};

/// Exported vocabulary bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub vocabulary: Vec<Word>,
    pub export_date: DateTime<Utc>,
    pub app_version: String,
    pub total_words: usize,
}

/// Build an export bundle from the current vocabulary.
pub fn create_export_data(vocabulary: &Vocabulary, now: DateTime<Utc>) -> ExportData {
    ExportData {
        vocabulary: vocabulary.words().to_vec(),
        export_date: now,
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        total_words: vocabulary.len(),
    }
}

/// Parse and validate an import payload from JSON text.
pub fn parse_import(json: &str) -> Result<Vocabulary, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    validate_import(&value)
}

/// Validate an already-parsed import payload and turn it into a vocabulary.
///
/// Required per entry: non-empty string `id`, non-empty `source` and
/// `translation`, numeric `ease_factor` and `repetition`, array-typed
/// `review_history`. Everything else falls back to word defaults.
pub fn validate_import(value: &Value) -> Result<Vocabulary, ImportError> {
    let object = value.as_object().ok_or(ImportError::NotAnObject)?;
    let vocabulary = object
        .get("vocabulary")
        .ok_or(ImportError::MissingVocabulary)?;
    let entries = vocabulary
        .as_array()
        .ok_or(ImportError::VocabularyNotArray)?;

    let mut words = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        validate_entry(index, entry)?;
        let word: Word = serde_json::from_value(entry.clone())
            .map_err(|e| ImportError::MalformedEntry {
                index,
                message: e.to_string(),
            })?;
        words.push(word);
    }

    Ok(Vocabulary::from(words))
}

fn validate_entry(index: usize, entry: &Value) -> Result<(), ImportError> {
    let object = entry.as_object().ok_or(ImportError::WrongType {
        index,
        field: "entry",
    })?;

    for field in ["id", "source", "translation"] {
        match object.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => {}
            Some(Value::String(_)) | None => {
                return Err(ImportError::MissingField { index, field })
            }
            Some(_) => return Err(ImportError::WrongType { index, field }),
        }
    }

    for field in ["ease_factor", "repetition"] {
        match object.get(field) {
            Some(Value::Number(_)) => {}
            None => return Err(ImportError::MissingField { index, field }),
            Some(_) => return Err(ImportError::WrongType { index, field }),
        }
    }

    match object.get("review_history") {
        Some(Value::Array(_)) => {}
        None => {
            return Err(ImportError::MissingField {
                index,
                field: "review_history",
            })
        }
        Some(_) => {
            return Err(ImportError::WrongType {
                index,
                field: "review_history",
            })
        }
    }

    Ok(())
}
