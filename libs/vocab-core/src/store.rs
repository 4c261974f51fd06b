//! Persistence contract.
//!
//! The core never performs I/O itself; embedders supply a [`ProgressStore`]
//! backed by whatever key-value storage they have. [`MemoryStore`] is the
//! reference implementation, also used throughout the test suite.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::types::{SchedulingFields, Word};

/// Storage backend for the vocabulary and per-word scheduling progress.
///
/// Progress is keyed by word id. A scheduling update is only durable once
/// `save_word_progress` (or a full `save_progress`) succeeds; the session
/// keeps its in-memory state ahead of durable state on failure and offers a
/// retry.
pub trait ProgressStore {
    fn load_vocabulary(&self) -> Result<Vec<Word>, StoreError>;

    fn save_vocabulary(&mut self, words: &[Word]) -> Result<(), StoreError>;

    fn load_progress(&self) -> Result<HashMap<String, SchedulingFields>, StoreError>;

    fn save_progress(
        &mut self,
        progress: &HashMap<String, SchedulingFields>,
    ) -> Result<(), StoreError>;

    /// Persist the scheduling state of a single word.
    fn save_word_progress(&mut self, id: &str, fields: &SchedulingFields)
        -> Result<(), StoreError>;
}

/// In-memory store. Round-trips every field bit-for-bit by construction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    vocabulary: Vec<Word>,
    progress: HashMap<String, SchedulingFields>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved scheduling state for one word, if any.
    pub fn progress_for(&self, id: &str) -> Option<&SchedulingFields> {
        self.progress.get(id)
    }
}

impl ProgressStore for MemoryStore {
    fn load_vocabulary(&self) -> Result<Vec<Word>, StoreError> {
        Ok(self.vocabulary.clone())
    }

    fn save_vocabulary(&mut self, words: &[Word]) -> Result<(), StoreError> {
        self.vocabulary = words.to_vec();
        Ok(())
    }

    fn load_progress(&self) -> Result<HashMap<String, SchedulingFields>, StoreError> {
        Ok(self.progress.clone())
    }

    fn save_progress(
        &mut self,
        progress: &HashMap<String, SchedulingFields>,
    ) -> Result<(), StoreError> {
        self.progress = progress.clone();
        Ok(())
    }

    fn save_word_progress(
        &mut self,
        id: &str,
        fields: &SchedulingFields,
    ) -> Result<(), StoreError> {
        self.progress.insert(id.to_string(), fields.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn vocabulary_round_trip() {
        let mut store = MemoryStore::new();
        let words = vec![
            Word::new("cat", "кошка").unwrap(),
            Word::new("dog", "собака").unwrap(),
        ];
        store.save_vocabulary(&words).unwrap();
        assert_eq!(store.load_vocabulary().unwrap(), words);
    }

    #[test]
    fn word_progress_round_trip() {
        let mut store = MemoryStore::new();
        let mut word = Word::new("cat", "кошка").unwrap();
        word.repetition = 2;
        word.ease_factor = 1.6;

        let fields = SchedulingFields::from(&word);
        store.save_word_progress(&word.id, &fields).unwrap();

        assert_eq!(store.progress_for(&word.id), Some(&fields));
        assert_eq!(store.load_progress().unwrap().len(), 1);
    }
}
