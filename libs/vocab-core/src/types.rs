//! Core types for the vocabulary trainer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Self-reported (or scored) recall difficulty for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Hard,
    Medium,
    Easy,
    Perfect,
}

impl Difficulty {
    /// Whether this rating counts as a correct answer for session statistics.
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Easy | Self::Perfect)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Medium => "medium",
            Self::Easy => "easy",
            Self::Perfect => "perfect",
        }
    }

    /// Parse from string tag.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hard" => Some(Self::Hard),
            "medium" => Some(Self::Medium),
            "easy" => Some(Self::Easy),
            "perfect" => Some(Self::Perfect),
            _ => None,
        }
    }
}

/// Direction of a flashcard exercise.
///
/// `Regular` shows the source word and asks for the translation;
/// `Reverse` shows the translation and asks the learner to type the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Regular,
    Reverse,
}

impl ExerciseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Reverse => "reverse",
        }
    }
}

/// One completed review, appended to a word's history. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub timestamp: DateTime<Utc>,
    pub difficulty: Difficulty,
    pub exercise_type: ExerciseKind,
}

fn default_ease() -> f64 {
    crate::scheduler::MIN_EASE
}

/// A vocabulary entry under active learning.
///
/// Scheduling fields (`repetition`, `ease_factor`, `next_review`,
/// `review_history`) are owned by the scheduler and written only through
/// [`crate::session::LearningSession::mark_difficulty`]. The cooldown cache
/// (`last_exercise_type`/`last_exercise_date`) is stamped when a card is
/// displayed and always mirrors the most recent exercise shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    pub source: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub repetition: u32,
    #[serde(default = "default_ease")]
    pub ease_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_history: Vec<ReviewRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exercise_type: Option<ExerciseKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exercise_date: Option<DateTime<Utc>>,
}

impl Word {
    /// Create a new word with default scheduling state and a fresh id.
    ///
    /// Rejects empty (after trimming) source or translation text.
    pub fn new(source: &str, translation: &str) -> Result<Self, ValidationError> {
        let source = source.trim();
        let translation = translation.trim();
        if source.is_empty() {
            return Err(ValidationError::EmptyField { field: "source" });
        }
        if translation.is_empty() {
            return Err(ValidationError::EmptyField { field: "translation" });
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            source: source.to_string(),
            translation: translation.to_string(),
            phonetic: None,
            definition: None,
            examples: Vec::new(),
            synonyms: Vec::new(),
            repetition: 0,
            ease_factor: default_ease(),
            next_review: None,
            review_history: Vec::new(),
            last_exercise_type: None,
            last_exercise_date: None,
        })
    }
}

/// The durable per-word scheduling state, as persisted by a
/// [`crate::store::ProgressStore`] keyed by word id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingFields {
    pub repetition: u32,
    pub ease_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_history: Vec<ReviewRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exercise_type: Option<ExerciseKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exercise_date: Option<DateTime<Utc>>,
}

impl From<&Word> for SchedulingFields {
    fn from(word: &Word) -> Self {
        Self {
            repetition: word.repetition,
            ease_factor: word.ease_factor,
            next_review: word.next_review,
            review_history: word.review_history.clone(),
            last_exercise_type: word.last_exercise_type,
            last_exercise_date: word.last_exercise_date,
        }
    }
}

impl SchedulingFields {
    /// Overwrite a word's scheduling state, e.g. after loading saved progress.
    pub fn apply_to(&self, word: &mut Word) {
        word.repetition = self.repetition;
        word.ease_factor = self.ease_factor;
        word.next_review = self.next_review;
        word.review_history = self.review_history.clone();
        word.last_exercise_type = self.last_exercise_type;
        word.last_exercise_date = self.last_exercise_date;
    }
}

/// Ordered, id-addressable collection of words. Iteration order is insertion
/// order, which the due-word filter relies on (stable filter, no sort).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    words: Vec<Word>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: Word) {
        self.words.push(word);
    }

    pub fn get(&self, id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Word> {
        self.words.iter_mut().find(|w| w.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<Vec<Word>> for Vocabulary {
    fn from(words: Vec<Word>) -> Self {
        Self { words }
    }
}

impl IntoIterator for Vocabulary {
    type Item = Word;
    type IntoIter = std::vec::IntoIter<Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.into_iter()
    }
}

/// Ephemeral per-session counters. Reset when a session starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub correct: u32,
    pub total: u32,
    pub streak: u32,
    pub best_streak: u32,
}

impl SessionStats {
    /// Record one answered exercise. The streak survives only easy/perfect
    /// ratings.
    pub fn record(&mut self, difficulty: Difficulty) {
        self.total += 1;
        if difficulty.is_correct() {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
    }

    /// Accuracy as a rounded percentage; 0 when nothing was answered.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// Descriptive mastery bucket derived from learning progress. Drives UI
/// statistics only; never feeds back into scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryTier {
    New,
    Learning,
    Familiar,
    Mastered,
}

impl MasteryTier {
    /// Bucket a 0-100 progress value at the 70/40/0 thresholds.
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            70..=u8::MAX => Self::Mastered,
            40..=69 => Self::Familiar,
            1..=39 => Self::Learning,
            0 => Self::New,
        }
    }
}
