//! Core vocabulary-trainer library.
//!
//! Provides:
//! - Spaced-repetition scheduling (simplified SM-2 with a bounded ease factor)
//! - Typed-answer scoring (Levenshtein distance) for production exercises
//! - Exercise-type selection (recognition vs. production, with cooldowns)
//! - The learning session state machine
//! - Vocabulary export/import with all-or-nothing validation
//! - Shared types (Word, Difficulty, ExerciseKind, etc.)
//!
//! The library performs no I/O; persistence and rendering are supplied by the
//! embedding application through the [`store::ProgressStore`] trait and the
//! [`session::CardPrompt`] data bundle.

pub mod error;
pub mod scheduler;
pub mod scoring;
pub mod selector;
pub mod session;
pub mod store;
pub mod transfer;
pub mod types;

pub use error::{ImportError, SessionError, StoreError, ValidationError};
pub use scheduler::{
    calculate_next_review, learning_progress, words_for_review, ScheduleUpdate, MAX_EASE, MIN_EASE,
};
pub use scoring::{calculate_typing_accuracy, levenshtein_distance, normalize_text, TypingScore};
pub use selector::{
    can_show_reverse, determine_exercise_type, is_eligible_for_reverse, REVERSE_COOLDOWN_MINUTES,
};
pub use session::{CardPrompt, LearningSession, ReviewOutcome, SessionSummary};
pub use store::{MemoryStore, ProgressStore};
pub use transfer::{create_export_data, parse_import, validate_import, ExportData};
pub use types::{
    Difficulty, ExerciseKind, MasteryTier, ReviewRecord, SchedulingFields, SessionStats,
    Vocabulary, Word,
};
