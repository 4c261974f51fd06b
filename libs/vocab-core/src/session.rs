//! Learning session state machine.
//!
//! A session drains a shuffled queue of due words. For each word it asks the
//! selector which exercise to show, hands a [`CardPrompt`] data bundle to the
//! rendering layer, accepts a difficulty rating (a button press for regular
//! exercises, a scored typed answer for reverse ones), feeds it to the
//! scheduler, and advances. Persistence is optimistic: a failed save never
//! loses the in-memory update, and the caller may retry.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{SessionError, StoreError};
use crate::scheduler::{calculate_next_review, learning_progress, words_for_review, ScheduleUpdate};
use crate::scoring::{calculate_typing_accuracy, TypingScore};
use crate::selector::determine_exercise_type;
use crate::store::ProgressStore;
use crate::types::{
    Difficulty, ExerciseKind, ReviewRecord, SchedulingFields, SessionStats, Vocabulary,
};

/// Data bundle handed to the rendering layer for one displayed card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPrompt {
    pub word_id: String,
    pub kind: ExerciseKind,
    pub source: String,
    pub translation: String,
    pub phonetic: Option<String>,
    pub definition: Option<String>,
    pub examples: Vec<String>,
    pub synonyms: Vec<String>,
    /// Learning progress percentage for this word, 0-100.
    pub progress: u8,
    /// 1-based position within the session.
    pub position: usize,
    pub total: usize,
    pub stats: SessionStats,
}

/// Result of answering one exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub word_id: String,
    pub difficulty: Difficulty,
    pub exercise_type: ExerciseKind,
    pub schedule: ScheduleUpdate,
    /// Whether the scheduling update reached durable storage.
    pub persisted: bool,
    /// True when this answer drained the queue and completed the session.
    pub finished: bool,
}

/// Final report produced at session completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub total: u32,
    pub correct: u32,
    pub accuracy_percent: u32,
    pub best_streak: u32,
}

#[derive(Debug, Clone)]
struct CurrentCard {
    word_id: String,
    kind: ExerciseKind,
}

/// One bounded learning session over a shuffled queue of words.
#[derive(Debug)]
pub struct LearningSession {
    queue: VecDeque<String>,
    /// Exercise types already shown per word, this session only. Discarded
    /// with the session; never persisted on the word.
    coverage: HashMap<String, HashSet<ExerciseKind>>,
    stats: SessionStats,
    total: usize,
    answered: usize,
    current: Option<CurrentCard>,
    pending_save: Option<String>,
    complete: bool,
}

impl LearningSession {
    /// Start a session over the words currently due for review.
    ///
    /// Errors with [`SessionError::EmptyVocabulary`] when there is nothing to
    /// learn at all, and [`SessionError::NoWordsDue`] when the vocabulary is
    /// non-empty but nothing is due; the caller may then fall back to
    /// [`LearningSession::start_all`].
    pub fn start_due(
        vocabulary: &Vocabulary,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<Self, SessionError> {
        if vocabulary.is_empty() {
            return Err(SessionError::EmptyVocabulary);
        }
        let due: Vec<String> = words_for_review(vocabulary, now)
            .map(|word| word.id.clone())
            .collect();
        if due.is_empty() {
            return Err(SessionError::NoWordsDue);
        }
        Ok(Self::with_queue(due, rng))
    }

    /// Force-start a practice session over the entire vocabulary, ignoring
    /// due dates.
    pub fn start_all(vocabulary: &Vocabulary, rng: &mut impl Rng) -> Result<Self, SessionError> {
        if vocabulary.is_empty() {
            return Err(SessionError::EmptyVocabulary);
        }
        let all: Vec<String> = vocabulary.iter().map(|word| word.id.clone()).collect();
        Ok(Self::with_queue(all, rng))
    }

    fn with_queue(mut ids: Vec<String>, rng: &mut impl Rng) -> Self {
        ids.shuffle(rng);
        debug!(words = ids.len(), "learning session started");
        Self {
            total: ids.len(),
            queue: ids.into(),
            coverage: HashMap::new(),
            stats: SessionStats::default(),
            answered: 0,
            current: None,
            pending_save: None,
            complete: false,
        }
    }

    /// Display the card at the head of the queue.
    ///
    /// Picks the exercise type and stamps the word's cooldown metadata at
    /// display time (the cooldown clock starts when an exercise is shown,
    /// not when it is answered). Returns `None` once the queue is drained.
    pub fn show_card(&mut self, vocabulary: &mut Vocabulary, now: DateTime<Utc>) -> Option<CardPrompt> {
        if self.complete {
            return None;
        }

        loop {
            let word_id = match self.queue.front() {
                Some(id) => id.clone(),
                None => {
                    self.finish();
                    return None;
                }
            };

            let queue_len = self.queue.len();
            let Some(word) = vocabulary.get_mut(&word_id) else {
                // Word deleted underneath the session; skip it.
                self.queue.pop_front();
                continue;
            };

            let shown = self.coverage.entry(word_id.clone()).or_default();
            let kind = determine_exercise_type(word, shown, queue_len, now);

            word.last_exercise_type = Some(kind);
            word.last_exercise_date = Some(now);

            self.current = Some(CurrentCard {
                word_id: word_id.clone(),
                kind,
            });
            debug!(word = %word_id, kind = kind.as_str(), "card shown");

            return Some(CardPrompt {
                word_id,
                kind,
                source: word.source.clone(),
                translation: word.translation.clone(),
                phonetic: word.phonetic.clone(),
                definition: word.definition.clone(),
                examples: word.examples.clone(),
                synonyms: word.synonyms.clone(),
                progress: learning_progress(word.ease_factor),
                position: self.answered + 1,
                total: self.total,
                stats: self.stats,
            });
        }
    }

    /// Record a difficulty rating for the currently displayed card.
    ///
    /// Updates the word's scheduling state, appends the review record, tracks
    /// session coverage and statistics, pops the queue, and persists the new
    /// scheduling fields. A failed save is logged and reported through
    /// [`ReviewOutcome::persisted`]; the in-memory update stands either way.
    pub fn mark_difficulty(
        &mut self,
        vocabulary: &mut Vocabulary,
        store: &mut dyn ProgressStore,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, SessionError> {
        let current = self.current.take().ok_or(SessionError::NoCurrentCard)?;
        let word = vocabulary
            .get_mut(&current.word_id)
            .ok_or_else(|| SessionError::WordNotFound(current.word_id.clone()))?;

        let schedule = calculate_next_review(difficulty, word.repetition, word.ease_factor, now);
        word.repetition = schedule.repetition;
        word.ease_factor = schedule.ease_factor;
        word.next_review = Some(schedule.next_review);
        word.review_history.push(ReviewRecord {
            timestamp: now,
            difficulty,
            exercise_type: current.kind,
        });

        self.coverage
            .entry(current.word_id.clone())
            .or_default()
            .insert(current.kind);
        self.stats.record(difficulty);

        self.queue.pop_front();
        self.answered += 1;

        let fields = SchedulingFields::from(&*word);
        let persisted = match store.save_word_progress(&current.word_id, &fields) {
            Ok(()) => true,
            Err(e) => {
                warn!(word = %current.word_id, error = %e, "failed to persist review");
                self.pending_save = Some(current.word_id.clone());
                false
            }
        };

        let finished = self.queue.is_empty();
        if finished {
            self.finish();
        }

        Ok(ReviewOutcome {
            word_id: current.word_id,
            difficulty,
            exercise_type: current.kind,
            schedule,
            persisted,
            finished,
        })
    }

    /// Score a typed production attempt for the current reverse exercise and
    /// record the resulting difficulty, exactly as if the matching button had
    /// been pressed.
    pub fn grade_typed_answer(
        &mut self,
        vocabulary: &mut Vocabulary,
        store: &mut dyn ProgressStore,
        typed: &str,
        now: DateTime<Utc>,
    ) -> Result<(TypingScore, ReviewOutcome), SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoCurrentCard)?;
        if current.kind != ExerciseKind::Reverse {
            return Err(SessionError::NotReverseExercise);
        }
        let word = vocabulary
            .get(&current.word_id)
            .ok_or_else(|| SessionError::WordNotFound(current.word_id.clone()))?;

        let score = calculate_typing_accuracy(typed, &word.source);
        let outcome = self.mark_difficulty(vocabulary, store, score.difficulty, now)?;
        Ok((score, outcome))
    }

    /// Escape hatch for reverse exercises: reveal the expected source text
    /// without scoring. The learner must still rate the card manually via
    /// [`LearningSession::mark_difficulty`].
    pub fn reveal_answer<'a>(&self, vocabulary: &'a Vocabulary) -> Result<&'a str, SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoCurrentCard)?;
        let word = vocabulary
            .get(&current.word_id)
            .ok_or_else(|| SessionError::WordNotFound(current.word_id.clone()))?;
        Ok(&word.source)
    }

    /// Retry the persistence of the last review whose save failed.
    pub fn retry_persist(
        &mut self,
        vocabulary: &Vocabulary,
        store: &mut dyn ProgressStore,
    ) -> Result<(), StoreError> {
        let Some(id) = self.pending_save.clone() else {
            return Ok(());
        };
        if let Some(word) = vocabulary.get(&id) {
            store.save_word_progress(&id, &SchedulingFields::from(word))?;
        }
        self.pending_save = None;
        Ok(())
    }

    /// Abandon the session, discarding the queue and statistics.
    pub fn abandon(&mut self) {
        debug!(answered = self.answered, "session abandoned");
        self.queue.clear();
        self.current = None;
        self.coverage.clear();
        self.complete = true;
    }

    fn finish(&mut self) {
        if !self.complete {
            self.complete = true;
            self.current = None;
            debug!(
                total = self.stats.total,
                correct = self.stats.correct,
                "session complete"
            );
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Words remaining in the queue, including any currently displayed card.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// True when the last review could not be persisted and a retry is due.
    pub fn has_pending_save(&self) -> bool {
        self.pending_save.is_some()
    }

    /// Final statistics report for the completion screen.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total: self.stats.total,
            correct: self.stats.correct,
            accuracy_percent: self.stats.accuracy_percent(),
            best_streak: self.stats.best_streak,
        }
    }
}
