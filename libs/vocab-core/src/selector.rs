//! Exercise-type selection.
//!
//! Decides, per word and per session, whether to present a regular
//! (recognition) or reverse (typed production) exercise. Eligibility and
//! cooldown gates apply across sessions; coverage tracking is scoped to the
//! current session and lives in a side table owned by the session, not on
//! the persisted word.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::types::{Difficulty, ExerciseKind, Word};

/// Minimum gap before the same word may get another reverse exercise.
pub const REVERSE_COOLDOWN_MINUTES: i64 = 10;

/// A word qualifies for production exercises only once it has been reviewed
/// at least once, and only if its most recent review was not rated `hard`.
///
/// A word with `repetition > 0` but an empty history (possible only through
/// imported data) is treated as eligible.
pub fn is_eligible_for_reverse(word: &Word) -> bool {
    if word.repetition == 0 {
        return false;
    }
    word.review_history
        .last()
        .map_or(true, |record| record.difficulty != Difficulty::Hard)
}

/// Cooldown gate: blocks a reverse exercise only when the previous exercise
/// for this word was also reverse and was shown less than
/// [`REVERSE_COOLDOWN_MINUTES`] ago. Regular exercises are never blocked.
pub fn can_show_reverse(word: &Word, now: DateTime<Utc>) -> bool {
    match (word.last_exercise_date, word.last_exercise_type) {
        (Some(shown_at), Some(ExerciseKind::Reverse)) => {
            now - shown_at >= Duration::minutes(REVERSE_COOLDOWN_MINUTES)
        }
        _ => true,
    }
}

/// Pick the exercise type to show for the head of the session queue.
///
/// `shown_this_session` is the set of exercise types already presented for
/// this word in the current session; `queue_len` is the number of words still
/// in the session queue (including this one).
pub fn determine_exercise_type(
    word: &Word,
    shown_this_session: &HashSet<ExerciseKind>,
    queue_len: usize,
    now: DateTime<Utc>,
) -> ExerciseKind {
    if !is_eligible_for_reverse(word) || !can_show_reverse(word, now) {
        return ExerciseKind::Regular;
    }

    // A single-word queue alternates against the last shown type, so the
    // learner never loops on one exercise variant.
    if queue_len == 1 {
        return if word.last_exercise_type == Some(ExerciseKind::Reverse) {
            ExerciseKind::Regular
        } else {
            ExerciseKind::Reverse
        };
    }

    if !shown_this_session.contains(&ExerciseKind::Reverse) {
        ExerciseKind::Reverse
    } else {
        // Regular not yet shown, or both already shown: either way the word
        // settles on recognition for the rest of the session.
        ExerciseKind::Regular
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReviewRecord;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn reviewed_word(repetition: u32, last_difficulty: Option<Difficulty>) -> Word {
        let mut word = Word::new("cat", "кошка").unwrap();
        word.repetition = repetition;
        if let Some(difficulty) = last_difficulty {
            word.review_history.push(ReviewRecord {
                timestamp: now() - Duration::days(1),
                difficulty,
                exercise_type: ExerciseKind::Regular,
            });
        }
        word
    }

    #[test]
    fn brand_new_word_is_never_eligible() {
        let word = reviewed_word(0, None);
        assert!(!is_eligible_for_reverse(&word));

        // Even with history present, repetition 0 gates it out.
        let word = reviewed_word(0, Some(Difficulty::Easy));
        assert!(!is_eligible_for_reverse(&word));
    }

    #[test]
    fn last_hard_review_blocks_eligibility() {
        let word = reviewed_word(3, Some(Difficulty::Hard));
        assert!(!is_eligible_for_reverse(&word));
    }

    #[test]
    fn reviewed_word_is_eligible() {
        let word = reviewed_word(3, Some(Difficulty::Medium));
        assert!(is_eligible_for_reverse(&word));
    }

    #[test]
    fn imported_word_with_empty_history_is_eligible() {
        let word = reviewed_word(2, None);
        assert!(is_eligible_for_reverse(&word));
    }

    #[test]
    fn cooldown_blocks_recent_reverse() {
        let mut word = reviewed_word(3, Some(Difficulty::Easy));
        word.last_exercise_type = Some(ExerciseKind::Reverse);
        word.last_exercise_date = Some(now() - Duration::minutes(5));
        assert!(!can_show_reverse(&word, now()));

        word.last_exercise_date = Some(now() - Duration::minutes(15));
        assert!(can_show_reverse(&word, now()));
    }

    #[test]
    fn cooldown_ignores_regular_exercises() {
        let mut word = reviewed_word(3, Some(Difficulty::Easy));
        word.last_exercise_type = Some(ExerciseKind::Regular);
        word.last_exercise_date = Some(now() - Duration::minutes(1));
        assert!(can_show_reverse(&word, now()));
    }

    #[test]
    fn never_shown_word_passes_cooldown() {
        let word = reviewed_word(3, Some(Difficulty::Easy));
        assert!(can_show_reverse(&word, now()));
    }

    #[test]
    fn ineligible_word_gets_regular() {
        let word = reviewed_word(0, None);
        let shown = HashSet::new();
        assert_eq!(
            determine_exercise_type(&word, &shown, 4, now()),
            ExerciseKind::Regular
        );
    }

    #[test]
    fn eligible_word_gets_reverse_first() {
        let word = reviewed_word(3, Some(Difficulty::Easy));
        let shown = HashSet::new();
        assert_eq!(
            determine_exercise_type(&word, &shown, 4, now()),
            ExerciseKind::Reverse
        );
    }

    #[test]
    fn second_appearance_gets_regular() {
        let word = reviewed_word(3, Some(Difficulty::Easy));
        let shown: HashSet<_> = [ExerciseKind::Reverse].into_iter().collect();
        assert_eq!(
            determine_exercise_type(&word, &shown, 4, now()),
            ExerciseKind::Regular
        );
    }

    #[test]
    fn both_shown_defaults_to_regular() {
        let word = reviewed_word(3, Some(Difficulty::Easy));
        let shown: HashSet<_> = [ExerciseKind::Regular, ExerciseKind::Reverse]
            .into_iter()
            .collect();
        assert_eq!(
            determine_exercise_type(&word, &shown, 4, now()),
            ExerciseKind::Regular
        );
    }

    #[test]
    fn single_word_queue_alternates() {
        let mut word = reviewed_word(3, Some(Difficulty::Easy));
        let shown = HashSet::new();

        word.last_exercise_type = Some(ExerciseKind::Reverse);
        word.last_exercise_date = Some(now() - Duration::minutes(30));
        assert_eq!(
            determine_exercise_type(&word, &shown, 1, now()),
            ExerciseKind::Regular
        );

        word.last_exercise_type = Some(ExerciseKind::Regular);
        assert_eq!(
            determine_exercise_type(&word, &shown, 1, now()),
            ExerciseKind::Reverse
        );
    }
}
