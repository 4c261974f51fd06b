//! Spaced-repetition scheduling.
//!
//! A simplified SM-2 variant: the review interval grows with the repetition
//! count scaled by a per-word ease factor, and each difficulty rating nudges
//! the ease factor inside a fixed band. All functions here are pure; the
//! clock is passed in by the caller.

use chrono::{DateTime, Duration, Utc};

use crate::types::{Difficulty, Vocabulary, Word};

/// Lower bound of the ease-factor band. Also the starting value for new words.
pub const MIN_EASE: f64 = 1.3;
/// Upper bound of the ease-factor band.
pub const MAX_EASE: f64 = 3.5;

/// New scheduling state for a word after one review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleUpdate {
    pub next_review: DateTime<Utc>,
    pub interval_days: u32,
    pub ease_factor: f64,
    pub repetition: u32,
}

/// Compute the next review date, ease factor, and repetition count from a
/// difficulty rating and the word's prior state.
///
/// Base interval: 1 day for the first review, 6 days for the second, then
/// `round(repetition * ease_factor)` days. A `hard` rating resets the
/// interval to a single day and deducts 0.15 ease; the other ratings grow
/// ease and scale the interval (`medium` x0.9, `easy` x1.0, `perfect` x1.2).
/// The ease factor is clamped into `[MIN_EASE, MAX_EASE]` and the interval
/// never drops below one day.
pub fn calculate_next_review(
    difficulty: Difficulty,
    repetition: u32,
    ease_factor: f64,
    now: DateTime<Utc>,
) -> ScheduleUpdate {
    let base = match repetition {
        0 => 1.0,
        1 => 6.0,
        n => (n as f64 * ease_factor).round(),
    };

    let (interval, ease_delta) = match difficulty {
        Difficulty::Hard => (1.0, -0.15),
        Difficulty::Medium => ((base * 0.9).round(), 0.05),
        Difficulty::Easy => (base, 0.15),
        Difficulty::Perfect => ((base * 1.2).round(), 0.25),
    };

    let interval_days = interval.max(1.0) as u32;
    let ease_factor = (ease_factor + ease_delta).clamp(MIN_EASE, MAX_EASE);

    ScheduleUpdate {
        next_review: now + Duration::days(interval_days as i64),
        interval_days,
        ease_factor,
        repetition: repetition + 1,
    }
}

/// Words due for review: never reviewed, or whose next review has passed.
///
/// Stable filter over insertion order; re-evaluates the vocabulary on every
/// call so the result always reflects current state.
pub fn words_for_review(
    vocabulary: &Vocabulary,
    now: DateTime<Utc>,
) -> impl Iterator<Item = &Word> {
    vocabulary
        .iter()
        .filter(move |word| word.next_review.map_or(true, |due| due <= now))
}

/// Rescale an ease factor to a 0-100 learning-progress percentage.
pub fn learning_progress(ease_factor: f64) -> u8 {
    let fraction = (ease_factor - MIN_EASE) / (MAX_EASE - MIN_EASE);
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
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

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn word_due(id: &str, next_review: Option<DateTime<Utc>>) -> Word {
        let mut word = Word::new(id, "перевод").unwrap();
        word.id = id.to_string();
        word.next_review = next_review;
        word
    }

    #[test]
    fn first_review_perfect() {
        let update = calculate_next_review(Difficulty::Perfect, 0, 1.3, now());
        assert_eq!(update.repetition, 1);
        assert_eq!(update.interval_days, 1); // round(1 * 1.2)
        assert_close(update.ease_factor, 1.55);
        assert_eq!(update.next_review, now() + Duration::days(1));
    }

    #[test]
    fn second_review_uses_six_day_base() {
        let update = calculate_next_review(Difficulty::Easy, 1, 1.5, now());
        assert_eq!(update.interval_days, 6);
        assert_close(update.ease_factor, 1.65);
        assert_eq!(update.repetition, 2);
    }

    #[test]
    fn mature_word_medium() {
        let update = calculate_next_review(Difficulty::Medium, 2, 1.45, now());
        // base round(2 * 1.45) = 3, scaled x0.9 -> round(2.7) = 3
        assert_eq!(update.interval_days, 3);
        assert_close(update.ease_factor, 1.5);
        assert_eq!(update.repetition, 3);
    }

    #[test]
    fn hard_resets_interval_to_one_day() {
        for repetition in [0, 1, 2, 5, 20] {
            for ease in [1.3, 2.0, 3.5] {
                let update = calculate_next_review(Difficulty::Hard, repetition, ease, now());
                assert_eq!(update.interval_days, 1);
            }
        }
    }

    #[test]
    fn ease_factor_stays_in_band() {
        for difficulty in [
            Difficulty::Hard,
            Difficulty::Medium,
            Difficulty::Easy,
            Difficulty::Perfect,
        ] {
            for repetition in [0, 1, 3, 10] {
                let mut ease = 1.3;
                while ease <= 3.5 {
                    let update = calculate_next_review(difficulty, repetition, ease, now());
                    assert!(update.ease_factor >= MIN_EASE, "{:?}", update);
                    assert!(update.ease_factor <= MAX_EASE, "{:?}", update);
                    ease += 0.1;
                }
            }
        }
    }

    #[test]
    fn hard_at_minimum_ease_stays_clamped() {
        let update = calculate_next_review(Difficulty::Hard, 4, 1.3, now());
        assert_eq!(update.ease_factor, MIN_EASE);
    }

    #[test]
    fn perfect_at_maximum_ease_stays_clamped() {
        let update = calculate_next_review(Difficulty::Perfect, 4, 3.5, now());
        assert_eq!(update.ease_factor, MAX_EASE);
    }

    #[test]
    fn interval_never_below_one_day() {
        let update = calculate_next_review(Difficulty::Medium, 0, 1.3, now());
        assert_eq!(update.interval_days, 1); // round(1 * 0.9) = 1
        assert!(update.next_review > now());
    }

    #[test]
    fn due_filter_returns_null_and_past_only() {
        let mut vocabulary = Vocabulary::new();
        vocabulary.push(word_due("never", None));
        vocabulary.push(word_due("past", Some(now() - Duration::days(2))));
        vocabulary.push(word_due("future", Some(now() + Duration::days(2))));
        vocabulary.push(word_due("exactly-now", Some(now())));

        let due: Vec<&str> = words_for_review(&vocabulary, now())
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(due, vec!["never", "past", "exactly-now"]);
    }

    #[test]
    fn due_filter_reflects_current_state() {
        let mut vocabulary = Vocabulary::new();
        vocabulary.push(word_due("w", None));
        assert_eq!(words_for_review(&vocabulary, now()).count(), 1);

        vocabulary.get_mut("w").unwrap().next_review = Some(now() + Duration::days(1));
        assert_eq!(words_for_review(&vocabulary, now()).count(), 0);
    }

    #[test]
    fn progress_endpoints_and_midpoint() {
        assert_eq!(learning_progress(1.3), 0);
        assert_eq!(learning_progress(3.5), 100);
        assert_eq!(learning_progress(2.4), 50);
    }

    #[test]
    fn progress_clamps_out_of_band_input() {
        assert_eq!(learning_progress(1.0), 0);
        assert_eq!(learning_progress(4.0), 100);
    }

    #[test]
    fn progress_is_monotonic() {
        let mut previous = 0;
        let mut ease = 1.3;
        while ease <= 3.5 {
            let progress = learning_progress(ease);
            assert!(progress >= previous);
            previous = progress;
            ease += 0.05;
        }
    }

    #[test]
    fn history_and_repetition_stay_in_step() {
        // Drive a word through several reviews the way the session does.
        let mut word = Word::new("cat", "кошка").unwrap();
        let mut current = now();
        for difficulty in [Difficulty::Easy, Difficulty::Hard, Difficulty::Perfect] {
            let update =
                calculate_next_review(difficulty, word.repetition, word.ease_factor, current);
            word.repetition = update.repetition;
            word.ease_factor = update.ease_factor;
            word.next_review = Some(update.next_review);
            word.review_history.push(ReviewRecord {
                timestamp: current,
                difficulty,
                exercise_type: crate::types::ExerciseKind::Regular,
            });
            current = update.next_review;
        }
        assert_eq!(word.repetition, 3);
        assert_eq!(word.review_history.len(), 3);
    }
}
