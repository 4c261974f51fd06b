//! Typed-answer scoring for reverse exercises.
//!
//! Free-text input is normalized, compared against the target with
//! Levenshtein distance, and translated into a 0-100 accuracy score plus a
//! difficulty tier the scheduler can consume.

use serde::{Deserialize, Serialize};

use crate::types::Difficulty;

/// Punctuation stripped before comparison.
const STRIPPED_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Result of scoring a typed answer against the expected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingScore {
    /// Relative accuracy, 0-100.
    pub accuracy: u8,
    /// Difficulty tier fed into the scheduler.
    pub difficulty: Difficulty,
}

/// Normalize text for comparison: lowercase, strip sentence punctuation,
/// trim, and collapse whitespace runs to single spaces.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .replace(STRIPPED_PUNCTUATION, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Levenshtein distance between two strings, by character.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rolling rows instead of the full matrix.
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Score a typed answer against the correct one.
///
/// An exact match after normalization short-circuits to accuracy 100 and a
/// `perfect` rating; that is the only path producing `perfect`. Inexact
/// answers are tiered at 90 (`easy`) and 70 (`medium`), anything below is
/// `hard`.
pub fn calculate_typing_accuracy(user_input: &str, correct_answer: &str) -> TypingScore {
    let typed = normalize_text(user_input);
    let correct = normalize_text(correct_answer);

    if typed == correct {
        return TypingScore {
            accuracy: 100,
            difficulty: Difficulty::Perfect,
        };
    }

    let max_len = typed.chars().count().max(correct.chars().count());
    let distance = levenshtein_distance(&typed, &correct);
    let accuracy = ((1.0 - distance as f64 / max_len as f64) * 100.0)
        .round()
        .max(0.0) as u8;

    let difficulty = match accuracy {
        90..=u8::MAX => Difficulty::Easy,
        70..=89 => Difficulty::Medium,
        _ => Difficulty::Hard,
    };

    TypingScore {
        accuracy,
        difficulty,
    }
}
