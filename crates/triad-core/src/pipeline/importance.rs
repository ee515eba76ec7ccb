//! Importance scoring (spec.md §4.10): how much weight a fresh experience
//! entry starts with.

use crate::model::Role;

const EMOTIONAL_WORDS: &[&str] = &[
    "love", "hate", "fear", "hope", "dream", "worry", "excited", "sad", "happy", "angry",
    "frustrated",
];

/// `importance(text, role) = clamp(base, 0, 1)` (spec.md §4.10):
/// base 0.5, +0.1 for a user utterance, +0.05 per emotional-word hit capped
/// at +0.2, +0.1 if the text contains `?`, +0.1 if word count > 20.
pub fn importance(text: &str, role: Role) -> f32 {
    let mut score = 0.5_f32;

    if role == Role::User {
        score += 0.1;
    }

    let lowered = text.to_lowercase();
    let emotional_hits = EMOTIONAL_WORDS.iter().filter(|w| lowered.contains(*w)).count();
    score += (0.05 * emotional_hits as f32).min(0.2);

    if text.contains('?') {
        score += 0.1;
    }

    if text.split_whitespace().count() > 20 {
        score += 0.1;
    }

    score.clamp(0.0, 1.0)
}
