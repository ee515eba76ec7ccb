//! `ExperienceEntry` — the EMM record type (spec.md §3, §4.6, §4.10).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{Context, Role};

/// Minimum importance any experience entry can decay to.
pub const MIN_IMPORTANCE: f32 = 0.1;

/// Daily multiplicative decay applied to `original_importance`.
pub const DECAY_RATE: f32 = 0.95;

/// A conversational event with importance that decays over time.
///
/// Invariant: `MIN_IMPORTANCE <= importance <= original_importance` always.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: String,
    pub content: String,
    pub context: Context,
    pub timestamp: DateTime<Utc>,
    /// Current importance, monotonically non-increasing via decay.
    pub importance: f32,
    /// Importance at creation time — immutable, the decay anchor.
    pub original_importance: f32,
    pub role: Role,
    pub embedding: Option<Vec<f32>>,
}

impl ExperienceEntry {
    pub fn new(
        content: impl Into<String>,
        context: Context,
        role: Role,
        importance: f32,
        embedding: Option<Vec<f32>>,
    ) -> Self {
        let importance = importance.clamp(MIN_IMPORTANCE, 1.0);
        Self {
            id: crate::similarity::new_id(),
            content: content.into(),
            context,
            timestamp: Utc::now(),
            importance,
            original_importance: importance,
            role,
            embedding,
        }
    }

    /// Days elapsed between creation and `at`, never negative.
    pub fn days_since_creation(&self, at: DateTime<Utc>) -> f64 {
        (at - self.timestamp).num_seconds().max(0) as f64 / 86_400.0
    }

    /// Recompute `importance` from `original_importance` and elapsed days
    /// (spec.md §3: `importance = max(MIN_IMPORTANCE, original_importance * DECAY_RATE^days)`).
    /// Returns `true` if the value changed (store adapters use this to skip
    /// unnecessary writes during a decay sweep).
    pub fn apply_decay(&mut self, at: DateTime<Utc>) -> bool {
        let days = self.days_since_creation(at);
        let decayed = self.original_importance * DECAY_RATE.powf(days as f32);
        let new_importance = decayed.max(MIN_IMPORTANCE);
        if (new_importance - self.importance).abs() > f32::EPSILON {
            self.importance = new_importance;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn decay_never_drops_below_minimum() {
        let mut entry = ExperienceEntry::new("hi", Context::General, Role::User, 0.3, None);
        let far_future = entry.timestamp + Duration::days(100_000);
        entry.apply_decay(far_future);
        assert!((entry.importance - MIN_IMPORTANCE).abs() < 1e-6);
    }

    #[test]
    fn decay_at_creation_time_is_a_noop() {
        let mut entry = ExperienceEntry::new("hi", Context::General, Role::User, 0.6, None);
        let changed = entry.apply_decay(entry.timestamp);
        assert!(!changed);
        assert_eq!(entry.importance, entry.original_importance);
    }

    #[test]
    fn decay_matches_exponential_formula_after_one_day() {
        let mut entry = ExperienceEntry::new("hi", Context::General, Role::User, 0.6, None);
        let one_day_later = entry.timestamp + Duration::days(1);
        entry.apply_decay(one_day_later);
        let expected = (0.6_f32 * DECAY_RATE).max(MIN_IMPORTANCE);
        assert!((entry.importance - expected).abs() < 1e-4);
    }

    #[test]
    fn apply_decay_is_idempotent_at_same_instant() {
        let mut entry = ExperienceEntry::new("hi", Context::General, Role::User, 0.6, None);
        let t = entry.timestamp + Duration::days(5);
        entry.apply_decay(t);
        let after_first = entry.importance;
        entry.apply_decay(t);
        assert_eq!(entry.importance, after_first);
    }
}
