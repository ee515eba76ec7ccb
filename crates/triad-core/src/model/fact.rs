//! `IdentityFact` — the IMM record type (spec.md §3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{FactCategory, FactSource};

/// An exact key/value user attribute (name, diet, allergy, preferred address, ...).
///
/// Invariant: at most one fact per `key` is *active* — `IdentityStore::get_by_key`
/// returns the one with the highest confidence; duplicates are tolerated only
/// as history. `confidence` only increases under reinforcement (up to 1.0);
/// only conflict resolution may lower it, and only to 0.7 on replacement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityFact {
    pub id: String,
    pub key: String,
    pub value: String,
    pub category: FactCategory,
    pub confidence: f32,
    pub confirmation_count: u32,
    pub last_confirmed: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub source: FactSource,
}

impl IdentityFact {
    /// Build a freshly-extracted fact (write pipeline's "insert new" path,
    /// spec.md §4.8: initial confidence 0.8, confirmation_count 1, source explicit).
    pub fn new_explicit(key: impl Into<String>, value: impl Into<String>, category: FactCategory) -> Self {
        let now = Utc::now();
        Self {
            id: crate::similarity::new_id(),
            key: key.into(),
            value: value.into(),
            category,
            confidence: 0.8,
            confirmation_count: 1,
            last_confirmed: now,
            created_at: now,
            source: FactSource::Explicit,
        }
    }

    /// Reinforce on re-utterance: bump confidence (capped at 1.0), increment
    /// the confirmation count, refresh `last_confirmed`.
    pub fn reinforce(&mut self, delta: f32) {
        self.confidence = (self.confidence + delta).min(1.0);
        self.confirmation_count += 1;
        self.last_confirmed = Utc::now();
    }

    /// Drop confidence on conflict replacement (spec.md §3: "only conflict
    /// resolution may drop it, to 0.7 on replacement").
    pub fn replace_with_lowered_confidence(&mut self, new_value: impl Into<String>) {
        self.value = new_value.into();
        self.confidence = 0.7;
        self.confirmation_count = 1;
        self.last_confirmed = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_explicit_has_spec_defaults() {
        let fact = IdentityFact::new_explicit("name", "John", FactCategory::Identity);
        assert_eq!(fact.confidence, 0.8);
        assert_eq!(fact.confirmation_count, 1);
        assert_eq!(fact.source, FactSource::Explicit);
    }

    #[test]
    fn reinforce_caps_at_one() {
        let mut fact = IdentityFact::new_explicit("name", "John", FactCategory::Identity);
        fact.reinforce(0.5);
        assert!((fact.confidence - 1.0).abs() < 1e-6);
        fact.reinforce(0.5);
        assert!((fact.confidence - 1.0).abs() < 1e-6);
        assert_eq!(fact.confirmation_count, 3);
    }

    #[test]
    fn replace_drops_confidence_to_point_seven() {
        let mut fact = IdentityFact::new_explicit("name", "John", FactCategory::Identity);
        fact.reinforce(0.1);
        fact.replace_with_lowered_confidence("Alex");
        assert_eq!(fact.value, "Alex");
        assert!((fact.confidence - 0.7).abs() < 1e-6);
        assert_eq!(fact.confirmation_count, 1);
    }
}
