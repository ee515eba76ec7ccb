//! `KnowledgeEntry` — the KMM record type (spec.md §3, §4.7).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::KnowledgeCategory;

/// A durable skill/concept/fact. Embedding is mandatory — KMM writes fail
/// loudly when embeddings are unavailable (spec.md §4.8, §4.11).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeEntry {
    pub id: String,
    pub content: String,
    pub category: KnowledgeCategory,
    pub embedding: Vec<f32>,
    pub confidence: f32,
    pub reinforcement_count: u32,
    pub timestamp: DateTime<Utc>,
}

impl KnowledgeEntry {
    /// Write pipeline's KMM insert (spec.md §4.8: initial confidence 0.6,
    /// reinforcement_count 0, category skill).
    pub fn new(content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: crate::similarity::new_id(),
            content: content.into(),
            category: KnowledgeCategory::Skill,
            embedding,
            confidence: 0.6,
            reinforcement_count: 0,
            timestamp: Utc::now(),
        }
    }

    /// Reinforcement adds 0.05 confidence (capped at 1.0) and increments count.
    pub fn reinforce(&mut self) {
        self.confidence = (self.confidence + 0.05).min(1.0);
        self.reinforcement_count += 1;
    }

    /// `boost = min(2.0, 1 + 0.1 * reinforcement_count)` (spec.md §4.7).
    pub fn reinforcement_boost(&self) -> f32 {
        (1.0 + 0.1 * self.reinforcement_count as f32).min(2.0)
    }
}
