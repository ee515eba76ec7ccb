//! Identity store (C8, spec.md §4.5): exact key/value lookups, never
//! embedded, never semantically searched.

use std::sync::Arc;

use crate::error::StoreResult;
use crate::model::IdentityFact;
use crate::storage::Storage;

pub struct IdentityStore {
    storage: Arc<Storage>,
}

impl IdentityStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn put(&self, fact: &IdentityFact) -> StoreResult<()> {
        self.storage.put_identity_fact(fact)
    }

    /// Highest-confidence fact for `key`, or `None` (spec.md §4.5).
    pub fn get_by_key(&self, key: &str) -> StoreResult<Option<IdentityFact>> {
        Ok(self.storage.facts_by_key(key)?.into_iter().next())
    }

    /// Bump confidence (capped at 1.0), increment `confirmation_count`,
    /// refresh `last_confirmed` (spec.md §4.5).
    pub fn update_confidence(&self, id: &str, confidence: f32) -> StoreResult<Option<IdentityFact>> {
        let Some(mut fact) = self.storage.get_identity_fact(id)? else {
            return Ok(None);
        };
        fact.confidence = confidence.min(1.0);
        fact.confirmation_count += 1;
        fact.last_confirmed = chrono::Utc::now();
        self.storage.put_identity_fact(&fact)?;
        Ok(Some(fact))
    }

    pub fn delete(&self, id: &str) -> StoreResult<()> {
        self.storage.delete_identity_fact(id)
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.storage.clear_identity()
    }

    pub fn count(&self) -> StoreResult<u64> {
        self.storage.count_identity()
    }

    /// Case-insensitive substring match over key/value/category, sorted by
    /// confidence descending (spec.md §4.5).
    pub fn search(&self, query: &str) -> StoreResult<Vec<IdentityFact>> {
        let needle = query.to_lowercase();
        let mut matches: Vec<IdentityFact> = self
            .storage
            .list_identity_facts()?
            .into_iter()
            .filter(|fact| {
                fact.key.to_lowercase().contains(&needle)
                    || fact.value.to_lowercase().contains(&needle)
                    || format!("{:?}", fact.category).to_lowercase().contains(&needle)
            })
            .collect();
        matches.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap());
        Ok(matches)
    }

    /// Count and mean confidence across every stored fact, including
    /// superseded duplicates (spec.md §6 supplemented features).
    pub fn stats(&self) -> StoreResult<IdentityStats> {
        let facts = self.storage.list_identity_facts()?;
        if facts.is_empty() {
            return Ok(IdentityStats { count: 0, average_confidence: 0.0 });
        }
        let average_confidence = facts.iter().map(|f| f.confidence).sum::<f32>() / facts.len() as f32;
        Ok(IdentityStats { count: facts.len() as u64, average_confidence })
    }
}

/// Snapshot read over the whole store (spec.md §6 supplemented features).
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityStats {
    pub count: u64,
    pub average_confidence: f32,
}
