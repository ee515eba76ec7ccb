//! Knowledge store (C8, spec.md §4.7): durable skills/concepts with
//! reinforcement-boosted semantic search.

use std::sync::Arc;

use crate::error::StoreResult;
use crate::model::{KnowledgeCategory, KnowledgeEntry};
use crate::similarity::cosine_similarity;
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub struct ScoredKnowledge {
    pub entry: KnowledgeEntry,
    pub score: f32,
}

/// Snapshot read over the whole store (spec.md §6 supplemented features).
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeStats {
    pub count: u64,
    pub average_confidence: f32,
    pub average_reinforcement_count: f32,
}

pub struct KnowledgeStore {
    storage: Arc<Storage>,
}

impl KnowledgeStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn put(&self, entry: &KnowledgeEntry) -> StoreResult<()> {
        self.storage.put_knowledge_entry(entry)
    }

    pub fn get_all(&self) -> StoreResult<Vec<KnowledgeEntry>> {
        self.storage.list_knowledge_entries()
    }

    pub fn get_by_category(&self, category: KnowledgeCategory) -> StoreResult<Vec<KnowledgeEntry>> {
        self.storage.knowledge_entries_by_category(category)
    }

    /// `+1` reinforcement count, `+0.05` confidence capped at 1.0 (spec.md §4.7).
    pub fn reinforce(&self, id: &str) -> StoreResult<Option<KnowledgeEntry>> {
        let Some(mut entry) = self.storage.get_knowledge_entry(id)? else {
            return Ok(None);
        };
        entry.reinforce();
        self.storage.put_knowledge_entry(&entry)?;
        Ok(Some(entry))
    }

    pub fn delete(&self, id: &str) -> StoreResult<()> {
        self.storage.delete_knowledge_entry(id)
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.storage.clear_knowledge()
    }

    pub fn count(&self) -> StoreResult<u64> {
        self.storage.count_knowledge()
    }

    /// `search(query_embedding, top_k, threshold)` (spec.md §4.7):
    /// `score = sim * confidence * boost`, `boost = min(2.0, 1 + 0.1 * reinforcement_count)`.
    pub fn search(&self, query_embedding: &[f32], top_k: usize, threshold: f32) -> StoreResult<Vec<ScoredKnowledge>> {
        let mut scored: Vec<ScoredKnowledge> = self
            .get_all()?
            .into_iter()
            .filter_map(|entry| {
                let sim = cosine_similarity(query_embedding, &entry.embedding);
                let score = sim * entry.confidence * entry.reinforcement_boost();
                if score >= threshold {
                    Some(ScoredKnowledge { entry, score })
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        scored.truncate(top_k);
        Ok(scored)
    }

    pub fn stats(&self) -> StoreResult<KnowledgeStats> {
        let entries = self.get_all()?;
        if entries.is_empty() {
            return Ok(KnowledgeStats { count: 0, average_confidence: 0.0, average_reinforcement_count: 0.0 });
        }
        let n = entries.len() as f32;
        let average_confidence = entries.iter().map(|e| e.confidence).sum::<f32>() / n;
        let average_reinforcement_count = entries.iter().map(|e| e.reinforcement_count as f32).sum::<f32>() / n;
        Ok(KnowledgeStats { count: entries.len() as u64, average_confidence, average_reinforcement_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> KnowledgeStore {
        KnowledgeStore::new(Arc::new(Storage::open_in_memory().unwrap()))
    }

    #[test]
    fn reinforce_increases_search_score_for_the_same_query() {
        let store = store();
        let entry = KnowledgeEntry::new("knows python", vec![1.0, 0.0]);
        store.put(&entry).unwrap();

        let before = store.search(&[1.0, 0.0], 5, 0.0).unwrap()[0].score;
        store.reinforce(&entry.id).unwrap();
        let after = store.search(&[1.0, 0.0], 5, 0.0).unwrap()[0].score;

        assert!(after > before);
    }

    #[test]
    fn search_respects_threshold() {
        let store = store();
        let entry = KnowledgeEntry::new("knows python", vec![1.0, 0.0]);
        store.put(&entry).unwrap();
        let results = store.search(&[0.0, 1.0], 5, 0.1).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn get_by_category_filters() {
        let store = store();
        let mut concept = KnowledgeEntry::new("recursion", vec![1.0]);
        concept.category = KnowledgeCategory::Concept;
        store.put(&concept).unwrap();
        store.put(&KnowledgeEntry::new("juggling", vec![1.0])).unwrap();

        let concepts = store.get_by_category(KnowledgeCategory::Concept).unwrap();
        assert_eq!(concepts.len(), 1);
        assert_eq!(concepts[0].content, "recursion");
    }

    #[test]
    fn stats_averages_confidence_and_reinforcement() {
        let store = store();
        let mut reinforced = KnowledgeEntry::new("knows rust", vec![1.0]);
        reinforced.reinforce();
        reinforced.reinforce();
        store.put(&reinforced).unwrap();
        store.put(&KnowledgeEntry::new("knows go", vec![1.0])).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.count, 2);
        assert!((stats.average_reinforcement_count - 1.0).abs() < 1e-6);
    }
}
