//! Experience store (C8, spec.md §4.6): episodic entries with recency- and
//! importance-weighted semantic search, and the decay sweep.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::StoreResult;
use crate::model::{Context, ExperienceEntry};
use crate::similarity::cosine_similarity;
use crate::storage::Storage;

/// One semantic-search hit: the entry plus its combined score.
#[derive(Debug, Clone)]
pub struct ScoredExperience {
    pub entry: ExperienceEntry,
    pub score: f32,
}

/// Snapshot read over the whole store, for ambient observability (spec.md §6
/// supplemented features, grounded in the teacher's `MemoryStats`).
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceStats {
    pub count: u64,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
    pub average_importance: f32,
}

pub struct ExperienceStore {
    storage: Arc<Storage>,
}

impl ExperienceStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn put(&self, entry: &ExperienceEntry) -> StoreResult<()> {
        self.storage.put_experience_entry(entry)
    }

    pub fn get_all(&self) -> StoreResult<Vec<ExperienceEntry>> {
        self.storage.list_experience_entries()
    }

    pub fn get_by_context(&self, context: Context) -> StoreResult<Vec<ExperienceEntry>> {
        self.storage.experience_entries_by_context(context)
    }

    pub fn delete(&self, id: &str) -> StoreResult<()> {
        self.storage.delete_experience_entry(id)
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.storage.clear_experience()
    }

    pub fn count(&self) -> StoreResult<u64> {
        self.storage.count_experience()
    }

    /// `search(query_embedding, top_k, threshold, context?)` (spec.md §4.6):
    /// filter by context, discard un-embedded entries, score by
    /// `sim * importance * recency`, keep `score >= threshold`, truncate.
    pub fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        threshold: f32,
        context: Option<Context>,
    ) -> StoreResult<Vec<ScoredExperience>> {
        let now = Utc::now();
        let entries = match context {
            Some(c) => self.get_by_context(c)?,
            None => self.get_all()?,
        };

        let mut scored: Vec<ScoredExperience> = entries
            .into_iter()
            .filter_map(|entry| {
                let embedding = entry.embedding.as_ref()?;
                let sim = cosine_similarity(query_embedding, embedding);
                let days = entry.days_since_creation(now);
                let recency = (1.0 - (days / 30.0) as f32).max(0.5);
                let score = sim * entry.importance * recency;
                if score >= threshold {
                    Some(ScoredExperience { entry, score })
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
        scored.truncate(top_k);
        Ok(scored)
    }

    /// Recompute `importance` for every entry, writing back only the ones
    /// that changed (spec.md §4.6). Safe to call repeatedly.
    pub fn apply_decay(&self) -> StoreResult<usize> {
        let now = Utc::now();
        let mut updated = 0;
        for mut entry in self.get_all()? {
            if entry.apply_decay(now) {
                self.put(&entry)?;
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Entries with `importance >= 0.2`, most recent first (spec.md §4.6).
    pub fn get_recent(&self, limit: usize, context: Option<Context>) -> StoreResult<Vec<ExperienceEntry>> {
        let entries = match context {
            Some(c) => self.get_by_context(c)?,
            None => self.get_all()?,
        };
        let mut recent: Vec<ExperienceEntry> = entries.into_iter().filter(|e| e.importance >= 0.2).collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);
        Ok(recent)
    }

    /// Delete every entry whose (decayed) importance is below `threshold`,
    /// returning how many were removed (spec.md §3 lifecycle note; spec.md §6
    /// names this `prune`, grounded in the teacher's consolidation-sweep
    /// pruning config).
    pub fn prune(&self, threshold: f32) -> StoreResult<usize> {
        let mut pruned = 0;
        for entry in self.get_all()? {
            if entry.importance < threshold {
                self.delete(&entry.id)?;
                pruned += 1;
            }
        }
        Ok(pruned)
    }

    /// Count, oldest/newest timestamp, and mean importance across the store.
    pub fn stats(&self) -> StoreResult<ExperienceStats> {
        let entries = self.get_all()?;
        if entries.is_empty() {
            return Ok(ExperienceStats { count: 0, oldest: None, newest: None, average_importance: 0.0 });
        }
        let oldest = entries.iter().map(|e| e.timestamp).min();
        let newest = entries.iter().map(|e| e.timestamp).max();
        let average_importance = entries.iter().map(|e| e.importance).sum::<f32>() / entries.len() as f32;
        Ok(ExperienceStats { count: entries.len() as u64, oldest, newest, average_importance })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn store() -> ExperienceStore {
        ExperienceStore::new(Arc::new(Storage::open_in_memory().unwrap()))
    }

    #[test]
    fn search_skips_entries_without_an_embedding() {
        let store = store();
        let entry = ExperienceEntry::new("no embedding", Context::General, Role::User, 0.9, None);
        store.put(&entry).unwrap();
        let results = store.search(&[1.0, 0.0], 5, 0.0, None).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn search_filters_by_context() {
        let store = store();
        let work = ExperienceEntry::new("work thing", Context::Work, Role::User, 0.9, Some(vec![1.0, 0.0]));
        let family = ExperienceEntry::new("family thing", Context::Family, Role::User, 0.9, Some(vec![1.0, 0.0]));
        store.put(&work).unwrap();
        store.put(&family).unwrap();

        let results = store.search(&[1.0, 0.0], 5, 0.0, Some(Context::Work)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.content, "work thing");
    }

    #[test]
    fn apply_decay_updates_only_changed_entries() {
        let store = store();
        let entry = ExperienceEntry::new("hi", Context::General, Role::User, 0.6, None);
        store.put(&entry).unwrap();
        let updated = store.apply_decay().unwrap();
        assert_eq!(updated, 0, "no time has passed, nothing should change");
    }

    #[test]
    fn get_recent_excludes_low_importance_entries() {
        let store = store();
        let mut low = ExperienceEntry::new("faded", Context::General, Role::User, 0.6, None);
        low.importance = 0.1;
        store.put(&low).unwrap();
        let high = ExperienceEntry::new("fresh", Context::General, Role::User, 0.9, None);
        store.put(&high).unwrap();

        let recent = store.get_recent(10, None).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].content, "fresh");
    }

    #[test]
    fn prune_removes_only_entries_below_threshold() {
        let store = store();
        let mut faded = ExperienceEntry::new("faded", Context::General, Role::User, 0.6, None);
        faded.importance = 0.15;
        store.put(&faded).unwrap();
        let fresh = ExperienceEntry::new("fresh", Context::General, Role::User, 0.9, None);
        store.put(&fresh).unwrap();

        let pruned = store.prune(0.2).unwrap();
        assert_eq!(pruned, 1);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn stats_reports_count_and_average_importance() {
        let store = store();
        assert_eq!(store.stats().unwrap().count, 0);

        store.put(&ExperienceEntry::new("a", Context::General, Role::User, 0.4, None)).unwrap();
        store.put(&ExperienceEntry::new("b", Context::General, Role::User, 0.8, None)).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.count, 2);
        assert!((stats.average_importance - 0.6).abs() < 1e-6);
        assert!(stats.oldest.is_some() && stats.newest.is_some());
    }
}
