//! Retrieval pipeline (C11, spec.md §4.9): queries identity, experience and
//! knowledge independently, then merges and ranks by layer priority.

use serde_json::json;

use crate::embeddings::EmbeddingStatus;
use crate::error::Result;
use crate::model::Layer;

use super::engine::Engine;
use super::types::{MemoryResult, RetrieveOptions};

impl Engine {
    /// `retrieve(query, options)` (spec.md §4.9).
    pub async fn retrieve(&self, query: &str, options: &RetrieveOptions) -> Result<Vec<MemoryResult>> {
        let mut results = Vec::new();

        if options.include_identity {
            results.extend(self.retrieve_identity(query)?);
        }

        let query_embedding = if self.embeddings.status() == EmbeddingStatus::Ready {
            self.embeddings.embed(query).ok()
        } else {
            None
        };

        if let Some(embedding) = &query_embedding {
            if options.include_experience {
                results.extend(self.retrieve_experience(embedding, options)?);
            }
            if options.include_knowledge {
                results.extend(self.retrieve_knowledge(embedding, options)?);
            }
        }

        results.sort_by(|a, b| {
            b.layer
                .priority()
                .cmp(&a.layer.priority())
                .then_with(|| b.similarity.unwrap_or(b.confidence).partial_cmp(&a.similarity.unwrap_or(a.confidence)).unwrap())
        });
        results.truncate(options.top_k);
        Ok(results)
    }

    /// Identity facts always participate in retrieval regardless of
    /// embedding availability (spec.md §4.9): simple substring match, keep
    /// confidence above the configured floor, take at most 3.
    fn retrieve_identity(&self, query: &str) -> Result<Vec<MemoryResult>> {
        let mut facts = self.identity.search(query)?;
        facts.retain(|f| f.confidence >= self.config.identity_retrieval_min_confidence);
        facts.truncate(3);
        Ok(facts
            .into_iter()
            .map(|f| MemoryResult {
                layer: Layer::Imm,
                content: format!("{}: {}", f.key, f.value),
                confidence: f.confidence,
                similarity: None,
                timestamp: f.last_confirmed,
                metadata: json!({ "key": f.key, "confirmationCount": f.confirmation_count }),
            })
            .collect())
    }

    fn retrieve_experience(&self, query_embedding: &[f32], options: &RetrieveOptions) -> Result<Vec<MemoryResult>> {
        let hits = self.experience.search(query_embedding, options.top_k, options.semantic_threshold, options.context_filter)?;
        Ok(hits
            .into_iter()
            .map(|h| MemoryResult {
                layer: Layer::Emm,
                content: h.entry.content,
                confidence: h.entry.importance,
                similarity: Some(h.score),
                timestamp: h.entry.timestamp,
                metadata: json!({ "context": h.entry.context }),
            })
            .collect())
    }

    /// Knowledge entries use a tighter threshold (spec.md §4.7:
    /// `knowledge_threshold_ratio * semantic_threshold`) since durable facts
    /// should surface more readily than one-off experiences.
    fn retrieve_knowledge(&self, query_embedding: &[f32], options: &RetrieveOptions) -> Result<Vec<MemoryResult>> {
        let threshold = self.config.knowledge_threshold_ratio * options.semantic_threshold;
        let hits = self.knowledge.search(query_embedding, options.top_k, threshold)?;
        Ok(hits
            .into_iter()
            .map(|h| MemoryResult {
                layer: Layer::Kmm,
                content: h.entry.content,
                confidence: h.entry.confidence,
                similarity: Some(h.score),
                timestamp: h.entry.timestamp,
                metadata: json!({ "category": h.entry.category, "reinforcementCount": h.entry.reinforcement_count }),
            })
            .collect())
    }
}
