//! The embedding provider contract (spec.md §6 "Embedding provider
//! (consumed)"). The model itself is an external collaborator out of scope
//! for this crate; this module defines the trait every store/router call
//! goes through, plus a deterministic stub implementation used for tests
//! and local development without a real model attached.

use std::sync::Arc;

use super::status::{EmbeddingStatus, StatusBroadcast, Subscription};

/// Embedding generation failed or the provider is not ready.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding provider is not ready (status: {0:?})")]
    NotReady(EmbeddingStatus),
    #[error("embedding generation failed: {0}")]
    Failed(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// `embed(text) -> vector<float>[D]`, L2-normalized and deterministic for
/// identical input (spec.md §6). Implementations decide their own
/// concurrency story; the trait itself only requires `Send + Sync` so it
/// can be shared behind an `Arc` across the single-threaded cooperative
/// pipeline (spec.md §5).
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Dimension `D` of vectors this provider returns.
    fn dimension(&self) -> usize;

    /// Current lifecycle status.
    fn status(&self) -> EmbeddingStatus;

    /// Subscribe to status changes (spec.md §6, §9).
    fn subscribe(&self, callback: Box<dyn Fn(EmbeddingStatus) + Send + Sync>) -> Subscription;
}

/// A deterministic, local stand-in for the real embedding service. Hashes
/// text into a unit vector so cosine similarity is stable and reproducible
/// without any model weights — suitable for tests and for local
/// development before a real provider is wired in.
pub struct StubEmbeddingProvider {
    dimension: usize,
    status: Arc<StatusBroadcast>,
}

impl StubEmbeddingProvider {
    /// Construct a provider that reports `Ready` immediately.
    pub fn ready(dimension: usize) -> Self {
        let status = Arc::new(StatusBroadcast::new());
        status.transition(EmbeddingStatus::Loading);
        status.transition(EmbeddingStatus::Ready);
        Self { dimension, status }
    }

    /// Construct a provider stuck in `Error`, for testing degraded paths
    /// (spec.md §4.11 failure semantics).
    pub fn errored(dimension: usize) -> Self {
        let status = Arc::new(StatusBroadcast::new());
        status.transition(EmbeddingStatus::Loading);
        status.transition(EmbeddingStatus::Error);
        Self { dimension, status }
    }

    fn hash_embed(&self, text: &str) -> Vec<f32> {
        // FNV-1a style rolling hash, reseeded per output dimension so the
        // resulting vector isn't degenerate (all dims equal).
        let mut vector = Vec::with_capacity(self.dimension);
        for dim in 0..self.dimension {
            let mut hash: u64 = 0xcbf29ce484222325 ^ (dim as u64);
            for byte in text.bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(0x100000001b3);
            }
            // Map to [-1, 1].
            let normalized = (hash % 2_000_001) as f32 / 1_000_000.0 - 1.0;
            vector.push(normalized);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

impl EmbeddingProvider for StubEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.status.current() != EmbeddingStatus::Ready {
            return Err(EmbeddingError::NotReady(self.status.current()));
        }
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("text cannot be empty".into()));
        }
        Ok(self.hash_embed(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn status(&self) -> EmbeddingStatus {
        self.status.current()
    }

    fn subscribe(&self, callback: Box<dyn Fn(EmbeddingStatus) + Send + Sync>) -> Subscription {
        self.status.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_stub_reports_ready_and_embeds_deterministically() {
        let provider = StubEmbeddingProvider::ready(16);
        assert_eq!(provider.status(), EmbeddingStatus::Ready);
        let a = provider.embed("hello world").unwrap();
        let b = provider.embed("hello world").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn different_text_embeds_differently() {
        let provider = StubEmbeddingProvider::ready(16);
        let a = provider.embed("hello").unwrap();
        let b = provider.embed("goodbye").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn errored_stub_refuses_to_embed() {
        let provider = StubEmbeddingProvider::errored(16);
        assert!(matches!(provider.embed("hi"), Err(EmbeddingError::NotReady(_))));
    }

    #[test]
    fn embed_rejects_empty_text() {
        let provider = StubEmbeddingProvider::ready(16);
        assert!(matches!(
            provider.embed("   "),
            Err(EmbeddingError::InvalidInput(_))
        ));
    }
}
