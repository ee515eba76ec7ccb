//! Isolated test database + engine setup, one per test, auto-cleaned up
//! (teacher pattern: `harness::db_manager::TestDbManager`).

use std::sync::Arc;

use tempfile::TempDir;
use triad_core::embeddings::StubEmbeddingProvider;
use triad_core::storage::Storage;
use triad_core::{Engine, TriadConfig};

/// Owns the `TempDir` so the SQLite file is deleted when the test ends.
pub struct TestHarness {
    _dir: TempDir,
    pub engine: Engine,
}

impl TestHarness {
    /// A fresh on-disk database with a deterministic, always-ready stub
    /// embedding provider.
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let db_path = dir.path().join("triad.sqlite3");
        let storage = Arc::new(Storage::new(Some(db_path)).expect("open storage"));
        let embeddings: Arc<dyn triad_core::embeddings::EmbeddingProvider> = Arc::new(StubEmbeddingProvider::ready(32));
        let engine = Engine::new(storage, embeddings, TriadConfig::default()).expect("construct engine");
        engine.init().await.expect("init engine");
        Self { _dir: dir, engine }
    }

    /// Same as `new`, but the embedding provider is stuck in `Error` so
    /// tests can exercise degraded retrieval/write paths.
    pub async fn new_without_embeddings() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let db_path = dir.path().join("triad.sqlite3");
        let storage = Arc::new(Storage::new(Some(db_path)).expect("open storage"));
        let embeddings: Arc<dyn triad_core::embeddings::EmbeddingProvider> = Arc::new(StubEmbeddingProvider::errored(32));
        let engine = Engine::new(storage, embeddings, TriadConfig::default()).expect("construct engine");
        engine.init().await.expect("init engine");
        Self { _dir: dir, engine }
    }
}
