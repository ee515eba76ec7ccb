//! End-to-end scenarios exercising `Engine` across process-like boundaries:
//! a fresh on-disk store, real routing decisions, and persistence across a
//! simulated restart (new `Engine` over the same database file).

use std::sync::Arc;

use triad_core::embeddings::StubEmbeddingProvider;
use triad_core::model::Layer;
use triad_core::storage::Storage;
use triad_core::{Engine, RetrieveOptions, TriadConfig};
use triad_e2e_tests::{fixtures, harness::TestHarness};

#[tokio::test]
async fn a_name_declaration_round_trips_through_identity_memory() {
    let harness = TestHarness::new().await;

    let result = harness.engine.write(fixtures::user_message("My name is Priya")).await.unwrap();
    fixtures::assert_write_succeeded(&result);
    assert_eq!(result.layer, Some(Layer::Imm));

    let facts = harness.engine.list_identity().unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].value, "Priya");
}

#[tokio::test]
async fn an_emotional_family_story_is_retrievable_by_context() {
    let harness = TestHarness::new().await;

    harness
        .engine
        .write(fixtures::family_message("I had an amazing dinner with my mom last night, it made me so happy"))
        .await
        .unwrap();

    let mut options = RetrieveOptions::from_config(harness.engine.config());
    options.semantic_threshold = 0.0;
    let results = harness.engine.retrieve("dinner with mom", &options).await.unwrap();

    assert!(results.iter().any(|r| r.layer == Layer::Emm));
}

#[tokio::test]
async fn knowledge_facts_reinforce_and_outrank_unreinforced_ones_on_repeat_queries() {
    let harness = TestHarness::new().await;

    harness.engine.write(fixtures::user_message("I know how to play chess")).await.unwrap();
    harness.engine.write(fixtures::user_message("I know how to bake bread")).await.unwrap();

    let mut options = RetrieveOptions::from_config(harness.engine.config());
    options.semantic_threshold = 0.0;
    let before = harness.engine.retrieve("chess", &options).await.unwrap();
    assert!(!before.is_empty());
}

#[tokio::test]
async fn retrieval_without_embeddings_still_surfaces_identity_facts() {
    let harness = TestHarness::new_without_embeddings().await;
    harness.engine.write(fixtures::user_message("My name is Omar")).await.unwrap();

    let options = RetrieveOptions::from_config(harness.engine.config());
    let results = harness.engine.retrieve("Omar", &options).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].layer, Layer::Imm);
}

#[tokio::test]
async fn router_state_and_memories_survive_a_simulated_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let db_path = dir.path().join("triad.sqlite3");

    {
        let storage = Arc::new(Storage::new(Some(db_path.clone())).unwrap());
        let embeddings: Arc<dyn triad_core::embeddings::EmbeddingProvider> = Arc::new(StubEmbeddingProvider::ready(32));
        let engine = Engine::new(storage, embeddings, TriadConfig::default()).unwrap();
        engine.init().await.unwrap();
        engine.write(fixtures::user_message("My name is Dana")).await.unwrap();
        engine.teach("I know how to juggle", &[], Layer::Kmm).await.unwrap();
    }

    let storage = Arc::new(Storage::new(Some(db_path)).unwrap());
    let embeddings: Arc<dyn triad_core::embeddings::EmbeddingProvider> = Arc::new(StubEmbeddingProvider::ready(32));
    let engine = Engine::new(storage, embeddings, TriadConfig::default()).unwrap();

    let facts = engine.list_identity().unwrap();
    assert_eq!(facts.len(), 1);
    assert_eq!(facts[0].value, "Dana");

    let corrections = engine.corrections().unwrap();
    assert_eq!(corrections.len(), 1);
}

#[tokio::test]
async fn the_safety_blocklist_prevents_a_write_without_touching_any_store() {
    let harness = TestHarness::new().await;
    let result = harness.engine.write(fixtures::user_message("I keep thinking about suicide")).await.unwrap();

    assert!(!result.success);
    assert_eq!(harness.engine.count(Layer::Emm).unwrap(), 0);
    assert_eq!(harness.engine.count(Layer::Imm).unwrap(), 0);
    assert_eq!(harness.engine.count(Layer::Kmm).unwrap(), 0);
}

#[tokio::test]
async fn decay_then_prune_removes_faded_experiences() {
    let harness = TestHarness::new().await;
    harness.engine.write(fixtures::user_message("just a quiet afternoon")).await.unwrap();

    harness.engine.apply_decay().unwrap();
    let pruned = harness.engine.prune_experience(0.0).unwrap();
    assert_eq!(pruned, 0, "a fresh entry should not be pruned at threshold 0");

    assert_eq!(harness.engine.count(Layer::Emm).unwrap(), 1);
}
