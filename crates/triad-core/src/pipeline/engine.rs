//! The public core engine (spec.md §6 "Public API of the core"): glues the
//! router, the three stores, and persistence into `init`/`write`/
//! `retrieve`/`teach`/`retrain`/per-layer maintenance.
//!
//! The pipeline surface is `async fn` (the crate carries `tokio` the way
//! the teacher's codebase module does, spec.md §5 cooperative-scheduling
//! model); the router itself stays synchronous internally — its embedding
//! calls are a plain trait method, not a future, so a single coarse
//! `tokio::sync::Mutex` around it is enough to serialize `route`/`learn`
//! with respect to concurrent pipeline calls (spec.md §5 ordering
//! guarantees).

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::TriadConfig;
use crate::embeddings::EmbeddingProvider;
use crate::error::{Result, TriadError};
use crate::model::{CorrectionEntry, Layer};
use crate::router::Router;
use crate::storage::Storage;
use crate::stores::{ExperienceStore, IdentityStore, KnowledgeStore};

pub struct Engine {
    pub(super) storage: Arc<Storage>,
    pub(super) identity: IdentityStore,
    pub(super) experience: ExperienceStore,
    pub(super) knowledge: KnowledgeStore,
    pub(super) embeddings: Arc<dyn EmbeddingProvider>,
    pub(super) router: Mutex<Router>,
    pub(super) config: TriadConfig,
}

impl Engine {
    /// Construct the engine, loading persisted router state if present or
    /// seeding it fresh otherwise (spec.md §6 `init()`, §4.7).
    pub fn new(storage: Arc<Storage>, embeddings: Arc<dyn EmbeddingProvider>, config: TriadConfig) -> Result<Self> {
        let identity = IdentityStore::new(storage.clone());
        let experience = ExperienceStore::new(storage.clone());
        let knowledge = KnowledgeStore::new(storage.clone());

        let weights = storage.load_router_weights()?;
        let corrections = storage.load_corrections()?;

        let router = match weights {
            Some(w) => Router::with_weights(&config, embeddings.clone(), w, corrections),
            None => Router::new_seeded(&config, embeddings.clone()),
        };

        Ok(Self {
            storage,
            identity,
            experience,
            knowledge,
            embeddings,
            router: Mutex::new(router),
            config,
        })
    }

    /// `init()` (spec.md §6): persist freshly-seeded weights so a restart
    /// loads them instead of reseeding.
    pub async fn init(&self) -> Result<()> {
        if self.storage.load_router_weights()?.is_none() {
            let router = self.router.lock().await;
            self.storage.save_router_weights(router.weights())?;
        }
        Ok(())
    }

    pub fn config(&self) -> &TriadConfig {
        &self.config
    }

    pub fn embeddings(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embeddings
    }

    /// `teach(text, context, correct_layer)` (spec.md §6): one online
    /// gradient step, persisted immediately.
    pub async fn teach(&self, text: &str, context: &[String], correct_layer: Layer) -> Result<()> {
        let mut router = self.router.lock().await;
        router.learn(text, context, correct_layer).map_err(|_| TriadError::EmbeddingUnavailable)?;
        self.storage.save_router_weights(router.weights())?;
        self.storage.save_corrections(router.corrections())?;
        Ok(())
    }

    /// `retrain()` (spec.md §6): reset weights, replay the seed corpus and
    /// the full correction log, persist.
    pub async fn retrain(&self) -> Result<()> {
        let mut router = self.router.lock().await;
        router.retrain_from_history().map_err(|_| TriadError::EmbeddingUnavailable)?;
        self.storage.save_router_weights(router.weights())?;
        Ok(())
    }

    pub fn corrections(&self) -> Result<Vec<CorrectionEntry>> {
        Ok(self.storage.load_corrections()?)
    }

    // ---- per-layer maintenance (spec.md §6 "Per-layer: list, clear, count, delete") ----

    pub fn list_identity(&self) -> Result<Vec<crate::model::IdentityFact>> {
        Ok(self.identity.search("")?)
    }

    pub fn list_experience(&self) -> Result<Vec<crate::model::ExperienceEntry>> {
        Ok(self.experience.get_all()?)
    }

    pub fn list_knowledge(&self) -> Result<Vec<crate::model::KnowledgeEntry>> {
        Ok(self.knowledge.get_all()?)
    }

    pub fn count(&self, layer: Layer) -> Result<u64> {
        Ok(match layer {
            Layer::Imm => self.identity.count()?,
            Layer::Emm => self.experience.count()?,
            Layer::Kmm => self.knowledge.count()?,
        })
    }

    pub fn clear(&self, layer: Layer) -> Result<()> {
        Ok(match layer {
            Layer::Imm => self.identity.clear()?,
            Layer::Emm => self.experience.clear()?,
            Layer::Kmm => self.knowledge.clear()?,
        })
    }

    pub fn delete(&self, layer: Layer, id: &str) -> Result<()> {
        Ok(match layer {
            Layer::Imm => self.identity.delete(id)?,
            Layer::Emm => self.experience.delete(id)?,
            Layer::Kmm => self.knowledge.delete(id)?,
        })
    }

    /// Run the experience decay sweep (spec.md §4.6). Exposed so the CLI /
    /// a scheduled job can trigger it explicitly; not run implicitly on
    /// every write.
    pub fn apply_decay(&self) -> Result<usize> {
        Ok(self.experience.apply_decay()?)
    }

    /// Drop experience entries that have decayed below `threshold` (spec.md
    /// §6 supplemented features).
    pub fn prune_experience(&self, threshold: f32) -> Result<usize> {
        Ok(self.experience.prune(threshold)?)
    }

    pub fn identity_stats(&self) -> Result<crate::stores::IdentityStats> {
        Ok(self.identity.stats()?)
    }

    pub fn experience_stats(&self) -> Result<crate::stores::ExperienceStats> {
        Ok(self.experience.stats()?)
    }

    pub fn knowledge_stats(&self) -> Result<crate::stores::KnowledgeStats> {
        Ok(self.knowledge.stats()?)
    }
}
