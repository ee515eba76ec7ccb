//! Tunable constants for the router, stores, and cache (spec.md §4),
//! centralized into one config struct per DESIGN NOTES §5.3 instead of being
//! read ad hoc from each module.

use std::time::Duration;

/// Every numeric knob named in spec.md §4, with defaults matching the spec
/// text exactly. Constructed once and passed explicitly into the pipeline
/// bundle — no module-level singletons (spec.md §9 design note).
#[derive(Debug, Clone)]
pub struct TriadConfig {
    /// Online classifier learning rate (spec.md §4.2).
    pub learning_rate: f32,
    /// Below this top-1 softmax probability, the router returns `ASK` (spec.md §4.4).
    pub confidence_threshold: f32,
    /// Below this top1-top2 margin, the router returns `CONFLICT` (spec.md §4.4).
    pub conflict_margin: f32,
    /// Routing cache capacity (spec.md §4.3).
    pub cache_capacity: usize,
    /// Routing cache entry TTL (spec.md §4.3).
    pub cache_ttl: Duration,
    /// Daily experience importance decay multiplier (spec.md §3).
    pub decay_rate: f32,
    /// Importance floor for experience entries (spec.md §3).
    pub min_importance: f32,
    /// Confidence bump on an exact identity-fact re-utterance (spec.md §4.8).
    pub identity_reinforcement_step: f32,
    /// Confidence bump on knowledge reinforcement (spec.md §4.7).
    pub knowledge_reinforcement_step: f32,
    /// Identity confidence above which a value conflict asks the user
    /// instead of silently updating (spec.md §4.8).
    pub conflict_ask_threshold: f32,
    /// Default semantic-search threshold for retrieval (spec.md §4.9).
    pub default_semantic_threshold: f32,
    /// Knowledge search uses `knowledge_threshold_ratio * semantic_threshold` (spec.md §4.7).
    pub knowledge_threshold_ratio: f32,
    /// Default number of retrieval results (spec.md §4.9).
    pub default_top_k: usize,
    /// Identity facts below this confidence are excluded from retrieval (spec.md §4.9).
    pub identity_retrieval_min_confidence: f32,
    /// Case-insensitive substrings that force decision `NONE` (spec.md §4.1 step 2).
    pub safety_blocklist: Vec<String>,
}

impl Default for TriadConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            confidence_threshold: 0.6,
            conflict_margin: 0.15,
            cache_capacity: 1000,
            cache_ttl: Duration::from_secs(30 * 60),
            decay_rate: 0.95,
            min_importance: 0.1,
            identity_reinforcement_step: 0.1,
            knowledge_reinforcement_step: 0.05,
            conflict_ask_threshold: 0.8,
            default_semantic_threshold: 0.4,
            knowledge_threshold_ratio: 0.8,
            default_top_k: 5,
            identity_retrieval_min_confidence: 0.5,
            safety_blocklist: default_safety_blocklist(),
        }
    }
}

impl TriadConfig {
    /// Override the data directory / router RNG seed from the environment,
    /// the way the teacher reads `FASTEMBED_CACHE_PATH` / `VESTIGE_ENCRYPTION_KEY`.
    pub fn data_dir_from_env() -> Option<std::path::PathBuf> {
        std::env::var("TRIAD_DATA_DIR").ok().map(std::path::PathBuf::from)
    }
}

fn default_safety_blocklist() -> Vec<String> {
    // Deliberately small and generic; operators are expected to extend this
    // via their own deployment config rather than this crate shipping a
    // comprehensive moderation list.
    vec![
        "kill myself".to_string(),
        "suicide".to_string(),
        "self harm".to_string(),
    ]
}
