//! # triad-core
//!
//! A tiered associative memory engine for conversational agents. Incoming
//! utterances are routed to one of three memory layers:
//!
//! - **IMM** (Identity Memory) — exact key/value user attributes: name,
//!   diet, allergies, boundaries.
//! - **EMM** (Experience Memory) — episodic conversational events that
//!   decay in importance over time.
//! - **KMM** (Knowledge Memory) — durable skills, concepts, and facts that
//!   are reinforced, not decayed.
//!
//! Routing is hybrid: a hard-rule engine and a bounded cache short-circuit
//! the common cases, falling back to an online linear classifier over
//! sentence embeddings for anything novel. The classifier retrains from a
//! fixed seed corpus plus an append-only correction log, so its behavior is
//! always reproducible from persisted state.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use triad_core::{Router, TriadConfig, embeddings::StubEmbeddingProvider};
//! use std::sync::Arc;
//!
//! let config = TriadConfig::default();
//! let embeddings = Arc::new(StubEmbeddingProvider::ready(64));
//! let mut router = Router::new_seeded(&config, embeddings);
//! let result = router.route("My name is Priya", &[]);
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod classifier;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod router;
pub mod rules;
pub mod similarity;
pub mod storage;
pub mod stores;

pub use config::TriadConfig;
pub use error::{ConflictInfo, Result, StoreError, StoreResult, SuggestedAction, TriadError};
pub use pipeline::{ConflictAction, Engine, ForgetIntent, MemoryResult, RetrieveOptions, WriteRequest, WriteResult};
pub use router::{Router, RoutingResult};

/// Crate version, exposed so the CLI binary can report it without
/// duplicating `CARGO_PKG_VERSION` lookups.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenient imports for common usage.
pub mod prelude {
    pub use crate::config::TriadConfig;
    pub use crate::embeddings::{EmbeddingError, EmbeddingProvider, EmbeddingStatus};
    pub use crate::error::{Result, TriadError};
    pub use crate::model::{Context, Decision, Layer, Role};
    pub use crate::pipeline::{ConflictAction, Engine, MemoryResult, RetrieveOptions, WriteRequest, WriteResult};
    pub use crate::router::{Router, RoutingResult};
}
