//! Store adapters (C8, spec.md §4.5-§4.7): per-layer read/write with
//! layer-specific semantics — conflict-free identity lookups, decaying
//! experience search, reinforcement-boosted knowledge search.

mod experience;
mod identity;
mod knowledge;

pub use experience::{ExperienceStats, ExperienceStore, ScoredExperience};
pub use identity::{IdentityStats, IdentityStore};
pub use knowledge::{KnowledgeStats, KnowledgeStore, ScoredKnowledge};
