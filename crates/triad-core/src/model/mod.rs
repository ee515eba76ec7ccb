//! Data model — the records stored in each layer plus the shared enums that
//! classify them (spec.md §3).

mod correction;
mod enums;
mod experience;
mod fact;
mod knowledge;
mod router_weights;

pub use correction::CorrectionEntry;
pub use enums::{
    Context, Decision, FactCategory, FactSource, KnowledgeCategory, Layer, Role, RouteSource,
};
pub use experience::{ExperienceEntry, DECAY_RATE, MIN_IMPORTANCE};
pub use fact::IdentityFact;
pub use knowledge::KnowledgeEntry;
pub use router_weights::{RouterWeights, ROUTER_WEIGHT_SEED};
