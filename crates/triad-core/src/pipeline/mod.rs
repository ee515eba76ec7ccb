//! The write/retrieve pipelines and the public `Engine` that hosts them
//! (spec.md §4.8, §4.9, §6).

mod context;
mod engine;
mod importance;
mod retrieve;
mod types;
mod write;

pub use context::detect_context;
pub use engine::Engine;
pub use importance::importance;
pub use types::{ConflictAction, ForgetIntent, MemoryResult, RetrieveOptions, WriteRequest, WriteResult};
