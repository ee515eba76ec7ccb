//! Linear classifier (C5, spec.md §4.2): online 3-way softmax over sentence
//! embeddings, plus the fixed seed training corpus.

mod classifier;
mod seed;
mod softmax;

pub use classifier::LinearClassifier;
pub use seed::{SeedExample, SEED_CORPUS};
pub use softmax::{softmax, sorted_by_probability, Scores};
