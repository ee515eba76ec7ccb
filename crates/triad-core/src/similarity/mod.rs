//! Similarity primitives (C1): cosine similarity, vector averaging, id
//! generation. Shared by every store's semantic search and by the router's
//! context-blended embedding step (spec.md §4.4 step 4).

use uuid::Uuid;

/// Generate a fresh unique id for any persisted record.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Cosine similarity between two equal-length vectors. Returns 0.0 for
/// mismatched lengths or zero-norm input, and is always in `[-1, 1]`
/// otherwise (spec.md §8 invariant).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = (norm_a * norm_b).sqrt();
    if denom > 0.0 {
        (dot / denom).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Element-wise average of two equal-length vectors (spec.md §4.4 step 4:
/// `x = (embed(text) + embed(join(last_5(context)))) / 2`).
pub fn average(a: &[f32], b: &[f32]) -> Vec<f32> {
    debug_assert_eq!(a.len(), b.len(), "averaged vectors must share a dimension");
    a.iter().zip(b.iter()).map(|(x, y)| (x + y) / 2.0).collect()
}
