//! Numerically stable softmax over the three layer scores (spec.md §4.2).

use crate::model::Layer;

/// Per-layer scores or probabilities, always in layer order `[IMM, EMM, KMM]`.
pub type Scores = [f32; 3];

pub const LAYER_ORDER: [Layer; 3] = [Layer::Imm, Layer::Emm, Layer::Kmm];

/// Subtract the max score before exponentiating, then normalize — standard
/// numerically stable softmax (spec.md §4.2).
pub fn softmax(scores: Scores) -> Scores {
    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    [exps[0] / sum, exps[1] / sum, exps[2] / sum]
}

/// Probabilities paired with their layer, sorted descending by probability
/// (spec.md §4.4 step 5).
pub fn sorted_by_probability(probabilities: Scores) -> Vec<(Layer, f32)> {
    let mut pairs: Vec<(Layer, f32)> = LAYER_ORDER.into_iter().zip(probabilities).collect();
    pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax([1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn softmax_outputs_are_in_open_unit_interval() {
        let probs = softmax([-5.0, 0.0, 5.0]);
        for p in probs {
            assert!(p > 0.0 && p < 1.0);
        }
    }

    #[test]
    fn softmax_is_invariant_to_uniform_shift() {
        let a = softmax([1.0, 2.0, 3.0]);
        let b = softmax([101.0, 102.0, 103.0]);
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn sorted_by_probability_descends() {
        let sorted = sorted_by_probability([0.2, 0.5, 0.3]);
        assert_eq!(sorted[0].0, Layer::Emm);
        assert_eq!(sorted[1].0, Layer::Kmm);
        assert_eq!(sorted[2].0, Layer::Imm);
    }
}
