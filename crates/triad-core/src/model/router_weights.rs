//! `RouterWeights` — the classifier's persisted parameters (spec.md §3, §4.2).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::enums::Layer;

/// Deterministic seed for weight initialization and seed-corpus replay
/// (spec.md §9 open question: reproducibility across runs).
pub const ROUTER_WEIGHT_SEED: u64 = 0x7A51;

/// One weight vector per layer, each of length `D` (the embedding dimension).
/// No bias term (spec.md §4.2).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterWeights {
    pub imm: Vec<f32>,
    pub emm: Vec<f32>,
    pub kmm: Vec<f32>,
}

impl RouterWeights {
    /// Small random init in `[-0.05, 0.05]`, seeded deterministically.
    pub fn random_init(dim: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(ROUTER_WEIGHT_SEED);
        let mut make = |rng: &mut StdRng| (0..dim).map(|_| rng.random_range(-0.05..=0.05)).collect();
        Self {
            imm: make(&mut rng),
            emm: make(&mut rng),
            kmm: make(&mut rng),
        }
    }

    pub fn zeros(dim: usize) -> Self {
        Self {
            imm: vec![0.0; dim],
            emm: vec![0.0; dim],
            kmm: vec![0.0; dim],
        }
    }

    pub fn get(&self, layer: Layer) -> &[f32] {
        match layer {
            Layer::Imm => &self.imm,
            Layer::Emm => &self.emm,
            Layer::Kmm => &self.kmm,
        }
    }

    pub fn get_mut(&mut self, layer: Layer) -> &mut Vec<f32> {
        match layer {
            Layer::Imm => &mut self.imm,
            Layer::Emm => &mut self.emm,
            Layer::Kmm => &mut self.kmm,
        }
    }

    pub fn dimension(&self) -> usize {
        self.imm.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_init_is_deterministic() {
        let a = RouterWeights::random_init(8);
        let b = RouterWeights::random_init(8);
        assert_eq!(a, b);
    }

    #[test]
    fn random_init_stays_in_bounds() {
        let w = RouterWeights::random_init(32);
        for v in w.imm.iter().chain(w.emm.iter()).chain(w.kmm.iter()) {
            assert!(*v >= -0.05 && *v <= 0.05);
        }
    }
}
