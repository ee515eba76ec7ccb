//! Linear classifier (C5, spec.md §4.2): a 3-way softmax over a single
//! linear layer per class, no bias, trained online with one-vs-rest
//! cross-entropy gradient steps.

use crate::model::{Layer, RouterWeights};

use super::seed::SEED_CORPUS;
use super::softmax::{softmax, sorted_by_probability, Scores, LAYER_ORDER};

/// The online linear classifier. Holds the current weights; persistence is
/// the caller's responsibility (storage layer serializes `RouterWeights`).
pub struct LinearClassifier {
    weights: RouterWeights,
    learning_rate: f32,
}

impl LinearClassifier {
    pub fn new(weights: RouterWeights, learning_rate: f32) -> Self {
        Self { weights, learning_rate }
    }

    /// Build a classifier with freshly seeded weights and train it over the
    /// fixed seed corpus in a single pass (spec.md §4.2 "Seed training").
    /// `embed` is the caller's embedding function (kept generic here since
    /// embedding is an async, fallible external call in the full pipeline —
    /// this module only needs the resulting vectors).
    pub fn seeded<E>(dim: usize, learning_rate: f32, mut embed: E) -> Self
    where
        E: FnMut(&str) -> Vec<f32>,
    {
        let mut classifier = Self::new(RouterWeights::random_init(dim), learning_rate);
        for example in SEED_CORPUS {
            let x = embed(example.text);
            classifier.update(&x, example.layer);
        }
        classifier
    }

    pub fn weights(&self) -> &RouterWeights {
        &self.weights
    }

    pub fn set_weights(&mut self, weights: RouterWeights) {
        self.weights = weights;
    }

    pub fn reset(&mut self, dim: usize) {
        self.weights = RouterWeights::random_init(dim);
    }

    /// Raw scores `s_L = <W[L], x>` for each layer (spec.md §4.2).
    fn scores(&self, x: &[f32]) -> Scores {
        let mut scores = [0.0_f32; 3];
        for (i, layer) in LAYER_ORDER.into_iter().enumerate() {
            scores[i] = dot(self.weights.get(layer), x);
        }
        scores
    }

    /// Predict softmax probabilities for each layer, sorted descending.
    pub fn predict(&self, x: &[f32]) -> Vec<(Layer, f32)> {
        let probabilities = softmax(self.scores(x));
        sorted_by_probability(probabilities)
    }

    /// One online gradient step (spec.md §4.2):
    /// `W[L] <- W[L] + eta * (1[L = correct] - p_L) * x` for every layer.
    pub fn update(&mut self, x: &[f32], correct: Layer) {
        let probabilities = softmax(self.scores(x));
        for (i, layer) in LAYER_ORDER.into_iter().enumerate() {
            let target = if layer == correct { 1.0 } else { 0.0 };
            let error = target - probabilities[i];
            let step = self.learning_rate * error;
            let w = self.weights.get_mut(layer);
            for (wi, xi) in w.iter_mut().zip(x.iter()) {
                *wi += step * xi;
            }
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
