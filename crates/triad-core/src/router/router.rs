//! The router (C7, spec.md §4.4): composes the hard-rule engine, the
//! routing cache, and the linear classifier into one decision, and owns
//! online learning.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::RoutingCache;
use crate::classifier::LinearClassifier;
use crate::config::TriadConfig;
use crate::embeddings::{EmbeddingError, EmbeddingProvider, EmbeddingStatus};
use crate::model::{CorrectionEntry, Decision, Layer, RouteSource, RouterWeights};
use crate::rules::RuleEngine;
use crate::similarity::average;

use super::result::RoutingResult;

/// Everything `route`/`learn`/`retrain_from_history` need, constructed
/// explicitly and passed in — no module-level singletons (spec.md §9
/// design note, carried from the teacher's "context/bundle" guidance).
pub struct Router {
    rules: RuleEngine,
    classifier: LinearClassifier,
    cache: RoutingCache,
    embeddings: Arc<dyn EmbeddingProvider>,
    corrections: Vec<CorrectionEntry>,
    confidence_threshold: f32,
    conflict_margin: f32,
}

impl Router {
    /// Construct a router with freshly-seeded weights, training the
    /// classifier over the seed corpus immediately (spec.md §4.2 "Seed
    /// training: on first start"). Use [`Router::with_weights`] instead
    /// when persisted weights were loaded from storage.
    pub fn new_seeded(config: &TriadConfig, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        let dim = embeddings.dimension();
        let embed_fn = |text: &str| embeddings.embed(text).unwrap_or_else(|_| vec![0.0; dim]);
        let classifier = LinearClassifier::seeded(dim, config.learning_rate, embed_fn);
        Self::assemble(config, embeddings, classifier, Vec::new())
    }

    /// Construct a router from persisted weights and correction history
    /// (spec.md §4.7 "init(): loads or seeds classifier").
    pub fn with_weights(
        config: &TriadConfig,
        embeddings: Arc<dyn EmbeddingProvider>,
        weights: RouterWeights,
        corrections: Vec<CorrectionEntry>,
    ) -> Self {
        let classifier = LinearClassifier::new(weights, config.learning_rate);
        Self::assemble(config, embeddings, classifier, corrections)
    }

    fn assemble(
        config: &TriadConfig,
        embeddings: Arc<dyn EmbeddingProvider>,
        classifier: LinearClassifier,
        corrections: Vec<CorrectionEntry>,
    ) -> Self {
        Self {
            rules: RuleEngine::new(config.safety_blocklist.clone()),
            classifier,
            cache: RoutingCache::new(config.cache_capacity, config.cache_ttl),
            embeddings,
            corrections,
            confidence_threshold: config.confidence_threshold,
            conflict_margin: config.conflict_margin,
        }
    }

    pub fn weights(&self) -> &RouterWeights {
        self.classifier.weights()
    }

    pub fn corrections(&self) -> &[CorrectionEntry] {
        &self.corrections
    }

    /// Number of routing decisions currently cached. Exposed mainly so
    /// callers above this module can assert on cache behavior without
    /// reaching into a private field.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// `route(text, recent_context_lines) -> RoutingResult` (spec.md §4.4).
    pub fn route(&mut self, text: &str, recent_context: &[String]) -> RoutingResult {
        // Step 1: hard rules, uncached.
        if let Some(hit) = self.rules.apply(text) {
            return RoutingResult {
                decision: hit.decision,
                confidence: 1.0,
                source: RouteSource::Rule,
                command: hit.command,
            };
        }

        // Step 2: cache lookup.
        let key = RoutingCache::key(text, recent_context);
        if let Some(cached) = self.cache.get(&key) {
            return RoutingResult { source: RouteSource::Cache, ..cached };
        }

        // Step 3: lazy classifier availability check (fallback on embedding
        // failure, spec.md §4.4 step 3).
        if self.embeddings.status() != EmbeddingStatus::Ready {
            return RoutingResult {
                decision: Decision::Emm,
                confidence: 0.5,
                source: RouteSource::Ml,
                command: None,
            };
        }

        // Step 4: context-blended embedding.
        let x = match self.embed_with_context(text, recent_context) {
            Ok(x) => x,
            Err(_) => {
                return RoutingResult {
                    decision: Decision::Emm,
                    confidence: 0.5,
                    source: RouteSource::Ml,
                    command: None,
                };
            }
        };

        // Step 5: classify and sort.
        let sorted = self.classifier.predict(&x);
        let (top_layer, p_top) = sorted[0];
        let p_second = sorted[1].1;

        // Step 6: decision rule.
        let decision = if p_top < self.confidence_threshold {
            Decision::Ask
        } else if p_top - p_second < self.conflict_margin {
            Decision::Conflict
        } else {
            Decision::from(top_layer)
        };

        let result = RoutingResult { decision, confidence: p_top, source: RouteSource::Ml, command: None };

        // Step 7: cache and return.
        self.cache.set(key, result.clone());
        result
    }

    /// `learn(text, context, correct_layer)` (spec.md §4.4): one gradient
    /// step, append a correction, clear the cache before returning.
    pub fn learn(&mut self, text: &str, context: &[String], correct_layer: Layer) -> Result<(), EmbeddingError> {
        let x = self.embed_with_context(text, context)?;
        self.classifier.update(&x, correct_layer);

        self.corrections.push(CorrectionEntry::new(text, context.to_vec(), correct_layer));

        // Cache must be cleared before `learn` returns (spec.md §5 ordering
        // guarantee: "the cache is cleared before learning returns").
        self.cache.clear();
        Ok(())
    }

    /// `retrain_from_history()` (spec.md §4.4): reset weights, replay the
    /// seed corpus, then replay every persisted correction in order.
    pub fn retrain_from_history(&mut self) -> Result<(), EmbeddingError> {
        let dim = self.classifier.weights().dimension();
        self.classifier.reset(dim);

        for example in crate::classifier::SEED_CORPUS {
            let x = self.embeddings.embed(example.text)?;
            self.classifier.update(&x, example.layer);
        }

        for correction in self.corrections.clone() {
            let x = self.embed_with_context(&correction.text, &correction.context)?;
            self.classifier.update(&x, correction.correct_layer);
        }

        self.cache.clear();
        Ok(())
    }

    /// `x = embed(text)` if context empty, else the average of `embed(text)`
    /// and `embed(join(last_5(context)))` (spec.md §4.4 step 4).
    fn embed_with_context(&self, text: &str, context: &[String]) -> Result<Vec<f32>, EmbeddingError> {
        if context.is_empty() {
            return self.embeddings.embed(text);
        }
        let last_five: Vec<&str> = context.iter().rev().take(5).rev().map(|s| s.as_str()).collect();
        let joined = last_five.join(" ");
        let text_vec = self.embeddings.embed(text)?;
        let context_vec = self.embeddings.embed(&joined)?;
        Ok(average(&text_vec, &context_vec))
    }
}

/// Convenience re-export so callers don't need to reach into `config` just
/// to build a default cache TTL when constructing a router ad hoc (tests,
/// examples).
pub fn default_cache_ttl() -> Duration {
    TriadConfig::default().cache_ttl
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::StubEmbeddingProvider;

    fn router() -> Router {
        let config = TriadConfig::default();
        let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbeddingProvider::ready(32));
        Router::new_seeded(&config, embeddings)
    }

    #[test]
    fn rule_hit_is_not_cached() {
        let mut r = router();
        let _ = r.route("My name is John", &[]);
        assert!(r.cache.is_empty());
    }

    #[test]
    fn ml_decision_is_cached_and_served_from_cache_on_repeat() {
        let mut r = router();
        let first = r.route("I had coffee with Sarah this morning", &[]);
        assert_eq!(first.source, RouteSource::Ml);
        let second = r.route("I had coffee with Sarah this morning", &[]);
        assert_eq!(second.source, RouteSource::Cache);
        assert_eq!(second.decision, first.decision);
    }

    #[test]
    fn learn_clears_the_cache() {
        let mut r = router();
        let _ = r.route("I had coffee with Sarah this morning", &[]);
        assert!(!r.cache.is_empty());
        r.learn("I had coffee with Sarah this morning", &[], Layer::Emm).unwrap();
        assert!(r.cache.is_empty());
    }

    #[test]
    fn learn_increases_probability_of_the_taught_label() {
        let mut r = router();
        let text = "blorptastic wizzlebee narf";
        let before = {
            let x = r.embed_with_context(text, &[]).unwrap();
            r.classifier
                .predict(&x)
                .into_iter()
                .find(|(l, _)| *l == Layer::Kmm)
                .unwrap()
                .1
        };
        r.learn(text, &[], Layer::Kmm).unwrap();
        let after = {
            let x = r.embed_with_context(text, &[]).unwrap();
            r.classifier
                .predict(&x)
                .into_iter()
                .find(|(l, _)| *l == Layer::Kmm)
                .unwrap()
                .1
        };
        assert!(after > before);
    }

    #[test]
    fn embedding_not_ready_falls_back_to_emm_half_confidence() {
        let config = TriadConfig::default();
        let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbeddingProvider::errored(32));
        let mut r = Router::new_seeded(&config, embeddings);
        let result = r.route("anything at all", &[]);
        assert_eq!(result.decision, Decision::Emm);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn retrain_from_history_is_deterministic() {
        let mut r1 = router();
        r1.learn("I know how to juggle", &[], Layer::Kmm).unwrap();
        r1.retrain_from_history().unwrap();
        let result1 = r1.route("some fresh unseen text", &[]);

        let mut r2 = router();
        r2.learn("I know how to juggle", &[], Layer::Kmm).unwrap();
        r2.retrain_from_history().unwrap();
        let result2 = r2.route("some fresh unseen text", &[]);

        assert_eq!(result1.decision, result2.decision);
        assert!((result1.confidence - result2.confidence).abs() < 1e-6);
    }

    #[test]
    fn learn_persists_the_caller_supplied_context_verbatim() {
        let mut r = router();
        r.learn("I know how to juggle", &["we were at the circus".to_string()], Layer::Kmm).unwrap();
        assert_eq!(r.corrections()[0].context, vec!["we were at the circus".to_string()]);
    }

    #[test]
    fn retrain_from_history_replays_the_persisted_context() {
        // A correction's context changes the embedding fed into `update`
        // (embed_with_context blends text and context). If retrain replayed
        // with empty context instead of what was recorded, this text would
        // train the classifier on a different vector than `learn` used.
        let mut with_context = router();
        with_context.learn("blorptastic wizzlebee narf", &["ancient ritual".to_string()], Layer::Kmm).unwrap();
        with_context.retrain_from_history().unwrap();

        let mut without_context = router();
        without_context.learn("blorptastic wizzlebee narf", &[], Layer::Kmm).unwrap();
        without_context.retrain_from_history().unwrap();

        assert_ne!(with_context.weights().kmm, without_context.weights().kmm);
    }

    #[test]
    fn route_uses_recent_context_in_the_cache_key() {
        let mut r = router();
        let first = r.route("ambiguous phrase", &["talking about work".to_string()]);
        let second = r.route("ambiguous phrase", &["talking about family".to_string()]);
        assert_eq!(first.source, RouteSource::Ml);
        assert_eq!(second.source, RouteSource::Ml, "different context must miss the cache, not reuse the first entry");
    }
}
