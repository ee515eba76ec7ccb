//! The hard-rule engine (C4, spec.md §4.1): `apply(text) -> Option<RuleHit>`,
//! firing in a fixed precedence order with short-circuit on first hit.

use crate::model::Decision;

use super::commands::{self, Command};
use super::extraction::extract;
use super::patterns::{any_identity_pattern_matches, CORRECTION_PATTERN, KNOWLEDGE_PATTERN};

/// A rule that unambiguously decided the outcome, before the cache or the
/// classifier ever runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleHit {
    pub decision: Decision,
    /// Set when a slash command fired (spec.md §4.1 step 1); the write
    /// pipeline inspects this to special-case `/forget`.
    pub command: Option<Command>,
}

impl RuleHit {
    fn decision(decision: Decision) -> Self {
        Self { decision, command: None }
    }
}

/// The hard-rule engine. Holds the configured safety blocklist; everything
/// else is stateless pattern matching (spec.md §4.1).
pub struct RuleEngine {
    safety_blocklist: Vec<String>,
}

impl RuleEngine {
    pub fn new(safety_blocklist: Vec<String>) -> Self {
        Self {
            safety_blocklist: safety_blocklist.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Apply rules in fixed precedence order (spec.md §4.1):
    /// 1. commands, 2. safety blocklist, 3. identity patterns,
    /// 4. correction patterns, 5. knowledge indicators.
    /// Evaluated against the trimmed text. Returns `None` to defer to the ML
    /// classifier.
    pub fn apply(&self, text: &str) -> Option<RuleHit> {
        let trimmed = text.trim();

        if let Some(command) = commands::parse(trimmed) {
            let decision = match command {
                Command::Recall(_) => Decision::Emm,
                Command::Forget(_) => Decision::Emm,
                Command::Remember(_) => Decision::Imm,
            };
            return Some(RuleHit { decision, command: Some(command) });
        }

        let normalized = trimmed.to_lowercase();
        if self.safety_blocklist.iter().any(|blocked| normalized.contains(blocked.as_str())) {
            return Some(RuleHit::decision(Decision::None));
        }

        if any_identity_pattern_matches(trimmed) {
            return Some(RuleHit::decision(Decision::Imm));
        }

        if CORRECTION_PATTERN.is_match(trimmed) {
            return Some(RuleHit::decision(Decision::Imm));
        }

        if KNOWLEDGE_PATTERN.is_match(trimmed) {
            return Some(RuleHit::decision(Decision::Kmm));
        }

        None
    }

    /// Run identity extraction for a text the engine (or caller) has
    /// already decided is IMM-bound.
    pub fn extract_identity(&self, text: &str) -> Option<super::extraction::ExtractedFact> {
        extract(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RuleEngine {
        RuleEngine::new(vec!["self harm".to_string()])
    }

    #[test]
    fn recall_command_forces_emm() {
        let hit = engine().apply("/recall last week").unwrap();
        assert_eq!(hit.decision, Decision::Emm);
        assert!(matches!(hit.command, Some(Command::Recall(_))));
    }

    #[test]
    fn forget_command_forces_emm_and_carries_command() {
        let hit = engine().apply("/forget that").unwrap();
        assert_eq!(hit.decision, Decision::Emm);
        assert!(matches!(hit.command, Some(Command::Forget(_))));
    }

    #[test]
    fn remember_command_forces_imm() {
        let hit = engine().apply("/remember I like tea").unwrap();
        assert_eq!(hit.decision, Decision::Imm);
    }

    #[test]
    fn blocklist_hit_returns_none_decision() {
        let hit = engine().apply("thinking about self harm").unwrap();
        assert_eq!(hit.decision, Decision::None);
    }

    #[test]
    fn identity_declaration_returns_imm() {
        let hit = engine().apply("My name is John").unwrap();
        assert_eq!(hit.decision, Decision::Imm);
    }

    #[test]
    fn correction_phrase_returns_imm() {
        let hit = engine().apply("Actually, I go by Sam").unwrap();
        assert_eq!(hit.decision, Decision::Imm);
    }

    #[test]
    fn knowledge_declaration_returns_kmm() {
        let hit = engine().apply("I know how to code in Python").unwrap();
        assert_eq!(hit.decision, Decision::Kmm);
    }

    #[test]
    fn unrelated_text_defers_to_classifier() {
        assert_eq!(engine().apply("I had coffee with Sarah"), None);
    }

    #[test]
    fn precedence_commands_beat_safety_blocklist() {
        // Even if the command's argument contains a blocked phrase, the
        // command precedence (step 1) wins over the blocklist (step 2).
        let hit = engine().apply("/recall self harm discussion").unwrap();
        assert_eq!(hit.decision, Decision::Emm);
    }
}
