//! Write pipeline (C10, spec.md §4.8): routes an utterance, then
//! materializes it into the target layer's store.

use crate::error::{ConflictInfo, Result, SuggestedAction, TriadError};
use crate::model::{Decision, FactCategory, IdentityFact, KnowledgeEntry};
use crate::router::RoutingResult;
use crate::rules::{self, Command};

use super::context::detect_context;
use super::engine::Engine;
use super::importance::importance;
use super::types::{ConflictAction, ForgetIntent, WriteRequest, WriteResult};

impl Engine {
    /// Apply a caller's decision on a conflict previously surfaced by
    /// `write` (spec.md §4.8, §6). `write` never resolves conflicts itself.
    pub fn resolve_conflict(&self, key: &str, new_value: &str, action: ConflictAction) -> Result<WriteResult> {
        match action {
            ConflictAction::KeepExisting | ConflictAction::AskLater => {
                Ok(WriteResult::ok(crate::model::Layer::Imm, "existing identity fact kept"))
            }
            ConflictAction::UpdateNew => {
                let Some(mut existing) = self.identity.get_by_key(key)? else {
                    return Err(TriadError::ExtractionFailed);
                };
                existing.replace_with_lowered_confidence(new_value);
                self.identity.put(&existing)?;
                Ok(WriteResult::ok(crate::model::Layer::Imm, "identity fact updated after conflict"))
            }
        }
    }

    /// `write(req)` (spec.md §4.8).
    pub async fn write(&self, req: WriteRequest) -> Result<WriteResult> {
        let routing = self.decide_layer(&req).await;

        let decision = match req.force_layer {
            Some(layer) => Decision::from(layer),
            None => routing.as_ref().map(|r| r.decision).unwrap_or(Decision::Emm),
        };

        if let Some(RoutingResult { command: Some(Command::Forget(query)), .. }) = &routing {
            return Ok(WriteResult {
                success: true,
                layer: Some(crate::model::Layer::Emm),
                conflict: None,
                message: "forget intent surfaced".into(),
                forget: Some(ForgetIntent { query: query.clone() }),
            });
        }

        if decision == Decision::None {
            return Ok(WriteResult::blocked("blocked by safety"));
        }

        let target = match decision {
            Decision::Ask | Decision::Conflict => crate::model::Layer::Emm,
            other => other.layer().unwrap_or(crate::model::Layer::Emm),
        };

        match target {
            crate::model::Layer::Imm => self.write_identity(&req.content),
            crate::model::Layer::Emm => self.write_experience(&req.content, &req.context, req.role),
            crate::model::Layer::Kmm => self.write_knowledge(&req.content).await,
        }
    }

    async fn decide_layer(&self, req: &WriteRequest) -> Option<RoutingResult> {
        if req.force_layer.is_some() {
            return None;
        }
        let mut router = self.router.lock().await;
        Some(router.route(&req.content, &req.recent_context))
    }

    fn write_identity(&self, content: &str) -> Result<WriteResult> {
        let Some(extracted) = rules::extract(content) else {
            return Err(TriadError::ExtractionFailed);
        };

        match self.identity.get_by_key(&extracted.key)? {
            Some(existing) if !existing.value.eq_ignore_ascii_case(&extracted.value) => {
                let suggested_action = if existing.confidence > self.config.conflict_ask_threshold {
                    SuggestedAction::AskUser
                } else {
                    SuggestedAction::Update
                };
                Ok(WriteResult::conflict(ConflictInfo {
                    key: extracted.key,
                    existing_value: existing.value,
                    new_value: extracted.value,
                    existing_confidence: existing.confidence,
                    suggested_action,
                }))
            }
            Some(existing) => {
                self.identity.update_confidence(&existing.id, existing.confidence + self.config.identity_reinforcement_step)?;
                Ok(WriteResult::ok(crate::model::Layer::Imm, "identity fact reinforced"))
            }
            None => {
                let category = if extracted.key == "name" { FactCategory::Identity } else { FactCategory::Preference };
                let fact = IdentityFact::new_explicit(extracted.key, extracted.value, category);
                self.identity.put(&fact)?;
                Ok(WriteResult::ok(crate::model::Layer::Imm, "identity fact stored"))
            }
        }
    }

    fn write_experience(&self, content: &str, passed_context: &crate::model::Context, role: crate::model::Role) -> Result<WriteResult> {
        let detected = detect_context(content);
        let context = if detected != crate::model::Context::General { detected } else { *passed_context };

        let embedding = match self.embeddings.embed(content) {
            Ok(v) => Some(v),
            Err(_) => None,
        };

        let score = importance(content, role);
        let entry = crate::model::ExperienceEntry::new(content, context, role, score, embedding);
        self.experience.put(&entry)?;
        Ok(WriteResult::ok(crate::model::Layer::Emm, "experience stored"))
    }

    async fn write_knowledge(&self, content: &str) -> Result<WriteResult> {
        let embedding = self.embeddings.embed(content).map_err(|_| TriadError::EmbeddingRequired(crate::model::Layer::Kmm))?;
        let entry = KnowledgeEntry::new(content, embedding);
        self.knowledge.put(&entry)?;
        Ok(WriteResult::ok(crate::model::Layer::Kmm, "knowledge stored"))
    }
}
