//! Request/result types for the write and retrieval pipelines (spec.md §6).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TriadConfig;
use crate::error::ConflictInfo;
use crate::model::{Context, Layer, Role};

/// A surfaced `/forget` intent (spec.md §9 open question): the write
/// pipeline does not delete anything itself, it hands the query back to the
/// caller to act on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForgetIntent {
    pub query: String,
}

/// `write(req)` input (spec.md §4.8).
#[derive(Debug, Clone)]
pub struct WriteRequest {
    pub content: String,
    pub role: Role,
    pub context: Context,
    pub force_layer: Option<Layer>,
    /// Recent conversation lines, most recent last, fed into the router's
    /// context-blended embedding step (spec.md §4.4 step 4) exactly like
    /// `Engine::teach` already does. Empty by default — a caller that has
    /// no transcript handy still gets the plain content-only embedding.
    pub recent_context: Vec<String>,
}

impl WriteRequest {
    pub fn new(content: impl Into<String>, role: Role) -> Self {
        Self {
            content: content.into(),
            role,
            context: Context::General,
            force_layer: None,
            recent_context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn with_force_layer(mut self, layer: Layer) -> Self {
        self.force_layer = Some(layer);
        self
    }

    pub fn with_recent_context(mut self, recent_context: Vec<String>) -> Self {
        self.recent_context = recent_context;
        self
    }
}

/// `write(req) -> WriteResult` (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    pub success: bool,
    pub layer: Option<Layer>,
    pub conflict: Option<ConflictInfo>,
    pub message: String,
    /// Set when a `/forget` command routed through this write (spec.md §9).
    pub forget: Option<ForgetIntent>,
}

impl WriteResult {
    pub fn ok(layer: Layer, message: impl Into<String>) -> Self {
        Self { success: true, layer: Some(layer), conflict: None, message: message.into(), forget: None }
    }

    pub fn blocked(message: impl Into<String>) -> Self {
        Self { success: false, layer: None, conflict: None, message: message.into(), forget: None }
    }

    pub fn conflict(conflict: ConflictInfo) -> Self {
        Self {
            success: false,
            layer: Some(Layer::Imm),
            message: format!("conflict on identity key {}", conflict.key),
            conflict: Some(conflict),
            forget: None,
        }
    }
}

/// How a caller wants a surfaced identity conflict (spec.md §4.8, §6)
/// resolved. `write` never applies one of these itself — it only reports
/// the conflict; the caller decides and calls `Engine::resolve_conflict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    /// Discard the new value, leave the existing fact untouched.
    KeepExisting,
    /// Replace the existing value, dropping confidence to 0.7 (spec.md §3).
    UpdateNew,
    /// Defer the decision; nothing is written.
    AskLater,
}

/// `retrieve(query, options)` input (spec.md §4.9).
#[derive(Debug, Clone)]
pub struct RetrieveOptions {
    pub context_filter: Option<Context>,
    pub include_identity: bool,
    pub include_experience: bool,
    pub include_knowledge: bool,
    pub top_k: usize,
    pub semantic_threshold: f32,
}

impl RetrieveOptions {
    /// Defaults sourced from `config` rather than hardcoded a second time
    /// (spec.md §4.9 lists the same numbers as `TriadConfig`'s defaults).
    pub fn from_config(config: &TriadConfig) -> Self {
        Self {
            context_filter: None,
            include_identity: true,
            include_experience: true,
            include_knowledge: true,
            top_k: config.default_top_k,
            semantic_threshold: config.default_semantic_threshold,
        }
    }
}

/// One retrieval hit (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryResult {
    pub layer: Layer,
    pub content: String,
    pub confidence: f32,
    pub similarity: Option<f32>,
    pub timestamp: DateTime<Utc>,
    pub metadata: serde_json::Value,
}
