//! `CorrectionEntry` — the teach/retrain log (spec.md §3, §4.4 `learn`/`retrain_from_history`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Layer;

/// One `router.learn` event, appended to the correction log so
/// `retrain_from_history` can replay it after a weight reset.
///
/// `context` holds the raw recent conversation lines `learn` was called
/// with, not a topic tag — `embed_with_context` needs the actual text back
/// to reproduce the same context-blended embedding on replay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionEntry {
    pub text: String,
    pub context: Vec<String>,
    pub correct_layer: Layer,
    pub timestamp: DateTime<Utc>,
}

impl CorrectionEntry {
    pub fn new(text: impl Into<String>, context: Vec<String>, correct_layer: Layer) -> Self {
        Self {
            text: text.into(),
            context,
            correct_layer,
            timestamp: Utc::now(),
        }
    }
}
