//! `RoutingResult` — the output of `Router::route` (spec.md §4.4, §6).

use serde::{Deserialize, Serialize};

use crate::model::{Decision, RouteSource};
use crate::rules::Command;

/// The outcome of routing one utterance: a decision, the confidence behind
/// it, and where it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingResult {
    pub decision: Decision,
    pub confidence: f32,
    pub source: RouteSource,
    /// Set only when a slash command fired (spec.md §4.1 step 1).
    #[serde(skip)]
    pub command: Option<Command>,
}
