//! Core enums shared across the memory model: the three storage layers, the
//! router's decision space, and conversational context tagging.

use serde::{Deserialize, Serialize};

/// One of the three memory layers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Layer {
    /// Identity memory — exact key/value user attributes.
    Imm,
    /// Experience memory — decaying conversational events.
    Emm,
    /// Knowledge memory — durable skills/concepts.
    Kmm,
}

impl Layer {
    /// Priority used when merging retrieval results (higher wins ties).
    pub fn priority(self) -> u8 {
        match self {
            Layer::Imm => 3,
            Layer::Emm => 2,
            Layer::Kmm => 1,
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Imm => write!(f, "IMM"),
            Layer::Emm => write!(f, "EMM"),
            Layer::Kmm => write!(f, "KMM"),
        }
    }
}

impl std::str::FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "IMM" => Ok(Layer::Imm),
            "EMM" => Ok(Layer::Emm),
            "KMM" => Ok(Layer::Kmm),
            other => Err(format!("unknown layer: {other}")),
        }
    }
}

/// The router's full decision space: the three layers plus three meta-decisions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Imm,
    Emm,
    Kmm,
    /// Insufficient certainty (`p_top < CONFIDENCE_THRESHOLD`).
    Ask,
    /// Competing intents (`p_top - p_second < CONFLICT_MARGIN`).
    Conflict,
    /// Safety-blocked content; caller must not persist.
    None,
}

impl Decision {
    /// Convert to a concrete `Layer` if this decision names one.
    pub fn layer(self) -> Option<Layer> {
        match self {
            Decision::Imm => Some(Layer::Imm),
            Decision::Emm => Some(Layer::Emm),
            Decision::Kmm => Some(Layer::Kmm),
            _ => None,
        }
    }
}

impl From<Layer> for Decision {
    fn from(layer: Layer) -> Self {
        match layer {
            Layer::Imm => Decision::Imm,
            Layer::Emm => Decision::Emm,
            Layer::Kmm => Decision::Kmm,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Imm => write!(f, "IMM"),
            Decision::Emm => write!(f, "EMM"),
            Decision::Kmm => write!(f, "KMM"),
            Decision::Ask => write!(f, "ASK"),
            Decision::Conflict => write!(f, "CONFLICT"),
            Decision::None => write!(f, "NONE"),
        }
    }
}

/// Conversational context used to scope experience retrieval and detection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    #[default]
    General,
    Family,
    Work,
    College,
    Personal,
    Health,
    Hobby,
}

impl Context {
    /// All non-general contexts, in the enum-order tiebreak used by
    /// `detect_context` (spec.md §4.9).
    pub const ORDERED: [Context; 7] = [
        Context::General,
        Context::Family,
        Context::Work,
        Context::College,
        Context::Personal,
        Context::Health,
        Context::Hobby,
    ];
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Context::General => "general",
            Context::Family => "family",
            Context::Work => "work",
            Context::College => "college",
            Context::Personal => "personal",
            Context::Health => "health",
            Context::Hobby => "hobby",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Context {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" => Ok(Context::General),
            "family" => Ok(Context::Family),
            "work" => Ok(Context::Work),
            "college" => Ok(Context::College),
            "personal" => Ok(Context::Personal),
            "health" => Ok(Context::Health),
            "hobby" => Ok(Context::Hobby),
            other => Err(format!("unknown context: {other}")),
        }
    }
}

/// Where a routing decision came from — carried on `RoutingResult` so the
/// router can skip caching rule-sourced decisions (spec.md §4.4 step 1).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    Rule,
    Cache,
    Ml,
}

/// Role that produced a piece of conversational content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Where an identity fact came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FactSource {
    Explicit,
    Inferred,
}

/// Identity fact category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FactCategory {
    Identity,
    Preference,
    Trait,
    Boundary,
}

/// Knowledge entry category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeCategory {
    Skill,
    Concept,
    Fact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_roundtrips_through_display_and_fromstr() {
        for layer in [Layer::Imm, Layer::Emm, Layer::Kmm] {
            let s = layer.to_string();
            assert_eq!(s.parse::<Layer>().unwrap(), layer);
        }
    }

    #[test]
    fn layer_priority_orders_imm_over_emm_over_kmm() {
        assert!(Layer::Imm.priority() > Layer::Emm.priority());
        assert!(Layer::Emm.priority() > Layer::Kmm.priority());
    }

    #[test]
    fn context_defaults_to_general() {
        assert_eq!(Context::default(), Context::General);
    }

    #[test]
    fn decision_from_layer_round_trips() {
        assert_eq!(Decision::from(Layer::Kmm).layer(), Some(Layer::Kmm));
        assert_eq!(Decision::Ask.layer(), None);
    }
}
