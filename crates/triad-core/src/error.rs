//! Crate-wide error types (spec.md §7).

use serde::Serialize;

use crate::model::Layer;

/// Persistence-layer errors, mirroring the shape of a typical
/// `rusqlite`-backed storage error type: one variant per failure mode with
/// `#[from]` conversions for the underlying library errors.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("initialization error: {0}")]
    Init(String),
}

/// Storage-level result alias.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A conflict surfaced by the write pipeline when an identity fact's value
/// disagrees with what's already on file (spec.md §4.8, §7: this is
/// returned as data on a successful response, not thrown).
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConflictInfo {
    pub key: String,
    pub existing_value: String,
    pub new_value: String,
    pub existing_confidence: f32,
    pub suggested_action: SuggestedAction,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    AskUser,
    Update,
}

/// Crate-wide error enum (spec.md §7 error kinds).
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TriadError {
    #[error("blocked by safety rules")]
    SafetyBlocked,

    #[error("could not extract an identity key/value from the text")]
    ExtractionFailed,

    #[error("conflict on identity key {}", .0.key)]
    ConflictDetected(ConflictInfo),

    #[error("embedding service unavailable")]
    EmbeddingUnavailable,

    #[error("required embedding missing for layer {0}")]
    EmbeddingRequired(Layer),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("classifier not yet initialized")]
    ClassifierUninitialized,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TriadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_detected_displays_the_key() {
        let err = TriadError::ConflictDetected(ConflictInfo {
            key: "name".into(),
            existing_value: "John".into(),
            new_value: "Alex".into(),
            existing_confidence: 0.9,
            suggested_action: SuggestedAction::AskUser,
        });
        assert!(err.to_string().contains("name"));
    }
}
