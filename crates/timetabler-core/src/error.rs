//! Error types for loading a term domain

use thiserror::Error;

use crate::domain::EntityKind;

/// Raised when a term specification cannot be turned into a consistent
/// domain graph. Generation never starts on a `LoadError`.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Two entities of the same kind share a key
    #[error("duplicate {kind} key `{key}`")]
    DuplicateKey { kind: EntityKind, key: String },

    /// An entity references a key that does not exist
    #[error("{kind} `{key}` references unknown {referenced_kind} `{referenced}`")]
    UnknownReference {
        kind: EntityKind,
        key: String,
        referenced_kind: EntityKind,
        referenced: String,
    },

    /// A field holds a value the engine cannot work with
    #[error("invalid {kind} `{key}`: {reason}")]
    InvalidValue {
        kind: EntityKind,
        key: String,
        reason: String,
    },

    /// The slot grid configuration yields no time slots
    #[error("slot grid produces no time slots")]
    EmptySlotGrid,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoadError {
    pub(crate) fn duplicate(kind: EntityKind, key: &str) -> Self {
        LoadError::DuplicateKey {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn unknown(
        kind: EntityKind,
        key: &str,
        referenced_kind: EntityKind,
        referenced: &str,
    ) -> Self {
        LoadError::UnknownReference {
            kind,
            key: key.to_string(),
            referenced_kind,
            referenced: referenced.to_string(),
        }
    }

    pub(crate) fn invalid(kind: EntityKind, key: &str, reason: impl Into<String>) -> Self {
        LoadError::InvalidValue {
            kind,
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
