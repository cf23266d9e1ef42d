//! Error types for the triage service.

use uuid::Uuid;

use crate::model::InquiryStatus;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Invalid {entity}: {reason}")]
    Validation { entity: String, reason: String },

    #[error("Inquiry {id} already in state {state}, cannot transition to {target}")]
    InvalidTransition {
        id: Uuid,
        state: InquiryStatus,
        target: InquiryStatus,
    },
}

impl StoreError {
    pub fn not_found(entity: &str, id: Uuid) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(entity: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            entity: entity.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while processing an inquiry around the matching engine.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("Satisfaction score must be between 1 and 5, got {0}")]
    ScoreOutOfRange(f64),

    #[error("Manual response needs a template id or a message")]
    EmptyResponse,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
