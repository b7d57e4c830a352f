//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is terminal to the command that raised it. The message is meant to be
/// shown to the caller as-is, so `Display` renders it without a prefix.
///
/// Unknown streams are reported by the event store, not here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input, independent of any history (e.g. a non-positive board side).
    #[error("{0}")]
    Validation(String),

    /// Well-formed input that breaks a rule given the current history.
    #[error("{0}")]
    RuleViolation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn rule(msg: impl Into<String>) -> Self {
        Self::RuleViolation(msg.into())
    }

    /// The caller-facing message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            DomainError::Validation(msg) | DomainError::RuleViolation(msg) => msg,
        }
    }
}
