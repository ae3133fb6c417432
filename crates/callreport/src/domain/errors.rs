//! Domain Errors
//!
//! Error types for domain operations.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// Caller-supplied input has the wrong shape or is out of range.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence failure: connectivity loss, timeout, or a constraint
    /// violation outside the expected upsert conflict path.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    /// True for storage-layer faults the upstream should retry by redelivery.
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::Repository(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_failure_is_distinct() {
        assert!(DomainError::Repository("connection reset".into()).is_persistence_failure());
        assert!(!DomainError::Validation("page must be >= 1".into()).is_persistence_failure());
        assert!(!DomainError::not_found("CallRecord", "abc").is_persistence_failure());
    }

    #[test]
    fn test_not_found_message() {
        let err = DomainError::not_found("CallRecord", "call-123");
        assert_eq!(
            err.to_string(),
            "Entity not found: CallRecord with id call-123"
        );
    }
}
