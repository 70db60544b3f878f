//! Unified error type for the domain layer
//!
//! Every pure operation on encounters reports failure through [`DomainError`],
//! so the engine can map it without falling back to strings or anyhow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when encounter invariants are violated:
    /// - Duplicate group, creature or hero ids
    /// - A round below 1
    /// - Minion pools with a zero count or zero stamina per minion
    ///
    /// # Example
    /// ```ignore
    /// if count == 0 {
    ///     return Err(DomainError::validation("minionCount must be positive"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
