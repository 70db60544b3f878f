//! Error types for port operations.

/// Storage operation errors with context for debugging.
///
/// There is no `NotFound`: a missing encounter is `Ok(None)`, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Filesystem operation failed (full disk, permissions, ...).
    #[error("I/O error in {operation}: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },

    /// Serialization failed while writing. Unreadable documents on the read
    /// path are reported as absent instead.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create an Io error with operation context.
    pub fn io(operation: &'static str, message: impl ToString) -> Self {
        Self::Io {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}
