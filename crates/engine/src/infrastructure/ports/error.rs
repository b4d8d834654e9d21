//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Business constraint violated.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn constraint(message: impl ToString) -> Self {
        Self::ConstraintViolation(message.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_entity_and_id() {
        let error = RepoError::not_found("Character", "abc");
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Character not found: abc");
    }

    #[test]
    fn database_error_names_the_operation() {
        let error = RepoError::database("mob.delete_many", "disk I/O error");
        match error {
            RepoError::Database { operation, message } => {
                assert_eq!(operation, "mob.delete_many");
                assert_eq!(message, "disk I/O error");
            }
            _ => panic!("Expected Database variant"),
        }
    }
}
