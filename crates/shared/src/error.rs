//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Module-level errors (ledger, payment, analytic) are mapped into this
/// taxonomy at the boundary so the HTTP layer can render a response
/// without knowing which subsystem failed.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced entity does not exist.
    #[error("Not found: {entity} {id}")]
    NotFound {
        /// Entity kind (e.g. "document", "payment").
        entity: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },

    /// Payment allocation violates an allocation ceiling.
    #[error("Invalid allocation: {0}")]
    InvalidAllocation(String),

    /// A line references a product that does not exist.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Constraint violation surfaced from the store (e.g., duplicate code).
    #[error("Persistence conflict: {0}")]
    PersistenceConflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidAllocation(_) | Self::Validation(_) => 400,
            Self::InvalidProduct(_) => 422,
            Self::PersistenceConflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidAllocation(_) => "INVALID_ALLOCATION",
            Self::InvalidProduct(_) => "INVALID_PRODUCT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::PersistenceConflict(_) => "PERSISTENCE_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::NotFound {
                entity: "document",
                id: String::new()
            }
            .status_code(),
            404
        );
        assert_eq!(AppError::InvalidAllocation(String::new()).status_code(), 400);
        assert_eq!(AppError::InvalidProduct(String::new()).status_code(), 422);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(
            AppError::PersistenceConflict(String::new()).status_code(),
            409
        );
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::NotFound {
                entity: "payment",
                id: String::new()
            }
            .error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            AppError::InvalidAllocation(String::new()).error_code(),
            "INVALID_ALLOCATION"
        );
        assert_eq!(
            AppError::InvalidProduct(String::new()).error_code(),
            "INVALID_PRODUCT"
        );
        assert_eq!(
            AppError::PersistenceConflict(String::new()).error_code(),
            "PERSISTENCE_CONFLICT"
        );
        assert_eq!(AppError::Database(String::new()).error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound {
                entity: "document",
                id: "42".into()
            }
            .to_string(),
            "Not found: document 42"
        );
        assert_eq!(
            AppError::InvalidAllocation("msg".into()).to_string(),
            "Invalid allocation: msg"
        );
        assert_eq!(
            AppError::PersistenceConflict("msg".into()).to_string(),
            "Persistence conflict: msg"
        );
    }
}
