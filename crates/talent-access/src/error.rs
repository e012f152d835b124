//! Error types for access-control operations
//!
//! Boolean questions (`can_access`, `can_access_feature`, `can_share_to`)
//! answer with a decision, never an error, for ordinary denials; errors are
//! reserved for management operations and infrastructure failures.

use thiserror::Error;

/// Access-control error types.
///
/// Organization-boundary mismatches are deliberately reported as `NotFound`
/// rather than `Forbidden` so that existence never leaks across tenants.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The referenced entity does not exist (or lives in another tenant)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller is not allowed to perform this operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An override names a permission key outside the closed set
    #[error("Invalid override: {0}")]
    InvalidOverride(String),

    /// A uniqueness constraint would be violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store failed
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type for access-control operations.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Check if this error should be logged at error level.
    ///
    /// Denials and missing entities are expected outcomes and should not be
    /// logged as errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AccessError::Store(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::NotFound(_) => 404,
            AccessError::Forbidden(_) => 403,
            AccessError::InvalidOverride(_) => 422,
            AccessError::Conflict(_) => 409,
            AccessError::Store(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::NotFound(_) => "NOT_FOUND",
            AccessError::Forbidden(_) => "FORBIDDEN",
            AccessError::InvalidOverride(_) => "INVALID_OVERRIDE",
            AccessError::Conflict(_) => "CONFLICT",
            AccessError::Store(_) => "STORE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AccessError::NotFound("user".into()).status_code(), 404);
        assert_eq!(AccessError::Forbidden("no".into()).status_code(), 403);
        assert_eq!(AccessError::InvalidOverride("x".into()).status_code(), 422);
        assert_eq!(AccessError::Conflict("dup".into()).status_code(), 409);
        assert_eq!(AccessError::Store("down".into()).status_code(), 500);
    }

    #[test]
    fn test_only_store_errors_are_server_errors() {
        assert!(AccessError::Store("down".into()).is_server_error());
        assert!(!AccessError::Forbidden("no".into()).is_server_error());
        assert!(!AccessError::NotFound("user".into()).is_server_error());
    }
}
