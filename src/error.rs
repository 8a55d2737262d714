//! Error types for yearbook operations.
//!
//! Every server operation returns [`YearbookResult`]. The top-level
//! [`YearbookError`] knows which HTTP-equivalent status and machine-readable
//! code it maps to, so transports never have to inspect variants themselves.

use crate::auth::AuthError;

/// Main error type for yearbook server operations.
#[derive(Debug, thiserror::Error)]
pub enum YearbookError {
    /// Malformed or missing request fields
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist (or is not visible to the caller)
    #[error("{resource_type} not found: {id}")]
    NotFound { resource_type: String, id: String },

    /// A uniqueness rule would be violated
    #[error("{resource_type} {attribute} already exists: {value}")]
    Conflict {
        resource_type: String,
        attribute: String,
        value: String,
    },

    /// Missing, invalid or expired credentials, or an inactive account
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The caller is authenticated but does not own the record
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Errors from the storage backend
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// Request validation errors.
///
/// Raised at the boundary before any record is read or written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required field is missing or blank
    #[error("Required field '{field}' is missing")]
    MissingField { field: String },

    /// Field length falls outside the allowed bounds
    #[error("Field '{field}' must be between {min} and {max} characters")]
    InvalidLength {
        field: String,
        min: usize,
        max: usize,
    },

    /// Field value has the wrong shape
    #[error("Field '{field}' has invalid format: {details}")]
    InvalidFormat { field: String, details: String },

    /// A list field must contain at least one entry
    #[error("Field '{field}' must not be empty")]
    EmptyList { field: String },

    /// Unknown event status
    #[error("Invalid status '{value}': expected upcoming, ongoing, completed or cancelled")]
    InvalidStatus { value: String },

    /// Numeric field outside its range
    #[error("Field '{field}' must be between {min} and {max}")]
    OutOfRange { field: String, min: u64, max: u64 },
}

impl YearbookError {
    /// Create a not found error.
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Create a conflict error.
    pub fn conflict(
        resource_type: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            resource_type: resource_type.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Wrap a storage backend error.
    pub fn storage<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(error))
    }

    /// HTTP-equivalent status code.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Auth(AuthError::Crypto(_)) => 500,
            Self::Auth(_) => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Storage(_) | Self::Json(_) | Self::Internal { .. } => 500,
        }
    }

    /// Machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Auth(AuthError::AccountInactive) => "ACCOUNT_INACTIVE",
            Self::Auth(AuthError::Crypto(_)) => "INTERNAL_ERROR",
            Self::Auth(_) => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::NotFound { .. } => "RESOURCE_NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Json(_) | Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether this error is a server-side failure rather than a caller mistake.
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}

impl ValidationError {
    /// Create a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a length error.
    pub fn length(field: impl Into<String>, min: usize, max: usize) -> Self {
        Self::InvalidLength {
            field: field.into(),
            min,
            max,
        }
    }

    /// Create a format error.
    pub fn format(field: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            details: details.into(),
        }
    }

    /// The request field this error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field }
            | Self::InvalidLength { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::EmptyList { field }
            | Self::OutOfRange { field, .. } => Some(field),
            Self::InvalidStatus { .. } => Some("status"),
        }
    }
}

/// Result type for yearbook operations.
pub type YearbookResult<T> = Result<T, YearbookError>;
/// Result type for boundary validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            YearbookError::from(ValidationError::missing("title")).status_code(),
            400
        );
        assert_eq!(
            YearbookError::from(AuthError::MissingToken).status_code(),
            401
        );
        assert_eq!(YearbookError::forbidden("nope").status_code(), 403);
        assert_eq!(YearbookError::not_found("Image", "x").status_code(), 404);
        assert_eq!(
            YearbookError::conflict("Department", "slug", "cs").status_code(),
            409
        );
        assert_eq!(
            YearbookError::storage(StorageError::invalid_data("boom")).status_code(),
            500
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            YearbookError::from(AuthError::AccountInactive).error_code(),
            "ACCOUNT_INACTIVE"
        );
        assert_eq!(
            YearbookError::from(AuthError::Crypto("bad key".into())).status_code(),
            500
        );
        assert_eq!(
            YearbookError::not_found("Student", "REF").error_code(),
            "RESOURCE_NOT_FOUND"
        );
        assert!(YearbookError::internal("x").is_internal());
        assert!(!YearbookError::forbidden("x").is_internal());
    }

    #[test]
    fn test_messages() {
        let error = YearbookError::conflict("Department", "slug", "cs-dept");
        assert_eq!(error.to_string(), "Department slug already exists: cs-dept");

        let error = ValidationError::length("title", 3, 255);
        assert_eq!(
            error.to_string(),
            "Field 'title' must be between 3 and 255 characters"
        );
        assert_eq!(error.field(), Some("title"));
    }

    #[test]
    fn test_storage_source_chain() {
        use std::error::Error;
        let error = YearbookError::storage(StorageError::invalid_data("disk"));
        assert!(error.source().is_some());
    }
}
