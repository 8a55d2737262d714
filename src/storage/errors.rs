//! Storage-specific error types for document operations.
//!
//! These errors describe persistence failures only. They carry no knowledge of
//! departments, tenants or HTTP semantics; the server layer maps them onto
//! [`crate::error::YearbookError`].

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Invalid data format or structure that cannot be stored.
    InvalidData { message: String },

    /// Invalid query parameters or search criteria.
    InvalidQuery {
        message: String,
        attribute: Option<String>,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InvalidData { message } => write!(f, "Invalid data: {}", message),
            StorageError::InvalidQuery { message, attribute } => match attribute {
                Some(attr) => write!(f, "Invalid query: {} (attribute: {})", message, attr),
                None => write!(f, "Invalid query: {}", message),
            },
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    /// Create an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        StorageError::InvalidData {
            message: message.into(),
        }
    }

    /// Create an invalid query error for a specific attribute.
    pub fn invalid_query(message: impl Into<String>, attribute: impl Into<String>) -> Self {
        StorageError::InvalidQuery {
            message: message.into(),
            attribute: Some(attribute.into()),
        }
    }
}
