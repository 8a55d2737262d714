//! Error handling utilities for operation handlers

use crate::error::{YearbookError, YearbookResult};
use crate::error::ValidationError;
use crate::operation_handler::core::{OperationError, OperationResponse};
use crate::tenant::ObjectId;

/// Message returned in place of internal error details.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Create an error response from a YearbookError.
///
/// Internal failures (storage, serialization, hashing) carry a generic
/// message unless `expose_internal` is set.
pub fn create_error_response(
    error: YearbookError,
    request_id: String,
    expose_internal: bool,
) -> OperationResponse {
    let msg = if error.is_internal() && !expose_internal {
        INTERNAL_ERROR_MESSAGE.to_string()
    } else {
        error.to_string()
    };

    let field = match &error {
        YearbookError::Validation(ve) => ve.field().map(str::to_string),
        _ => None,
    };

    OperationResponse {
        ok: false,
        status: error.status_code(),
        data: None,
        error: Some(OperationError {
            code: error.error_code().to_string(),
            msg,
            field,
        }),
        request_id,
    }
}

/// Parse an id taken from a route segment.
pub(super) fn parse_id(field: &str, raw: &str) -> YearbookResult<ObjectId> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| ValidationError::format(field, "must be a 24-character hex id").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;

    #[test]
    fn test_internal_details_are_hidden_by_default() {
        let response = create_error_response(
            YearbookError::internal("disk on fire"),
            "r1".into(),
            false,
        );
        assert_eq!(response.status, 500);
        let error = response.error.unwrap();
        assert_eq!(error.msg, INTERNAL_ERROR_MESSAGE);
        assert_eq!(error.code, "INTERNAL_ERROR");

        let exposed = create_error_response(YearbookError::internal("disk on fire"), "r1".into(), true);
        assert!(exposed.error.unwrap().msg.contains("disk on fire"));
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let response = create_error_response(
            YearbookError::not_found("Image", "abc"),
            "r2".into(),
            false,
        );
        assert_eq!(response.status, 404);
        assert_eq!(response.error.unwrap().msg, "Image not found: abc");

        let response = create_error_response(AuthError::AccountInactive.into(), "r3".into(), false);
        assert_eq!(response.status, 401);
        assert_eq!(response.error.unwrap().code, "ACCOUNT_INACTIVE");
    }

    #[test]
    fn test_validation_error_names_field() {
        let response = create_error_response(
            ValidationError::missing("title").into(),
            "r4".into(),
            false,
        );
        assert_eq!(response.status, 400);
        assert_eq!(response.error.unwrap().field.as_deref(), Some("title"));
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("id", "64b7f0c2a1b2c3d4e5f60718").is_ok());
        let err = parse_id("id", "nope").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
