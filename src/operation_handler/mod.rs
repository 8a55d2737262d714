//! Framework-agnostic yearbook operation handler.
//!
//! This module turns transport-neutral requests into server calls and wraps
//! every outcome in one response envelope, `{ok, status, data | error}`.
//!
//! # Key Types
//!
//! - [`YearbookOperationHandler`] - Main handler for processing operations
//! - [`OperationRequest`] - An operation with its bearer token and request id
//! - [`OperationResponse`] - The normalized response envelope
//!
//! # Examples
//!
//! ```rust,no_run
//! use yearbook_server::operation_handler::{
//!     DepartmentOperation, OperationRequest, YearbookOperationHandler,
//! };
//! use yearbook_server::storage::InMemoryStorage;
//! use yearbook_server::{YearbookConfig, YearbookServer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = YearbookServer::new(InMemoryStorage::new(), YearbookConfig::new("secret"))?;
//! let handler = YearbookOperationHandler::new(server);
//!
//! let response = handler
//!     .handle_operation(OperationRequest::new(DepartmentOperation::List))
//!     .await;
//! assert!(response.ok);
//! # Ok(())
//! # }
//! ```

mod core;
mod errors;
mod handlers;

pub use core::{
    AccountOperation, AlbumOperation, DepartmentOperation, EventOperation, ImageOperation,
    OperationError, OperationRequest, OperationResponse, ReportOperation, StudentOperation,
    YearbookOperation, YearbookOperationHandler,
};

pub use errors::{INTERNAL_ERROR_MESSAGE, create_error_response};
