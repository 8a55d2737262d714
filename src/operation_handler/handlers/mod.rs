//! Operation handler modules
//!
//! One module per resource group:
//! - accounts: signup, signin, admin activation and departments
//! - students: student management and profile self-service
//! - media: albums and images
//! - events: event CRUD, listing and statistics
//! - reports: student reports

pub mod accounts;
pub mod events;
pub mod media;
pub mod reports;
pub mod students;

use crate::error::YearbookResult;
use serde::Serialize;
use serde_json::Value;

/// Serialize an operation result into the response payload.
pub(super) fn to_data<T: Serialize>(value: T) -> YearbookResult<Value> {
    Ok(serde_json::to_value(value)?)
}
