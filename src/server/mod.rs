//! Yearbook server implementation.
//!
//! The server is split into modules by resource:
//! - `core`: the server struct, construction and shared lookups
//! - `builder`: builder pattern for server configuration
//! - `responses`: response bodies that are not plain records
//! - `auth`, `departments`, `students`, `albums`, `images`, `events`,
//!   `reports`: the operations on each resource

mod albums;
mod auth;
mod builder;
mod core;
mod departments;
mod events;
mod images;
mod reports;
pub mod responses;
mod students;

pub use builder::YearbookServerBuilder;
pub use core::YearbookServer;
pub use responses::{
    AdminSummary, BulkStudentsOutcome, EventPage, EventStats, Pagination, SignedInUser,
    SigninResponse, SignupOutcome,
};
