//! Multi-tenant yearbook backend for Rust.
//!
//! Departments are tenants. Each department's admins manage its students,
//! albums, images, events and reports; students fill in their own profile
//! and upload images with only their reference number. Records written over
//! the years point at their department in several incompatible ways, and the
//! tenant key resolver finds them under every one of those encodings.
//!
//! # Core Components
//!
//! - [`YearbookServer`] - Every yearbook operation as an async method
//! - [`tenant::TenantKeyResolver`] - Tenant scoping across stored encodings
//! - [`storage::StorageProvider`] - Trait for implementing storage backends
//! - [`operation_handler::YearbookOperationHandler`] - Transport-neutral dispatcher
//! - [`migration::TenantBackfill`] - One-time rewrite to the canonical encoding
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use yearbook_server::{YearbookConfig, YearbookServer};
//! use yearbook_server::models::{SigninRequest, SignupRequest};
//! use yearbook_server::storage::InMemoryStorage;
//! use yearbook_server::tenant::RequestContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = YearbookServer::new(InMemoryStorage::new(), YearbookConfig::from_env()?)?;
//! let context = RequestContext::with_generated_id();
//!
//! server
//!     .signup(
//!         SignupRequest {
//!             username: "a".into(),
//!             password: "p".into(),
//!             department_name: "CS Dept".into(),
//!             department_code: "CS".into(),
//!         },
//!         &context,
//!     )
//!     .await?;
//!
//! let signed_in = server
//!     .signin(SigninRequest { username: "a".into(), password: "p".into() }, &context)
//!     .await?;
//! let admin = server.authenticate(&signed_in.token)?.into_context(context.request_id.clone());
//! let albums = server.list_department_albums(&admin).await?;
//! assert!(albums.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod migration;
pub mod models;
pub mod operation_handler;
pub mod repository;
pub mod server;
pub mod statistics;
pub mod storage;
pub mod tenant;

// Re-export commonly used types for convenience
pub use config::YearbookConfig;
pub use error::{ValidationError, YearbookError, YearbookResult};
pub use server::{YearbookServer, YearbookServerBuilder};
pub use tenant::{RequestContext, TenantContext, TenantIdentifier};

pub use auth::{AdminIdentity, AuthError, AuthenticatedContext};
pub use migration::{BackfillReport, TenantBackfill};
pub use operation_handler::{OperationRequest, OperationResponse, YearbookOperationHandler};
pub use statistics::DepartmentStatistics;
