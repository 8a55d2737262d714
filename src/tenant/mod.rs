//! Tenant identity, stored tenant encodings and tenant key resolution.
//!
//! A tenant is a Department. Records point at their Department through up to
//! three attributes whose shapes changed over time:
//!
//! - `workspace`: the department id as text
//! - `departmentId`: a typed reference, or the id as text in older records
//! - `workspaceName`: legacy free text (albums only)
//!
//! [`TenantKeyResolver`] queries each encoding in a fixed order so that a
//! record is visible to its tenant no matter which shape it was stored under.
//! [`TenantFields::belongs_to`] applies the same order to a single record for
//! ownership checks.

pub mod context;
pub mod key;
pub mod object_id;
pub mod resolver;

pub use context::{RequestContext, TenantContext};
pub use key::{TenantFields, TenantKey, TenantPredicate};
pub use object_id::{ObjectId, ObjectIdParseError};
pub use resolver::{ResolvedTenant, TenantIdentifier, TenantKeyResolver, resolution_plan};
