//! Stored records and request payloads.
//!
//! Every record serializes to camelCase JSON and is stored under its
//! [`Document::COLLECTION`] with its hex id as the document id. Records owned
//! by a department flatten [`TenantFields`] into the document.

pub mod admin;
pub mod album;
pub mod department;
pub mod event;
pub mod image;
pub mod payloads;
pub mod report;
pub mod student;

pub use admin::Admin;
pub use album::Album;
pub use department::{Department, slugify};
pub use event::{Event, EventStatus};
pub use image::Image;
pub use payloads::*;
pub use report::Report;
pub use student::Student;

use crate::error::YearbookResult;
use crate::storage::StorageKey;
use crate::tenant::{ObjectId, TenantFields};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A record stored in its own collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the record lives in.
    const COLLECTION: &'static str;

    /// Human-readable type name used in errors and logs.
    const RESOURCE_TYPE: &'static str;

    /// Whether records of this kind may carry the legacy `workspaceName`
    /// tenant attribute.
    const LEGACY_TENANT_NAME: bool = false;

    /// Record id.
    fn id(&self) -> ObjectId;

    /// Storage key of this record.
    fn storage_key(&self) -> StorageKey {
        StorageKey::new(Self::COLLECTION, self.id().to_hex())
    }
}

/// A record owned by exactly one department.
pub trait TenantScoped: Document {
    fn tenant(&self) -> &TenantFields;

    fn tenant_mut(&mut self) -> &mut TenantFields;

    /// Whether the record belongs to `department` under any stored encoding.
    fn belongs_to(&self, department: &Department) -> bool {
        self.tenant().belongs_to(department)
    }
}

/// Decode stored documents into records.
pub fn decode_documents<D: Document>(found: Vec<(StorageKey, Value)>) -> YearbookResult<Vec<D>> {
    found
        .into_iter()
        .map(|(_, value)| serde_json::from_value(value).map_err(Into::into))
        .collect()
}
