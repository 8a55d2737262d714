//! Stored tenant encodings.
//!
//! Records written at different times point at their Department in different
//! ways. These types model every shape that occurs in stored documents so the
//! resolver can query each of them exactly.

use crate::models::Department;
use crate::storage::Filter;
use crate::tenant::object_id::ObjectId;
use crate::tenant::resolver::{ResolvedTenant, resolution_plan};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// Attribute holding the stringified department id.
pub const WORKSPACE_ATTR: &str = "workspace";
/// Attribute holding the department reference (or its text form).
pub const DEPARTMENT_ID_ATTR: &str = "departmentId";
/// Legacy free-text attribute naming the department.
pub const WORKSPACE_NAME_ATTR: &str = "workspaceName";

/// Value of a `departmentId` attribute.
///
/// A typed reference is stored as `{"$oid": "<hex>"}`; older writers stored
/// the bare hex string. Both shapes compare unequal in storage, so each one
/// needs its own query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTenantKey", into = "RawTenantKey")]
pub enum TenantKey {
    /// Typed object reference.
    Reference(ObjectId),
    /// Plain text.
    Text(String),
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawTenantKey {
    Reference {
        #[serde(rename = "$oid")]
        oid: ObjectId,
    },
    Text(String),
}

impl From<RawTenantKey> for TenantKey {
    fn from(raw: RawTenantKey) -> Self {
        match raw {
            RawTenantKey::Reference { oid } => TenantKey::Reference(oid),
            RawTenantKey::Text(text) => TenantKey::Text(text),
        }
    }
}

impl From<TenantKey> for RawTenantKey {
    fn from(key: TenantKey) -> Self {
        match key {
            TenantKey::Reference(oid) => RawTenantKey::Reference { oid },
            TenantKey::Text(text) => RawTenantKey::Text(text),
        }
    }
}

impl TenantKey {
    /// The stored JSON shape of this key.
    pub fn to_value(&self) -> Value {
        match self {
            TenantKey::Reference(oid) => reference_value(oid),
            TenantKey::Text(text) => Value::String(text.clone()),
        }
    }

    /// The key as text: hex for references.
    pub fn as_text(&self) -> String {
        match self {
            TenantKey::Reference(oid) => oid.to_hex(),
            TenantKey::Text(text) => text.clone(),
        }
    }

    /// Interpret the key as an object id, if it is one or parses as one.
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            TenantKey::Reference(oid) => Some(*oid),
            TenantKey::Text(text) => ObjectId::parse_str(text).ok(),
        }
    }
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantKey::Reference(oid) => write!(f, "ObjectId({})", oid),
            TenantKey::Text(text) => write!(f, "\"{}\"", text),
        }
    }
}

/// JSON shape of a typed reference.
pub fn reference_value(oid: &ObjectId) -> Value {
    json!({ "$oid": oid.to_hex() })
}

/// Tenant attributes carried by every department-scoped record.
///
/// Flattened into the record, so the attribute names are the stored names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<TenantKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
}

impl TenantFields {
    /// The encoding written by all current code paths.
    pub fn canonical(department_id: ObjectId) -> Self {
        Self {
            workspace: Some(department_id.to_hex()),
            department_id: Some(TenantKey::Reference(department_id)),
            workspace_name: None,
        }
    }

    /// Whether both canonical attributes are present and agree.
    pub fn is_canonical(&self) -> bool {
        match (&self.workspace, &self.department_id) {
            (Some(workspace), Some(TenantKey::Reference(oid))) => *workspace == oid.to_hex(),
            _ => false,
        }
    }

    /// Whether no tenant attribute is present at all.
    pub fn is_empty(&self) -> bool {
        self.workspace.is_none() && self.department_id.is_none() && self.workspace_name.is_none()
    }

    /// Whether this record belongs to `department` under any known encoding.
    ///
    /// Evaluates the same predicates the resolver queries with, so an
    /// ownership check never disagrees with a scoped listing.
    pub fn belongs_to(&self, department: &Department) -> bool {
        resolution_plan(&ResolvedTenant::of(department), true)
            .iter()
            .any(|predicate| predicate.matches(self))
    }
}

/// One step of a resolution plan: a single attribute compared against a
/// single stored shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantPredicate {
    /// `workspace == "<text>"`
    WorkspaceText(String),
    /// `departmentId == {"$oid": "<hex>"}`
    DepartmentReference(ObjectId),
    /// `departmentId == "<text>"`
    DepartmentText(String),
    /// `workspaceName == "<text>"`
    LegacyWorkspaceName(String),
}

impl TenantPredicate {
    /// Stored attribute this predicate compares.
    pub fn attribute(&self) -> &'static str {
        match self {
            TenantPredicate::WorkspaceText(_) => WORKSPACE_ATTR,
            TenantPredicate::DepartmentReference(_) | TenantPredicate::DepartmentText(_) => {
                DEPARTMENT_ID_ATTR
            }
            TenantPredicate::LegacyWorkspaceName(_) => WORKSPACE_NAME_ATTR,
        }
    }

    /// Stored value this predicate expects.
    pub fn value(&self) -> Value {
        match self {
            TenantPredicate::DepartmentReference(oid) => reference_value(oid),
            TenantPredicate::WorkspaceText(text)
            | TenantPredicate::DepartmentText(text)
            | TenantPredicate::LegacyWorkspaceName(text) => Value::String(text.clone()),
        }
    }

    /// Storage filter for this predicate.
    pub fn filter(&self) -> Filter {
        Filter::new().eq(self.attribute(), self.value())
    }

    /// Evaluate the predicate against deserialized tenant fields.
    pub fn matches(&self, fields: &TenantFields) -> bool {
        match self {
            TenantPredicate::WorkspaceText(text) => fields.workspace.as_deref() == Some(text),
            TenantPredicate::DepartmentReference(oid) => {
                fields.department_id == Some(TenantKey::Reference(*oid))
            }
            TenantPredicate::DepartmentText(text) => {
                matches!(&fields.department_id, Some(TenantKey::Text(stored)) if stored == text)
            }
            TenantPredicate::LegacyWorkspaceName(text) => {
                fields.workspace_name.as_deref() == Some(text)
            }
        }
    }
}

impl fmt::Display for TenantPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.attribute(), self.value())
    }
}
