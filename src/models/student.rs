use crate::models::{Document, TenantScoped};
use crate::tenant::{ObjectId, TenantFields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student, identified inside a department by reference number.
///
/// Profile fields start empty and are filled by the student once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: ObjectId,
    pub reference_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub quote: String,
    #[serde(flatten)]
    pub tenant: TenantFields,
    pub created_at: DateTime<Utc>,
}

impl Student {
    /// A student with an empty profile in the canonical tenant encoding.
    pub fn new(reference_number: impl Into<String>, department_id: ObjectId, now: DateTime<Utc>) -> Self {
        Self {
            id: ObjectId::new(),
            reference_number: reference_number.into(),
            name: String::new(),
            nickname: String::new(),
            image: String::new(),
            phone_number: String::new(),
            quote: String::new(),
            tenant: TenantFields::canonical(department_id),
            created_at: now,
        }
    }

    /// Whether the self-service profile has been submitted.
    pub fn has_profile(&self) -> bool {
        !self.name.is_empty()
    }
}

impl Document for Student {
    const COLLECTION: &'static str = "students";
    const RESOURCE_TYPE: &'static str = "Student";

    fn id(&self) -> ObjectId {
        self.id
    }
}

impl TenantScoped for Student {
    fn tenant(&self) -> &TenantFields {
        &self.tenant
    }

    fn tenant_mut(&mut self) -> &mut TenantFields {
        &mut self.tenant
    }
}
