use crate::models::{Document, TenantScoped};
use crate::tenant::{ObjectId, TenantFields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder stored when the student has no name on file.
pub const UNKNOWN_STUDENT_NAME: &str = "Unknown";
/// Students have no email on file; reports always carry this placeholder.
pub const NO_STUDENT_EMAIL: &str = "No email";

/// A report a student submitted to their department.
///
/// `student_name` and `student_email` are copied at submission and never
/// refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    pub student_name: String,
    pub student_email: String,
    pub reference_number: String,
    #[serde(flatten)]
    pub tenant: TenantFields,
    #[serde(default)]
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Document for Report {
    const COLLECTION: &'static str = "reports";
    const RESOURCE_TYPE: &'static str = "Report";

    fn id(&self) -> ObjectId {
        self.id
    }
}

impl TenantScoped for Report {
    fn tenant(&self) -> &TenantFields {
        &self.tenant
    }

    fn tenant_mut(&mut self) -> &mut TenantFields {
        &mut self.tenant
    }
}
