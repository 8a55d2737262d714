use crate::models::Document;
use crate::tenant::{ObjectId, TenantKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Department administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: ObjectId,
    pub username: String,
    /// bcrypt hash
    pub password: String,
    pub department_id: TenantKey,
    pub workspace: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Admin {
    /// A new active admin bound to one department.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        department_id: ObjectId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            username: username.into(),
            password: password_hash.into(),
            department_id: TenantKey::Reference(department_id),
            workspace: department_id.to_hex(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// The admin's department id, whichever shape it is stored in.
    pub fn department(&self) -> Option<ObjectId> {
        self.department_id
            .object_id()
            .or_else(|| ObjectId::parse_str(&self.workspace).ok())
    }
}

impl Document for Admin {
    const COLLECTION: &'static str = "admins";
    const RESOURCE_TYPE: &'static str = "Admin";

    fn id(&self) -> ObjectId {
        self.id
    }
}
