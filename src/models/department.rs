use crate::models::Document;
use crate::tenant::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: ObjectId,
    pub name: String,
    pub code: String,
    pub slug: String,
    /// Owning admin id as text; empty until signup links the admin.
    #[serde(default)]
    pub admin_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Department {
    /// A department not yet linked to an admin.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        slug: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            code: code.into(),
            slug: slug.into(),
            admin_id: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether signup finished linking the owning admin.
    pub fn is_linked(&self) -> bool {
        !self.admin_id.is_empty()
    }
}

impl Document for Department {
    const COLLECTION: &'static str = "departments";
    const RESOURCE_TYPE: &'static str = "Department";

    fn id(&self) -> ObjectId {
        self.id
    }
}

/// URL-safe slug: trimmed, lowercased, whitespace runs replaced by one hyphen.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
