use crate::models::{Document, TenantScoped};
use crate::tenant::{ObjectId, TenantFields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A photo album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: ObjectId,
    pub album_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(flatten)]
    pub tenant: TenantFields,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Album {
    pub fn new(
        album_name: impl Into<String>,
        cover_image: Option<String>,
        department_id: ObjectId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            album_name: album_name.into(),
            cover_image,
            tenant: TenantFields::canonical(department_id),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Album {
    const COLLECTION: &'static str = "albums";
    const RESOURCE_TYPE: &'static str = "Album";
    const LEGACY_TENANT_NAME: bool = true;

    fn id(&self) -> ObjectId {
        self.id
    }
}

impl TenantScoped for Album {
    fn tenant(&self) -> &TenantFields {
        &self.tenant
    }

    fn tenant_mut(&mut self) -> &mut TenantFields {
        &mut self.tenant
    }
}
