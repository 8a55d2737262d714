use crate::models::{Document, TenantScoped};
use crate::tenant::{ObjectId, TenantFields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A picture uploaded into an album by a student.
///
/// `album_name` is a denormalized copy of the album's name and is what the
/// department statistics count against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ObjectId,
    pub album_name: String,
    pub album_id: ObjectId,
    #[serde(rename = "pictureURL")]
    pub picture_url: String,
    pub uploaded_by: String,
    pub reference_number: String,
    #[serde(flatten)]
    pub tenant: TenantFields,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Document for Image {
    const COLLECTION: &'static str = "images";
    const RESOURCE_TYPE: &'static str = "Image";

    fn id(&self) -> ObjectId {
        self.id
    }
}

impl TenantScoped for Image {
    fn tenant(&self) -> &TenantFields {
        &self.tenant
    }

    fn tenant_mut(&mut self) -> &mut TenantFields {
        &mut self.tenant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picture_url_attribute_name() {
        let now = Utc::now();
        let image = Image {
            id: ObjectId::new(),
            album_name: "Prom".into(),
            album_id: ObjectId::new(),
            picture_url: "https://cdn.example.com/p.jpg".into(),
            uploaded_by: "Ada".into(),
            reference_number: "REF-1".into(),
            tenant: TenantFields::canonical(ObjectId::new()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["pictureURL"], "https://cdn.example.com/p.jpg");
        assert!(json.get("pictureUrl").is_none());
    }
}
