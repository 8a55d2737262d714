use crate::error::YearbookResult;
use crate::models::{Album, Event, Image, Report};
use crate::repository::ScopedRepository;
use crate::storage::{Filter, StorageProvider};
use crate::tenant::{ObjectId, ResolvedTenant};
use serde_json::Value;

pub type AlbumRepository<S> = ScopedRepository<S, Album>;
pub type ImageRepository<S> = ScopedRepository<S, Image>;
pub type EventRepository<S> = ScopedRepository<S, Event>;
pub type ReportRepository<S> = ScopedRepository<S, Report>;

impl<S: StorageProvider> ScopedRepository<S, Album> {
    /// Names of every album in the tenant, in storage order.
    pub async fn names_in_tenant(&self, tenant: &ResolvedTenant) -> YearbookResult<Vec<String>> {
        Ok(self
            .in_tenant(tenant)
            .await?
            .into_iter()
            .map(|album| album.album_name)
            .collect())
    }
}

impl<S: StorageProvider> ScopedRepository<S, Image> {
    /// Images of one album in the tenant.
    pub async fn in_album(
        &self,
        tenant: &ResolvedTenant,
        album_id: ObjectId,
    ) -> YearbookResult<Vec<Image>> {
        self.find_in_tenant(tenant, Filter::new().eq("albumId", album_id.to_hex()))
            .await
    }

    /// Images of one album regardless of tenant.
    pub async fn in_album_unscoped(&self, album_id: ObjectId) -> YearbookResult<Vec<Image>> {
        self.find(&Filter::new().eq("albumId", album_id.to_hex()))
            .await
    }

    /// Count images in the tenant whose denormalized album name is one of
    /// `names`.
    pub async fn count_by_album_names(
        &self,
        tenant: &ResolvedTenant,
        names: &[String],
    ) -> YearbookResult<usize> {
        if names.is_empty() {
            return Ok(0);
        }
        let values = names.iter().cloned().map(Value::String).collect();
        self.count_in_tenant(tenant, Filter::new().one_of("albumName", values))
            .await
    }
}
