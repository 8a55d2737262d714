//! Department statistics.
//!
//! Every count is scoped through the tenant resolver, so a department whose
//! records use mixed tenant encodings is still counted in full. Images are
//! linked to the department through their denormalized `albumName`, not
//! their `albumId`.

use crate::error::YearbookResult;
use crate::models::{Album, Department, Event, Image, Student};
use crate::repository::ScopedRepository;
use crate::storage::{Filter, StorageProvider};
use crate::tenant::ResolvedTenant;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// Summary counts for one department.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStatistics {
    pub total_users: usize,
    pub active_events: usize,
    pub total_albums: usize,
    pub total_images: usize,
}

/// Composes department statistics from the scoped repositories.
pub struct StatisticsAggregator<S> {
    students: ScopedRepository<S, Student>,
    events: ScopedRepository<S, Event>,
    albums: ScopedRepository<S, Album>,
    images: ScopedRepository<S, Image>,
}

impl<S: StorageProvider> StatisticsAggregator<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            students: ScopedRepository::new(Arc::clone(&storage)),
            events: ScopedRepository::new(Arc::clone(&storage)),
            albums: ScopedRepository::new(Arc::clone(&storage)),
            images: ScopedRepository::new(storage),
        }
    }

    pub async fn for_department(
        &self,
        department: &Department,
        today: NaiveDate,
    ) -> YearbookResult<DepartmentStatistics> {
        self.for_tenant(&ResolvedTenant::of(department), today).await
    }

    /// Counts for a resolved tenant. Events are active when their status,
    /// as of `today`, is upcoming or ongoing.
    pub async fn for_tenant(
        &self,
        tenant: &ResolvedTenant,
        today: NaiveDate,
    ) -> YearbookResult<DepartmentStatistics> {
        let total_users = self.students.count_in_tenant(tenant, Filter::new()).await?;

        let active_events = self
            .events
            .in_tenant(tenant)
            .await?
            .into_iter()
            .filter(|event| event.status.effective(event.event_date, today).is_active())
            .count();

        let total_albums = self.albums.count_in_tenant(tenant, Filter::new()).await?;

        let album_names = self.albums.names_in_tenant(tenant).await?;
        let total_images = self.images.count_by_album_names(tenant, &album_names).await?;

        Ok(DepartmentStatistics {
            total_users,
            active_events,
            total_albums,
            total_images,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventStatus;
    use crate::storage::InMemoryStorage;
    use crate::tenant::{ObjectId, TenantFields, TenantKey};
    use chrono::{TimeZone, Utc};

    fn event(department: &Department, day: u32, status: EventStatus) -> Event {
        let at = Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap();
        Event {
            id: ObjectId::new(),
            title: "Prom".into(),
            description: "End of year party".into(),
            venue: "Hall".into(),
            event_date: at,
            status,
            created_by: department.admin_id.clone(),
            tenant: TenantFields::canonical(department.id),
            created_at: at,
            updated_at: at,
        }
    }

    fn image(album: &Album) -> Image {
        Image {
            id: ObjectId::new(),
            album_name: album.album_name.clone(),
            album_id: album.id,
            picture_url: "https://cdn.example.com/p.jpg".into(),
            uploaded_by: "Ada".into(),
            reference_number: "R1".into(),
            tenant: album.tenant.clone(),
            is_active: true,
            created_at: album.created_at,
            updated_at: album.created_at,
        }
    }

    #[tokio::test]
    async fn test_counts_across_encodings() {
        let storage = Arc::new(InMemoryStorage::new());
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let department = Department::new("CS Dept", "CS", "cs-dept", now);

        let students: ScopedRepository<_, Student> = ScopedRepository::new(Arc::clone(&storage));
        let mut legacy = Student::new("R2", department.id, now);
        legacy.tenant = TenantFields {
            department_id: Some(TenantKey::Reference(department.id)),
            ..TenantFields::default()
        };
        // The workspace step matches first, so the reference-only record is not counted.
        students.insert(&Student::new("R1", department.id, now)).await.unwrap();
        students.insert(&legacy).await.unwrap();

        let events: ScopedRepository<_, Event> = ScopedRepository::new(Arc::clone(&storage));
        events.insert(&event(&department, 20, EventStatus::Upcoming)).await.unwrap();
        events.insert(&event(&department, 1, EventStatus::Upcoming)).await.unwrap();
        events.insert(&event(&department, 20, EventStatus::Cancelled)).await.unwrap();

        let albums: ScopedRepository<_, Album> = ScopedRepository::new(Arc::clone(&storage));
        let album = Album::new("Graduation", None, department.id, now);
        albums.insert(&album).await.unwrap();

        let images: ScopedRepository<_, Image> = ScopedRepository::new(Arc::clone(&storage));
        images.insert(&image(&album)).await.unwrap();
        images.insert(&image(&album)).await.unwrap();

        let stats = StatisticsAggregator::new(storage)
            .for_department(&department, now.date_naive())
            .await
            .unwrap();

        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.active_events, 1);
        assert_eq!(stats.total_albums, 1);
        assert_eq!(stats.total_images, 2);
    }

    #[tokio::test]
    async fn test_empty_department() {
        let storage = Arc::new(InMemoryStorage::new());
        let department = Department::new("Art", "AR", "art", Utc::now());
        let stats = StatisticsAggregator::new(storage)
            .for_department(&department, Utc::now().date_naive())
            .await
            .unwrap();
        assert_eq!(stats, DepartmentStatistics::default());
    }

    #[test]
    fn test_field_names() {
        let json = serde_json::to_value(DepartmentStatistics::default()).unwrap();
        for field in ["totalUsers", "activeEvents", "totalAlbums", "totalImages"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
    }
}
