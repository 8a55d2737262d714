use crate::error::YearbookResult;
use crate::models::Admin;
use crate::repository::Collection;
use crate::storage::{Filter, StorageProvider};
use crate::tenant::ObjectId;
use chrono::{DateTime, Utc};
use std::ops::Deref;
use std::sync::Arc;

pub struct AdminRepository<S> {
    collection: Collection<S, Admin>,
}

impl<S> Clone for AdminRepository<S> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}

impl<S> Deref for AdminRepository<S> {
    type Target = Collection<S, Admin>;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}

impl<S: StorageProvider> AdminRepository<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            collection: Collection::new(storage),
        }
    }

    pub async fn find_by_username(&self, username: &str) -> YearbookResult<Option<Admin>> {
        self.collection
            .find_one(&Filter::new().eq("username", username))
            .await
    }

    /// Activate or deactivate an account. Returns the updated admin, or
    /// `None` when no admin has `id`.
    pub async fn set_active(
        &self,
        id: ObjectId,
        active: bool,
        now: DateTime<Utc>,
    ) -> YearbookResult<Option<Admin>> {
        let Some(mut admin) = self.collection.get(id).await? else {
            return Ok(None);
        };
        admin.is_active = active;
        admin.updated_at = now;
        self.collection.save(&admin).await.map(Some)
    }
}
