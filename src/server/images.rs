//! Image operations.

use super::core::YearbookServer;
use crate::auth::AuthenticatedContext;
use crate::error::{YearbookError, YearbookResult};
use crate::models::{Image, ImageUpload, TenantScoped};
use crate::storage::{Filter, StorageProvider};
use crate::tenant::{ObjectId, RequestContext, ResolvedTenant, TenantFields};
use log::{debug, info, warn};

impl<S: StorageProvider> YearbookServer<S> {
    /// Accept an image uploaded by a student.
    ///
    /// The department is named by slug. The uploading student and the target
    /// album must both belong to it; nothing is written otherwise. The
    /// stored `albumName` is the album's current name.
    pub async fn upload_image(
        &self,
        request: ImageUpload,
        context: &RequestContext,
    ) -> YearbookResult<Image> {
        request.validate()?;
        let album_id = request.album_id()?;
        let department = self.department_by_slug(request.department_slug.trim()).await?;
        let tenant = ResolvedTenant::of(&department);
        let reference_number = request.reference_number.trim();

        let _guard = self.write_guard.lock().await;

        if self
            .students
            .find_by_reference(&tenant, reference_number)
            .await?
            .is_none()
        {
            warn!(
                "Rejected upload from unknown student {} in {} (request: '{}')",
                reference_number, department.slug, context.request_id
            );
            return Err(YearbookError::not_found("Student", reference_number));
        }

        let album = self
            .albums
            .get_owned(album_id, &department)
            .await?
            .ok_or_else(|| YearbookError::not_found("Album", album_id.to_hex()))?;

        if album.album_name != request.album_name.trim() {
            debug!(
                "Upload named album '{}', storing current name '{}'",
                request.album_name.trim(),
                album.album_name
            );
        }

        let now = self.now();
        let image = Image {
            id: ObjectId::new(),
            album_name: album.album_name,
            album_id: album.id,
            picture_url: request.picture_url.trim().to_string(),
            uploaded_by: request.uploaded_by.trim().to_string(),
            reference_number: reference_number.to_string(),
            tenant: TenantFields::canonical(department.id),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let image = self.images.insert(&image).await?;

        info!(
            "Student {} uploaded image {} to album {} (request: '{}')",
            image.reference_number, image.id, image.album_id, context.request_id
        );
        Ok(image)
    }

    /// Images of an album in the caller's department.
    pub async fn list_images(
        &self,
        context: &AuthenticatedContext,
        album_id: ObjectId,
    ) -> YearbookResult<Vec<Image>> {
        let tenant = self.caller_tenant(context).await?;
        let images = self.images.in_album(&tenant, album_id).await?;
        debug!(
            "Listed {} images of album {} (request: '{}')",
            images.len(),
            album_id,
            context.request_id()
        );
        Ok(images)
    }

    /// Images of an album, whatever department owns it.
    pub async fn list_public_images(
        &self,
        album_id: ObjectId,
        context: &RequestContext,
    ) -> YearbookResult<Vec<Image>> {
        let images = self.images.in_album_unscoped(album_id).await?;
        debug!(
            "Listed {} public images of album {} (request: '{}')",
            images.len(),
            album_id,
            context.request_id
        );
        Ok(images)
    }

    /// Number of images in the caller's department.
    pub async fn count_images(&self, context: &AuthenticatedContext) -> YearbookResult<usize> {
        let tenant = self.caller_tenant(context).await?;
        self.images.count_in_tenant(&tenant, Filter::new()).await
    }

    pub async fn delete_image(
        &self,
        context: &AuthenticatedContext,
        image_id: ObjectId,
    ) -> YearbookResult<Image> {
        let department = self.caller_department(context).await?;
        let image = self
            .images
            .get(image_id)
            .await?
            .ok_or_else(|| YearbookError::not_found("Image", image_id.to_hex()))?;

        if !image.belongs_to(&department) {
            warn!(
                "Admin {} tried to delete image {} of another department (request: '{}')",
                context.admin_id(),
                image.id,
                context.request_id()
            );
            return Err(YearbookError::forbidden(
                "You can only delete images from your department",
            ));
        }

        self.images.delete(image.id).await?;
        info!(
            "Deleted image {} (request: '{}')",
            image.id,
            context.request_id()
        );
        Ok(image)
    }
}
