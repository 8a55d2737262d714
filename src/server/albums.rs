//! Album operations.

use super::core::YearbookServer;
use crate::auth::AuthenticatedContext;
use crate::error::{YearbookError, YearbookResult};
use crate::models::{Album, AlbumUpdate, NewAlbum, TenantScoped};
use crate::storage::StorageProvider;
use crate::tenant::{ObjectId, RequestContext, TenantIdentifier};
use log::{debug, info};

impl<S: StorageProvider> YearbookServer<S> {
    pub async fn create_album(
        &self,
        context: &AuthenticatedContext,
        request: NewAlbum,
    ) -> YearbookResult<Album> {
        request.validate()?;
        let department = self.caller_department(context).await?;

        let cover_image = request
            .cover_image
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let album = Album::new(
            request.album_name.trim(),
            cover_image,
            department.id,
            self.now(),
        );
        let album = self.albums.insert(&album).await?;

        info!(
            "Created album {} '{}' in {} (request: '{}')",
            album.id,
            album.album_name,
            department.slug,
            context.request_id()
        );
        Ok(album)
    }

    /// Albums of any tenant, including albums that only carry the legacy
    /// workspace name.
    pub async fn list_albums(
        &self,
        identifier: &TenantIdentifier,
        context: &RequestContext,
    ) -> YearbookResult<Vec<Album>> {
        let tenant = self.resolver.resolve(identifier).await?;
        let albums = self.albums.in_tenant(&tenant).await?;
        debug!(
            "Listed {} albums for {} (request: '{}')",
            albums.len(),
            identifier,
            context.request_id
        );
        Ok(albums)
    }

    /// Albums of the caller's department.
    pub async fn list_department_albums(
        &self,
        context: &AuthenticatedContext,
    ) -> YearbookResult<Vec<Album>> {
        let tenant = self.caller_tenant(context).await?;
        self.albums.in_tenant(&tenant).await
    }

    /// Update an album of the caller's department.
    ///
    /// A rename is copied to the `albumName` of the album's images.
    pub async fn update_album(
        &self,
        context: &AuthenticatedContext,
        album_id: ObjectId,
        request: AlbumUpdate,
    ) -> YearbookResult<Album> {
        request.validate()?;
        let department = self.caller_department(context).await?;
        let mut album = self
            .albums
            .get(album_id)
            .await?
            .ok_or_else(|| YearbookError::not_found("Album", album_id.to_hex()))?;

        if !album.belongs_to(&department) {
            return Err(YearbookError::forbidden(
                "You can only update albums from your department",
            ));
        }

        let renamed_to = request
            .album_name
            .map(|name| name.trim().to_string())
            .filter(|name| *name != album.album_name);
        if let Some(name) = &renamed_to {
            album.album_name = name.clone();
        }
        if let Some(cover_image) = request.cover_image {
            let cover_image = cover_image.trim().to_string();
            album.cover_image = (!cover_image.is_empty()).then_some(cover_image);
        }
        if let Some(is_active) = request.is_active {
            album.is_active = is_active;
        }

        let now = self.now();
        album.updated_at = now;
        let album = self.albums.save(&album).await?;

        if let Some(name) = renamed_to {
            let mut renamed = 0;
            for mut image in self.images.in_album_unscoped(album.id).await? {
                if image.belongs_to(&department) {
                    image.album_name = name.clone();
                    image.updated_at = now;
                    self.images.save(&image).await?;
                    renamed += 1;
                }
            }
            debug!(
                "Renamed album {} on {} images (request: '{}')",
                album.id,
                renamed,
                context.request_id()
            );
        }

        info!(
            "Updated album {} (request: '{}')",
            album.id,
            context.request_id()
        );
        Ok(album)
    }

    /// Delete an album of the caller's department. Its images are kept.
    pub async fn delete_album(
        &self,
        context: &AuthenticatedContext,
        album_id: ObjectId,
    ) -> YearbookResult<Album> {
        let department = self.caller_department(context).await?;
        let album = self
            .albums
            .get(album_id)
            .await?
            .ok_or_else(|| YearbookError::not_found("Album", album_id.to_hex()))?;

        if !album.belongs_to(&department) {
            return Err(YearbookError::forbidden(
                "You can only delete albums from your department",
            ));
        }

        self.albums.delete(album.id).await?;
        info!(
            "Deleted album {} '{}' (request: '{}')",
            album.id,
            album.album_name,
            context.request_id()
        );
        Ok(album)
    }
}
