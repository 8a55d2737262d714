//! Album and image handlers.

use super::to_data;
use crate::error::YearbookResult;
use crate::operation_handler::core::{AlbumOperation, Caller, ImageOperation, YearbookOperationHandler};
use crate::operation_handler::errors::parse_id;
use crate::storage::StorageProvider;
use crate::tenant::TenantIdentifier;
use serde_json::{Value, json};

pub async fn handle_album<S: StorageProvider>(
    handler: &YearbookOperationHandler<S>,
    operation: AlbumOperation,
    caller: &Caller,
) -> YearbookResult<Value> {
    let server = handler.server();
    match operation {
        AlbumOperation::Create(request) => to_data(server.create_album(caller.admin()?, request).await?),
        AlbumOperation::List {
            workspace: Some(workspace),
        } => {
            let identifier = TenantIdentifier::infer(workspace);
            to_data(server.list_albums(&identifier, &caller.request).await?)
        }
        AlbumOperation::List { workspace: None } => {
            to_data(server.list_department_albums(caller.admin()?).await?)
        }
        AlbumOperation::Update { id, update } => {
            let id = parse_id("id", &id)?;
            to_data(server.update_album(caller.admin()?, id, update).await?)
        }
        AlbumOperation::Delete { id } => {
            let id = parse_id("id", &id)?;
            to_data(server.delete_album(caller.admin()?, id).await?)
        }
    }
}

pub async fn handle_image<S: StorageProvider>(
    handler: &YearbookOperationHandler<S>,
    operation: ImageOperation,
    caller: &Caller,
) -> YearbookResult<Value> {
    let server = handler.server();
    match operation {
        ImageOperation::Upload(request) => to_data(server.upload_image(request, &caller.request).await?),
        ImageOperation::List { album_id } => {
            let album_id = parse_id("albumId", &album_id)?;
            to_data(server.list_images(caller.admin()?, album_id).await?)
        }
        ImageOperation::ListPublic { album_id } => {
            let album_id = parse_id("albumId", &album_id)?;
            to_data(server.list_public_images(album_id, &caller.request).await?)
        }
        ImageOperation::Count => {
            let count = server.count_images(caller.admin()?).await?;
            Ok(json!({ "count": count }))
        }
        ImageOperation::Delete { id } => {
            let id = parse_id("id", &id)?;
            to_data(server.delete_image(caller.admin()?, id).await?)
        }
    }
}
