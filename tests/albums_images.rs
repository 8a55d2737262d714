//! Albums and student image uploads.

mod common;

use common::{Tenant, TestServer, add_students, ctx, server, tenant};
use yearbook_server::models::{Album, AlbumUpdate, ImageUpload, NewAlbum};
use yearbook_server::storage::StorageProvider;
use yearbook_server::tenant::{ObjectId, TenantIdentifier};

async fn album(server: &TestServer, owner: &Tenant, name: &str) -> Album {
    server
        .create_album(
            &owner.admin,
            NewAlbum {
                album_name: name.to_string(),
                cover_image: Some("https://cdn.example.com/cover.png".into()),
            },
        )
        .await
        .unwrap()
}

fn upload(album: &Album, reference: &str, slug: &str) -> ImageUpload {
    ImageUpload {
        album_name: album.album_name.clone(),
        album_id: album.id.to_hex(),
        picture_url: "https://cdn.example.com/p/1.jpg".into(),
        uploaded_by: "Ada".into(),
        reference_number: reference.to_string(),
        department_slug: slug.to_string(),
    }
}

async fn stored_documents(server: &TestServer) -> usize {
    server.storage().stats().await.total_documents
}

#[tokio::test]
async fn test_upload_by_known_student() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    add_students(&server, &cs, &["S1"]).await;
    let trip = album(&server, &cs, "Trip").await;

    let image = server
        .upload_image(upload(&trip, "S1", "cs-dept"), &ctx())
        .await
        .unwrap();
    assert_eq!(image.album_id, trip.id);
    assert_eq!(image.album_name, "Trip");
    assert!(image.tenant.is_canonical());
    assert!(image.tenant.belongs_to(&cs.department));

    let listed = server.list_images(&cs.admin, trip.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(server.count_images(&cs.admin).await.unwrap(), 1);

    let public = server.list_public_images(trip.id, &ctx()).await.unwrap();
    assert_eq!(public, listed);
}

#[tokio::test]
async fn test_upload_by_unknown_student_writes_nothing() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    add_students(&server, &cs, &["S1"]).await;
    let trip = album(&server, &cs, "Trip").await;
    let before = stored_documents(&server).await;

    let err = server
        .upload_image(upload(&trip, "S404", "cs-dept"), &ctx())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(stored_documents(&server).await, before);
}

#[tokio::test]
async fn test_upload_into_foreign_album_is_rejected() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    let maths = tenant(&server, "b", "Maths", "MA").await;
    add_students(&server, &cs, &["S1"]).await;
    let foreign = album(&server, &maths, "Maths Trip").await;

    let err = server
        .upload_image(upload(&foreign, "S1", "cs-dept"), &ctx())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);

    let mut bad_id = upload(&foreign, "S1", "cs-dept");
    bad_id.album_id = "not-an-id".into();
    let err = server.upload_image(bad_id, &ctx()).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_cross_department_delete_is_forbidden() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    let maths = tenant(&server, "b", "Maths", "MA").await;
    add_students(&server, &cs, &["S1"]).await;
    let trip = album(&server, &cs, "Trip").await;
    let image = server
        .upload_image(upload(&trip, "S1", "cs-dept"), &ctx())
        .await
        .unwrap();

    let err = server.delete_image(&maths.admin, image.id).await.unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert_eq!(err.to_string(), "Forbidden: You can only delete images from your department");
    assert!(
        server
            .storage()
            .exists(yearbook_server::models::Document::storage_key(&image))
            .await
            .unwrap()
    );

    let err = server.delete_album(&maths.admin, trip.id).await.unwrap_err();
    assert_eq!(err.status_code(), 403);

    server.delete_image(&cs.admin, image.id).await.unwrap();
    assert_eq!(server.count_images(&cs.admin).await.unwrap(), 0);

    let missing = server.delete_image(&cs.admin, ObjectId::new()).await.unwrap_err();
    assert_eq!(missing.status_code(), 404);
}

#[tokio::test]
async fn test_rename_reaches_images() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    let maths = tenant(&server, "b", "Maths", "MA").await;
    add_students(&server, &cs, &["S1"]).await;
    let trip = album(&server, &cs, "Trip").await;
    server
        .upload_image(upload(&trip, "S1", "cs-dept"), &ctx())
        .await
        .unwrap();

    let rename = AlbumUpdate {
        album_name: Some("Field Trip".into()),
        ..AlbumUpdate::default()
    };

    let err = server
        .update_album(&maths.admin, trip.id, rename.clone())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let renamed = server.update_album(&cs.admin, trip.id, rename).await.unwrap();
    assert_eq!(renamed.album_name, "Field Trip");
    assert_eq!(renamed.cover_image.as_deref(), Some("https://cdn.example.com/cover.png"));

    let images = server.list_images(&cs.admin, trip.id).await.unwrap();
    assert!(images.iter().all(|image| image.album_name == "Field Trip"));
}

#[tokio::test]
async fn test_album_listings() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    let maths = tenant(&server, "b", "Maths", "MA").await;
    album(&server, &cs, "One").await;
    album(&server, &cs, "Two").await;
    album(&server, &maths, "Other").await;

    assert_eq!(server.list_department_albums(&cs.admin).await.unwrap().len(), 2);
    assert_eq!(
        server
            .list_albums(&TenantIdentifier::slug("maths"), &ctx())
            .await
            .unwrap()
            .len(),
        1
    );

    let err = server
        .create_album(
            &cs.admin,
            NewAlbum {
                album_name: "Bad".into(),
                cover_image: Some("cover.png".into()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_deleting_album_keeps_images() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    add_students(&server, &cs, &["S1"]).await;
    let trip = album(&server, &cs, "Trip").await;
    server
        .upload_image(upload(&trip, "S1", "cs-dept"), &ctx())
        .await
        .unwrap();

    let deleted = server.delete_album(&cs.admin, trip.id).await.unwrap();
    assert_eq!(deleted.id, trip.id);
    assert!(server.list_department_albums(&cs.admin).await.unwrap().is_empty());
    assert_eq!(server.count_images(&cs.admin).await.unwrap(), 1);
}
