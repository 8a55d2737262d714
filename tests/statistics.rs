//! Department statistics.

mod common;

use common::{add_students, ctx, server, tenant};
use yearbook_server::models::{ImageUpload, NewAlbum, NewEvent};
use yearbook_server::tenant::TenantIdentifier;

#[tokio::test]
async fn test_statistics_for_own_department() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    add_students(&server, &cs, &["S1", "S2", "S3"]).await;

    let trip = server
        .create_album(
            &cs.admin,
            NewAlbum {
                album_name: "Trip".into(),
                cover_image: None,
            },
        )
        .await
        .unwrap();
    server
        .create_album(
            &cs.admin,
            NewAlbum {
                album_name: "Empty".into(),
                cover_image: None,
            },
        )
        .await
        .unwrap();

    for reference in ["S1", "S2"] {
        server
            .upload_image(
                ImageUpload {
                    album_name: "Trip".into(),
                    album_id: trip.id.to_hex(),
                    picture_url: "https://cdn.example.com/a.jpg".into(),
                    uploaded_by: reference.into(),
                    reference_number: reference.into(),
                    department_slug: "cs-dept".into(),
                },
                &ctx(),
            )
            .await
            .unwrap();
    }

    for (title, date) in [("Past", "2024-06-01"), ("Today", "2024-06-15T20:00:00Z"), ("Later", "2024-09-01")] {
        server
            .create_event(
                &cs.admin,
                NewEvent {
                    title: title.into(),
                    description: "Something for everyone".into(),
                    venue: "Main hall".into(),
                    event_date: date.into(),
                },
            )
            .await
            .unwrap();
    }

    let by_slug = server
        .department_statistics(&cs.admin, &TenantIdentifier::slug("cs-dept"))
        .await
        .unwrap();
    assert_eq!(by_slug.total_users, 3);
    assert_eq!(by_slug.total_albums, 2);
    assert_eq!(by_slug.total_images, 2);
    assert_eq!(by_slug.active_events, 2);

    let by_id = server
        .department_statistics(&cs.admin, &TenantIdentifier::department(cs.department.id))
        .await
        .unwrap();
    assert_eq!(by_id, by_slug);

    let json = serde_json::to_value(by_id).unwrap();
    assert_eq!(json["totalUsers"], 3);
    assert_eq!(json["activeEvents"], 2);
}

#[tokio::test]
async fn test_statistics_of_other_departments_are_forbidden() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    tenant(&server, "b", "Maths", "MA").await;

    let err = server
        .department_statistics(&cs.admin, &TenantIdentifier::slug("maths"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let missing = server
        .department_statistics(&cs.admin, &TenantIdentifier::slug("nowhere"))
        .await
        .unwrap_err();
    assert_eq!(missing.status_code(), 404);
}

#[tokio::test]
async fn test_empty_department() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;

    let stats = server
        .department_statistics(&cs.admin, &TenantIdentifier::slug("cs-dept"))
        .await
        .unwrap();
    assert_eq!(stats, Default::default());
}

#[tokio::test]
async fn test_shared_album_names_stay_in_their_department() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    let physics = tenant(&server, "b", "Physics", "PH").await;
    add_students(&server, &physics, &["P1"]).await;

    let mut albums = Vec::new();
    for department in [&cs, &physics] {
        let album = server
            .create_album(
                &department.admin,
                NewAlbum {
                    album_name: "Graduation".into(),
                    cover_image: None,
                },
            )
            .await
            .unwrap();
        albums.push(album);
    }
    let album = &albums[1];

    for _ in 0..3 {
        server
            .upload_image(
                ImageUpload {
                    album_name: "Graduation".into(),
                    album_id: album.id.to_hex(),
                    picture_url: "https://cdn.example.com/g.jpg".into(),
                    uploaded_by: "P1".into(),
                    reference_number: "P1".into(),
                    department_slug: "physics".into(),
                },
                &ctx(),
            )
            .await
            .unwrap();
    }

    let cs_stats = server
        .department_statistics(&cs.admin, &TenantIdentifier::slug("cs-dept"))
        .await
        .unwrap();
    assert_eq!(cs_stats.total_albums, 1);
    assert_eq!(cs_stats.total_images, 0);
    assert_eq!(server.count_images(&cs.admin).await.unwrap(), 0);

    let physics_stats = server
        .department_statistics(&physics.admin, &TenantIdentifier::slug("physics"))
        .await
        .unwrap();
    assert_eq!(physics_stats.total_images, 3);
}
