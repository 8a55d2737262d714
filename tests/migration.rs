//! Backfilling legacy tenant encodings on a live store.

mod common;

use common::{ctx, now, server, tenant};
use serde_json::json;
use std::sync::Arc;
use yearbook_server::TenantBackfill;
use yearbook_server::models::{Document, Student};
use yearbook_server::storage::{StorageKey, StorageProvider};
use yearbook_server::tenant::{ObjectId, TenantIdentifier};

#[tokio::test]
async fn test_backfill_unifies_listings() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    let hex = cs.department.id.to_hex();
    common::add_students(&server, &cs, &["C1"]).await;

    let legacy = [
        json!({"departmentId": {"$oid": hex}}),
        json!({"departmentId": hex}),
        json!({"workspace": "cs-dept"}),
    ];
    for (n, tenant_fields) in legacy.into_iter().enumerate() {
        let mut student = serde_json::to_value(Student::new(format!("L{n}"), ObjectId::new(), now())).unwrap();
        let object = student.as_object_mut().unwrap();
        object.remove("workspace");
        object.remove("departmentId");
        object.extend(tenant_fields.as_object().unwrap().clone());
        let id = object["id"].as_str().unwrap().to_string();
        server
            .storage()
            .put(StorageKey::new(Student::COLLECTION, id), student)
            .await
            .unwrap();
    }
    let orphan = StorageKey::new(Student::COLLECTION, ObjectId::new().to_hex());
    server
        .storage()
        .put(orphan.clone(), json!({"referenceNumber": "X", "workspace": "gone"}))
        .await
        .unwrap();

    // Before the backfill only the canonical record matches the first step.
    let before = server
        .list_students(&TenantIdentifier::slug("cs-dept"), &ctx())
        .await
        .unwrap();
    assert_eq!(before.len(), 1);

    let report = TenantBackfill::new(Arc::clone(server.storage())).run().await.unwrap();
    assert_eq!(report.scanned, 5);
    assert_eq!(report.already_canonical, 1);
    assert_eq!(report.rewritten, 3);
    assert_eq!(report.unresolved, vec![orphan.clone()]);

    let after = server
        .list_students(&TenantIdentifier::slug("cs-dept"), &ctx())
        .await
        .unwrap();
    assert_eq!(after.len(), 4);
    assert!(after.iter().all(|student| student.tenant.is_canonical()));

    let untouched = server.storage().get(orphan).await.unwrap().unwrap();
    assert_eq!(untouched, json!({"referenceNumber": "X", "workspace": "gone"}));

    let again = TenantBackfill::new(Arc::clone(server.storage())).run().await.unwrap();
    assert_eq!(again.rewritten, 0);
    assert_eq!(again.already_canonical, 4);
}
