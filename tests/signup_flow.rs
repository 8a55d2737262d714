//! Signup, signin and token handling end to end.

mod common;

use common::{PASSWORD, ctx, now, server, server_sharing, signup_request, tenant};
use chrono::Duration;
use futures::future::join_all;
use std::sync::Arc;
use yearbook_server::auth::{AuthError, TokenService};
use yearbook_server::models::{Admin, Document, NewDepartment, SigninRequest};
use yearbook_server::storage::{Filter, StorageKey, StorageProvider};
use yearbook_server::tenant::ObjectId;
use yearbook_server::YearbookError;

fn signin(username: &str, password: &str) -> SigninRequest {
    SigninRequest {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_signup_then_signin_carries_department() {
    let server = server();
    let outcome = server
        .signup(signup_request("a", "CS Dept", "CS"), &ctx())
        .await
        .unwrap();

    assert_eq!(outcome.department.slug, "cs-dept");
    assert_eq!(outcome.department.admin_id, outcome.admin.id.to_hex());
    assert_eq!(outcome.admin.workspace, outcome.department.id.to_hex());

    let response = server.signin(signin("a", PASSWORD), &ctx()).await.unwrap();
    assert_eq!(response.token_type, "x-access-token");
    assert_eq!(response.user.username, "a");

    let claims = TokenService::new(common::SECRET, 60)
        .decode(&response.token, now())
        .unwrap();
    assert_eq!(claims.department_id, outcome.department.id.to_hex());
    assert_eq!(claims.id, outcome.admin.id.to_hex());
    assert_eq!(claims.exp - claims.iat, 5_184_000);
}

#[tokio::test]
async fn test_signup_conflicts() {
    let server = server();
    server
        .signup(signup_request("a", "CS Dept", "CS"), &ctx())
        .await
        .unwrap();

    let same_user = server
        .signup(signup_request("a", "Maths", "MA"), &ctx())
        .await
        .unwrap_err();
    assert!(matches!(same_user, YearbookError::Conflict { ref attribute, .. } if attribute == "username"));

    let same_slug = server
        .signup(signup_request("b", "  cs   DEPT ", "XX"), &ctx())
        .await
        .unwrap_err();
    assert!(matches!(same_slug, YearbookError::Conflict { ref attribute, .. } if attribute == "slug"));

    let same_code = server
        .signup(signup_request("c", "Computing", "CS"), &ctx())
        .await
        .unwrap_err();
    assert_eq!(same_code.status_code(), 409);

    assert_eq!(server.list_departments(&ctx()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_usernames_are_trimmed_before_lookup() {
    let server = server();
    tenant(&server, "a", "CS Dept", "CS").await;

    let padded = server
        .signup(signup_request(" a ", "Physics", "PH"), &ctx())
        .await
        .unwrap_err();
    assert!(matches!(padded, YearbookError::Conflict { ref attribute, .. } if attribute == "username"));

    let admins = server
        .storage()
        .count(StorageKey::collection(Admin::COLLECTION), &Filter::new().eq("username", "a"))
        .await
        .unwrap();
    assert_eq!(admins, 1);
    assert_eq!(server.list_departments(&ctx()).await.unwrap().len(), 1);

    let response = server.signin(signin(" a", PASSWORD), &ctx()).await.unwrap();
    assert_eq!(response.user.username, "a");

    let outcome = server
        .signup(signup_request("  b\t", "Physics", "PH"), &ctx())
        .await
        .unwrap();
    assert_eq!(outcome.admin.username, "b");
    server.signin(signin("b", PASSWORD), &ctx()).await.unwrap();
}

#[tokio::test]
async fn test_signup_requires_every_field() {
    let server = server();
    let mut request = signup_request("a", "CS Dept", "CS");
    request.department_code = "  ".into();

    let err = server.signup(request, &ctx()).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(server.list_departments(&ctx()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_signups_for_one_slug() {
    let server = server();
    let attempts = (0..6).map(|i| {
        let server = &server;
        async move {
            server
                .signup(
                    signup_request(&format!("admin{i}"), "Physics Dept", &format!("P{i}")),
                    &ctx(),
                )
                .await
        }
    });

    let results = join_all(attempts).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(server.list_departments(&ctx()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_the_same() {
    let server = server();
    tenant(&server, "a", "CS Dept", "CS").await;

    let wrong = server.signin(signin("a", "nope"), &ctx()).await.unwrap_err();
    let unknown = server.signin(signin("zz", PASSWORD), &ctx()).await.unwrap_err();

    assert!(matches!(wrong, YearbookError::Auth(AuthError::InvalidCredentials)));
    assert!(matches!(unknown, YearbookError::Auth(AuthError::InvalidCredentials)));
    assert_eq!(wrong.status_code(), 401);
}

#[tokio::test]
async fn test_inactive_admin_cannot_sign_in() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;

    let summary = server
        .set_admin_active(&cs.admin, cs.admin.admin_id(), false)
        .await
        .unwrap();
    assert!(!summary.is_active);

    let err = server.signin(signin("a", PASSWORD), &ctx()).await.unwrap_err();
    assert!(matches!(err, YearbookError::Auth(AuthError::AccountInactive)));
    assert_eq!(err.error_code(), "ACCOUNT_INACTIVE");

    server
        .set_admin_active(&cs.admin, cs.admin.admin_id(), true)
        .await
        .unwrap();
    assert!(server.signin(signin("a", PASSWORD), &ctx()).await.is_ok());
}

#[tokio::test]
async fn test_admins_cannot_manage_other_departments() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;
    let maths = tenant(&server, "b", "Maths", "MA").await;

    let err = server
        .set_admin_active(&cs.admin, maths.admin.admin_id(), false)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let missing = server
        .set_admin_active(&cs.admin, ObjectId::new(), false)
        .await
        .unwrap_err();
    assert_eq!(missing.status_code(), 404);
}

#[tokio::test]
async fn test_token_expires_after_sixty_days() {
    let storage = Arc::new(yearbook_server::storage::InMemoryStorage::new());
    let issuing = server_sharing(Arc::clone(&storage), now());
    let cs = tenant(&issuing, "a", "CS Dept", "CS").await;

    let later = server_sharing(Arc::clone(&storage), now() + Duration::days(59));
    assert!(later.authenticate(&cs.token).is_ok());

    let expired = server_sharing(storage, now() + Duration::days(60));
    let err = expired.authenticate(&cs.token).unwrap_err();
    assert!(matches!(err, YearbookError::Auth(AuthError::TokenExpired)));
}

#[tokio::test]
async fn test_garbage_tokens_are_rejected() {
    let server = server();
    assert!(matches!(
        server.authenticate("Bearer "),
        Err(YearbookError::Auth(AuthError::MissingToken))
    ));
    assert!(matches!(
        server.authenticate("Bearer abc.def.ghi"),
        Err(YearbookError::Auth(AuthError::TokenInvalid(_)))
    ));
}

#[tokio::test]
async fn test_create_department_checks_uniqueness() {
    let server = server();
    let cs = tenant(&server, "a", "CS Dept", "CS").await;

    let created = server
        .create_department(
            &cs.admin,
            NewDepartment {
                name: "Data Science".into(),
                code: "DS".into(),
                slug: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.slug, "data-science");
    assert_eq!(created.admin_id, cs.admin.admin_id().to_hex());

    let fetched = server.get_department_by_slug("data-science", &ctx()).await.unwrap();
    assert_eq!(fetched.id, created.id);

    let err = server
        .create_department(
            &cs.admin,
            NewDepartment {
                name: "Anything".into(),
                code: "X".into(),
                slug: Some("CS Dept".into()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);

    let missing = server.get_department_by_slug("nope", &ctx()).await.unwrap_err();
    assert_eq!(missing.status_code(), 404);
}
