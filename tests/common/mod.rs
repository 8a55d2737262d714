//! Shared helpers for yearbook integration tests.
//!
//! Servers run on a fixed clock with the cheapest bcrypt cost, and every
//! helper initialises `env_logger` once so `RUST_LOG=debug cargo test` shows
//! the server's logs.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use yearbook_server::auth::AuthenticatedContext;
use yearbook_server::clock::FixedClock;
use yearbook_server::models::{Department, NewStudent, SigninRequest, SignupRequest};
use yearbook_server::storage::InMemoryStorage;
use yearbook_server::tenant::RequestContext;
use yearbook_server::{YearbookServer, YearbookServerBuilder};

pub const SECRET: &str = "integration-secret";
pub const PASSWORD: &str = "correct horse";

pub type TestServer = YearbookServer<InMemoryStorage>;

/// Midday, 15 June 2024 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn days_from_now(days: i64) -> DateTime<Utc> {
    now() + Duration::days(days)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A server on fresh storage at [`now`].
pub fn server() -> TestServer {
    server_sharing(Arc::new(InMemoryStorage::new()), now())
}

/// A server over existing storage at a chosen instant.
pub fn server_sharing(storage: Arc<InMemoryStorage>, at: DateTime<Utc>) -> TestServer {
    init_logging();
    YearbookServerBuilder::from_shared(storage)
        .with_jwt_secret(SECRET)
        .with_bcrypt_cost(4)
        .with_clock(FixedClock(at))
        .build()
        .expect("test configuration is valid")
}

pub fn ctx() -> RequestContext {
    RequestContext::new(format!("test-{}", uuid::Uuid::new_v4()))
}

/// A signed-up department with its signed-in admin.
pub struct Tenant {
    pub department: Department,
    pub token: String,
    pub admin: AuthenticatedContext,
}

pub fn signup_request(username: &str, department_name: &str, code: &str) -> SignupRequest {
    SignupRequest {
        username: username.to_string(),
        password: PASSWORD.to_string(),
        department_name: department_name.to_string(),
        department_code: code.to_string(),
    }
}

/// Sign up a department, sign its admin in and verify the token.
pub async fn tenant(server: &TestServer, username: &str, department_name: &str, code: &str) -> Tenant {
    let outcome = server
        .signup(signup_request(username, department_name, code), &ctx())
        .await
        .expect("signup succeeds");

    let signed_in = server
        .signin(
            SigninRequest {
                username: username.to_string(),
                password: PASSWORD.to_string(),
            },
            &ctx(),
        )
        .await
        .expect("signin succeeds");

    let admin = server
        .authenticate(&format!("Bearer {}", signed_in.token))
        .expect("token verifies")
        .into_context(format!("test-{}", username));

    Tenant {
        department: outcome.department,
        token: signed_in.token,
        admin,
    }
}

pub async fn add_students(server: &TestServer, tenant: &Tenant, numbers: &[&str]) {
    for number in numbers {
        server
            .create_student(
                &tenant.admin,
                NewStudent {
                    reference_number: number.to_string(),
                },
            )
            .await
            .expect("student is created");
    }
}
