//! Admin authentication.
//!
//! Admins sign in with a username and password and receive an HS256 bearer
//! token carrying their admin id and department id. Protected operations
//! take an [`AdminIdentity`], which can only be obtained by verifying such a
//! token, so an unauthenticated call to a protected operation does not
//! type-check.
//!
//! # Example Usage
//!
//! ```rust
//! use yearbook_server::auth::TokenService;
//! use yearbook_server::tenant::ObjectId;
//! use chrono::Utc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tokens = TokenService::new("secret", 5_184_000);
//! let now = Utc::now();
//! let token = tokens.issue(ObjectId::new(), ObjectId::new(), now)?;
//! let identity = tokens.authenticate(&token, now)?;
//! assert_eq!(identity.token_fingerprint().len(), 64);
//!
//! let context = identity.into_context("request-1");
//! assert_eq!(context.request().department_id(), Some(context.department_id()));
//! # Ok(())
//! # }
//! ```

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

use crate::tenant::{ObjectId, RequestContext, TenantContext};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Response `tokenType` for issued tokens.
pub const TOKEN_TYPE: &str = "x-access-token";

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account not activated")]
    AccountInactive,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

/// Proof that a bearer token was verified.
///
/// Only [`TokenService::authenticate`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    tenant: TenantContext,
    token_fingerprint: String,
    authenticated_at: DateTime<Utc>,
}

impl AdminIdentity {
    pub(crate) fn new(tenant: TenantContext, token: &str, authenticated_at: DateTime<Utc>) -> Self {
        Self {
            tenant,
            token_fingerprint: token_fingerprint(token),
            authenticated_at,
        }
    }

    pub fn admin_id(&self) -> ObjectId {
        self.tenant.admin_id
    }

    pub fn department_id(&self) -> ObjectId {
        self.tenant.department_id
    }

    pub fn tenant_context(&self) -> TenantContext {
        self.tenant
    }

    /// SHA-256 of the token, safe to log.
    pub fn token_fingerprint(&self) -> &str {
        &self.token_fingerprint
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }

    /// Bind this identity to one request.
    pub fn into_context(self, request_id: impl Into<String>) -> AuthenticatedContext {
        AuthenticatedContext::from_identity(self, request_id)
    }
}

/// Request context that can only exist for a verified admin.
///
/// Every protected server operation takes one of these.
#[derive(Debug, Clone)]
pub struct AuthenticatedContext {
    identity: AdminIdentity,
    request: RequestContext,
}

impl AuthenticatedContext {
    pub fn from_identity(identity: AdminIdentity, request_id: impl Into<String>) -> Self {
        let request = RequestContext::with_tenant(request_id, identity.tenant);
        Self { identity, request }
    }

    pub fn identity(&self) -> &AdminIdentity {
        &self.identity
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn request_id(&self) -> &str {
        &self.request.request_id
    }

    pub fn admin_id(&self) -> ObjectId {
        self.identity.admin_id()
    }

    pub fn department_id(&self) -> ObjectId {
        self.identity.department_id()
    }
}

/// Hex SHA-256 of a token.
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Strip an optional `Bearer ` prefix from a header value.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .unwrap_or(header)
        .trim();
    if token.is_empty() {
        Err(AuthError::MissingToken)
    } else {
        Ok(token)
    }
}
