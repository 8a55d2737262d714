//! HS256 bearer tokens.
//!
//! Expiry is checked against the caller-supplied instant rather than the
//! wall clock, so tokens follow the server's [`crate::clock::Clock`].

use crate::auth::{AdminIdentity, AuthError};
use crate::tenant::{ObjectId, TenantContext};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims embedded in every bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Admin id (hex).
    pub id: String,
    /// Department id (hex).
    pub department_id: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_secs: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, lifetime_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
        }
    }

    pub fn lifetime_secs(&self) -> u64 {
        self.lifetime_secs
    }

    /// Sign a token for an admin of a department, issued at `now`.
    pub fn issue(
        &self,
        admin_id: ObjectId,
        department_id: ObjectId,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            id: admin_id.to_hex(),
            department_id: department_id.to_hex(),
            iat,
            exp: iat.saturating_add(i64::try_from(self.lifetime_secs).unwrap_or(i64::MAX)),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
    }

    /// Verify signature and expiry at `now` and return the claims.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenInvalid(e.to_string()))?;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    /// Verify a token and produce the caller's identity.
    pub fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<AdminIdentity, AuthError> {
        let claims = self.decode(token, now)?;

        let admin_id = ObjectId::parse_str(&claims.id)
            .map_err(|e| AuthError::TokenInvalid(format!("id claim: {e}")))?;
        let department_id = ObjectId::parse_str(&claims.department_id)
            .map_err(|e| AuthError::TokenInvalid(format!("departmentId claim: {e}")))?;

        Ok(AdminIdentity::new(
            TenantContext::new(admin_id, department_id),
            token,
            now,
        ))
    }
}
