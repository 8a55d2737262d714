//! bcrypt password hashing off the async executor.

use crate::auth::AuthError;
use log::warn;

/// Hash a password with bcrypt at `cost`.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Crypto(format!("hashing task failed: {e}")))?
        .map_err(|e| AuthError::Crypto(format!("bcrypt hash: {e}")))
}

/// Check a password against a stored bcrypt hash.
///
/// A stored value that is not a bcrypt hash never verifies.
pub async fn verify_password(password: String, stored_hash: String) -> Result<bool, AuthError> {
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &stored_hash))
        .await
        .map_err(|e| AuthError::Crypto(format!("verification task failed: {e}")))?;

    match outcome {
        Ok(matches) => Ok(matches),
        Err(e) => {
            warn!("Stored password hash could not be read: {}", e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("p".to_string(), 4).await.unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("p".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("q".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_does_not_verify() {
        assert!(
            !verify_password("p".to_string(), "plaintext".to_string())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_invalid_cost_is_a_crypto_error() {
        let result = hash_password("p".to_string(), 99).await;
        assert!(matches!(result, Err(AuthError::Crypto(_))));
    }
}
