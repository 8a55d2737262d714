//! Server configuration.
//!
//! [`YearbookConfig`] carries everything the server needs that is not data:
//! the token signing secret and lifetime, the password hashing cost, paging
//! limits and whether internal error details are echoed to callers.

use crate::error::YearbookError;
use std::env;

/// Environment variable holding the HS256 signing secret.
pub const ENV_JWT_SECRET: &str = "YEARBOOK_JWT_SECRET";
/// Environment variable overriding the token lifetime in seconds.
pub const ENV_TOKEN_TTL_SECS: &str = "YEARBOOK_TOKEN_TTL_SECS";
/// Environment variable overriding the bcrypt cost.
pub const ENV_BCRYPT_COST: &str = "YEARBOOK_BCRYPT_COST";

/// Sixty days.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 5_184_000;

/// Configuration for a yearbook server instance.
#[derive(Debug, Clone)]
pub struct YearbookConfig {
    /// Secret used to sign and verify bearer tokens.
    pub jwt_secret: String,

    /// Bearer token lifetime in seconds.
    pub token_lifetime_secs: u64,

    /// bcrypt work factor for password hashes.
    pub bcrypt_cost: u32,

    /// Page size used when a list query does not name one.
    pub default_page_size: usize,

    /// Largest page size a list query may request.
    pub max_page_size: usize,

    /// Echo internal error messages to callers instead of a generic message.
    pub expose_internal_errors: bool,
}

impl Default for YearbookConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            default_page_size: 10,
            max_page_size: 100,
            expose_internal_errors: false,
        }
    }
}

impl YearbookConfig {
    /// Create a configuration with the given signing secret and defaults
    /// for everything else.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Self::default()
        }
    }

    /// Load configuration from the process environment.
    ///
    /// `YEARBOOK_JWT_SECRET` is required; the lifetime and cost variables are
    /// optional and must parse as unsigned integers when present.
    pub fn from_env() -> Result<Self, YearbookError> {
        let jwt_secret = env::var(ENV_JWT_SECRET)
            .map_err(|_| YearbookError::internal(format!("{} is not set", ENV_JWT_SECRET)))?;

        let mut config = Self::new(jwt_secret);

        if let Ok(raw) = env::var(ENV_TOKEN_TTL_SECS) {
            config.token_lifetime_secs = raw.parse().map_err(|_| {
                YearbookError::internal(format!("{} must be a number of seconds", ENV_TOKEN_TTL_SECS))
            })?;
        }

        if let Ok(raw) = env::var(ENV_BCRYPT_COST) {
            config.bcrypt_cost = raw.parse().map_err(|_| {
                YearbookError::internal(format!("{} must be an integer", ENV_BCRYPT_COST))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the token lifetime.
    pub fn with_token_lifetime_secs(mut self, secs: u64) -> Self {
        self.token_lifetime_secs = secs;
        self
    }

    /// Set the bcrypt cost.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Set the default and maximum page sizes.
    pub fn with_page_sizes(mut self, default_page_size: usize, max_page_size: usize) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }

    /// Echo internal error messages to callers.
    pub fn with_exposed_internal_errors(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), YearbookError> {
        if self.jwt_secret.is_empty() {
            return Err(YearbookError::internal("JWT secret cannot be empty"));
        }

        if self.token_lifetime_secs == 0 {
            return Err(YearbookError::internal("Token lifetime must be positive"));
        }

        // bcrypt rejects costs outside 4..=31
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(YearbookError::internal("bcrypt cost must be between 4 and 31"));
        }

        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(YearbookError::internal(
                "Default page size must be between 1 and the maximum page size",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = YearbookConfig::new("secret");
        assert_eq!(config.token_lifetime_secs, 5_184_000);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 100);
        assert!(!config.expose_internal_errors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(YearbookConfig::default().validate().is_err());
        assert!(
            YearbookConfig::new("s")
                .with_token_lifetime_secs(0)
                .validate()
                .is_err()
        );
        assert!(YearbookConfig::new("s").with_bcrypt_cost(3).validate().is_err());
        assert!(YearbookConfig::new("s").with_bcrypt_cost(4).validate().is_ok());
        assert!(
            YearbookConfig::new("s")
                .with_page_sizes(50, 20)
                .validate()
                .is_err()
        );
    }
}
