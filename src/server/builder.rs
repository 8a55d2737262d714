//! Builder for configuring yearbook server instances.

use crate::clock::{Clock, SystemClock};
use crate::config::YearbookConfig;
use crate::error::YearbookResult;
use crate::server::YearbookServer;
use crate::storage::StorageProvider;
use std::sync::Arc;

/// Builder for configuring and creating [`YearbookServer`] instances.
///
/// # Examples
///
/// ```rust
/// use yearbook_server::YearbookServerBuilder;
/// use yearbook_server::clock::FixedClock;
/// use yearbook_server::storage::InMemoryStorage;
/// use chrono::Utc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let server = YearbookServerBuilder::new(InMemoryStorage::new())
///     .with_jwt_secret("secret")
///     .with_bcrypt_cost(4)
///     .with_clock(FixedClock(Utc::now()))
///     .build()?;
/// assert_eq!(server.config().token_lifetime_secs, 5_184_000);
/// # Ok(())
/// # }
/// ```
pub struct YearbookServerBuilder<S> {
    storage: Arc<S>,
    config: YearbookConfig,
    clock: Arc<dyn Clock>,
}

impl<S: StorageProvider> YearbookServerBuilder<S> {
    /// Start from default configuration on the wall clock.
    pub fn new(storage: S) -> Self {
        Self::from_shared(Arc::new(storage))
    }

    /// Start from storage that is shared with other components.
    pub fn from_shared(storage: Arc<S>) -> Self {
        Self {
            storage,
            config: YearbookConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: YearbookConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    pub fn with_token_lifetime_secs(mut self, secs: u64) -> Self {
        self.config.token_lifetime_secs = secs;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.config.bcrypt_cost = cost;
        self
    }

    pub fn with_page_sizes(mut self, default_page_size: usize, max_page_size: usize) -> Self {
        self.config = self.config.with_page_sizes(default_page_size, max_page_size);
        self
    }

    /// Echo internal error messages to callers.
    pub fn with_exposed_internal_errors(mut self, expose: bool) -> Self {
        self.config.expose_internal_errors = expose;
        self
    }

    /// Use a specific time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Validate the configuration and create the server.
    ///
    /// # Errors
    ///
    /// Returns a `YearbookError` if the configuration is invalid.
    pub fn build(self) -> YearbookResult<YearbookServer<S>> {
        YearbookServer::with_clock(self.storage, self.config, self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;

    #[test]
    fn test_build_requires_secret() {
        assert!(YearbookServerBuilder::new(InMemoryStorage::new()).build().is_err());
        assert!(
            YearbookServerBuilder::new(InMemoryStorage::new())
                .with_jwt_secret("s")
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_builder_settings_reach_config() {
        let server = YearbookServerBuilder::new(InMemoryStorage::new())
            .with_jwt_secret("s")
            .with_token_lifetime_secs(60)
            .with_bcrypt_cost(5)
            .with_page_sizes(5, 50)
            .with_exposed_internal_errors(true)
            .build()
            .unwrap();

        let config = server.config();
        assert_eq!(config.token_lifetime_secs, 60);
        assert_eq!(config.bcrypt_cost, 5);
        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.max_page_size, 50);
        assert!(config.expose_internal_errors);
    }
}
