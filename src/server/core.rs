//! Core yearbook server structure and initialization.

use crate::auth::{AuthenticatedContext, TokenService};
use crate::clock::{Clock, SharedClock, SystemClock};
use crate::config::YearbookConfig;
use crate::error::{YearbookError, YearbookResult};
use crate::models::Department;
use crate::repository::{
    AdminRepository, AlbumRepository, DepartmentRepository, EventRepository, ImageRepository,
    ReportRepository, StudentRepository,
};
use crate::statistics::StatisticsAggregator;
use crate::storage::StorageProvider;
use crate::tenant::{ResolvedTenant, TenantKeyResolver};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Multi-tenant yearbook server.
///
/// Owns the repositories, the tenant resolver and the token service, and
/// exposes every yearbook operation as an async method returning
/// [`YearbookResult`]. Operations that need an authenticated admin take an
/// [`AuthenticatedContext`]; public ones take a
/// [`RequestContext`](crate::tenant::RequestContext).
///
/// # Examples
///
/// ```rust
/// use yearbook_server::{YearbookConfig, YearbookServer};
/// use yearbook_server::models::SignupRequest;
/// use yearbook_server::storage::InMemoryStorage;
/// use yearbook_server::tenant::RequestContext;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = YearbookConfig::new("secret").with_bcrypt_cost(4);
/// let server = YearbookServer::new(InMemoryStorage::new(), config)?;
///
/// let outcome = server
///     .signup(
///         SignupRequest {
///             username: "a".into(),
///             password: "p".into(),
///             department_name: "CS Dept".into(),
///             department_code: "CS".into(),
///         },
///         &RequestContext::default(),
///     )
///     .await?;
/// assert_eq!(outcome.department.slug, "cs-dept");
/// # Ok(())
/// # }
/// ```
pub struct YearbookServer<S> {
    pub(super) config: YearbookConfig,
    pub(super) clock: SharedClock,
    pub(super) storage: Arc<S>,
    pub(super) resolver: TenantKeyResolver<S>,
    pub(super) tokens: TokenService,
    pub(super) departments: DepartmentRepository<S>,
    pub(super) admins: AdminRepository<S>,
    pub(super) students: StudentRepository<S>,
    pub(super) albums: AlbumRepository<S>,
    pub(super) images: ImageRepository<S>,
    pub(super) events: EventRepository<S>,
    pub(super) reports: ReportRepository<S>,
    pub(super) statistics: StatisticsAggregator<S>,
    /// Serializes check-then-insert sections within this process.
    pub(super) write_guard: Arc<Mutex<()>>,
}

impl<S: StorageProvider> YearbookServer<S> {
    /// Create a server on the wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`YearbookError::Internal`] if the configuration is invalid.
    pub fn new(storage: S, config: YearbookConfig) -> YearbookResult<Self> {
        Self::with_clock(Arc::new(storage), config, Arc::new(SystemClock))
    }

    /// Create a server over shared storage with an explicit clock.
    pub fn with_clock(
        storage: Arc<S>,
        config: YearbookConfig,
        clock: Arc<dyn Clock>,
    ) -> YearbookResult<Self> {
        config.validate()?;

        Ok(Self {
            tokens: TokenService::new(&config.jwt_secret, config.token_lifetime_secs),
            resolver: TenantKeyResolver::new(Arc::clone(&storage)),
            departments: DepartmentRepository::new(Arc::clone(&storage)),
            admins: AdminRepository::new(Arc::clone(&storage)),
            students: StudentRepository::new(Arc::clone(&storage)),
            albums: AlbumRepository::new(Arc::clone(&storage)),
            images: ImageRepository::new(Arc::clone(&storage)),
            events: EventRepository::new(Arc::clone(&storage)),
            reports: ReportRepository::new(Arc::clone(&storage)),
            statistics: StatisticsAggregator::new(Arc::clone(&storage)),
            write_guard: Arc::new(Mutex::new(())),
            storage,
            config,
            clock,
        })
    }

    pub fn config(&self) -> &YearbookConfig {
        &self.config
    }

    /// The underlying storage.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// The tenant key resolver.
    pub fn resolver(&self) -> &TenantKeyResolver<S> {
        &self.resolver
    }

    pub(super) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(super) fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The caller's department, which must still exist.
    pub(super) async fn caller_department(
        &self,
        ctx: &AuthenticatedContext,
    ) -> YearbookResult<Department> {
        self.departments
            .find_by_id(ctx.department_id())
            .await?
            .ok_or_else(|| YearbookError::not_found("Department", ctx.department_id().to_hex()))
    }

    /// The caller's department as a resolved tenant.
    pub(super) async fn caller_tenant(
        &self,
        ctx: &AuthenticatedContext,
    ) -> YearbookResult<ResolvedTenant> {
        Ok(ResolvedTenant::of(&self.caller_department(ctx).await?))
    }

    /// Department by slug, or not found.
    pub(super) async fn department_by_slug(&self, slug: &str) -> YearbookResult<Department> {
        self.departments
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| YearbookError::not_found("Department", slug))
    }
}
