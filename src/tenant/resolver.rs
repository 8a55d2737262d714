//! Tenant key resolution.
//!
//! Given a caller-supplied tenant identifier, the resolver decides which
//! Department it names and then queries a collection with each known tenant
//! encoding in a fixed order, returning the first non-empty result.
//!
//! # Resolution Order
//!
//! 1. `workspace` as text, using the key as supplied
//! 2. `departmentId` as a typed reference, only when the key parses as an
//!    [`ObjectId`]
//! 3. `departmentId` as text
//! 4. `workspace` holding the Department's slug, when a Department was found
//! 5. `workspaceName` (collections with the legacy attribute only), trying the
//!    key, then the Department's slug and name
//!
//! Slug-keyed entry points first look the slug up and continue with the
//! Department's own id as the key. Bulk uploads once stored the route slug in
//! `workspace`, which step 4 still finds. Absence is never an error: a tenant
//! with no records of a kind gets an empty result.
//!
//! # Example Usage
//!
//! ```rust
//! use yearbook_server::models::Student;
//! use yearbook_server::storage::{Filter, InMemoryStorage};
//! use yearbook_server::tenant::{TenantIdentifier, TenantKeyResolver};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = TenantKeyResolver::new(Arc::new(InMemoryStorage::new()));
//! let tenant = resolver.resolve(&TenantIdentifier::slug("cs-dept")).await?;
//! let students: Vec<Student> = resolver.find_scoped(&tenant, Filter::new()).await?;
//! assert!(students.is_empty());
//! # Ok(())
//! # }
//! ```

use crate::error::{YearbookError, YearbookResult};
use crate::models::{Department, Document, TenantScoped, decode_documents};
use crate::storage::{Filter, StorageKey, StorageProvider};
use crate::tenant::key::TenantPredicate;
use crate::tenant::object_id::ObjectId;
use log::{debug, trace, warn};
use std::fmt;
use std::sync::Arc;

/// Tenant identifier as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantIdentifier {
    /// Department slug, looked up before querying.
    Slug(String),
    /// Department id or an already-resolved tenant string.
    Key(String),
}

impl TenantIdentifier {
    /// Identifier for a slug-keyed entry point.
    pub fn slug(slug: impl Into<String>) -> Self {
        Self::Slug(slug.into())
    }

    /// Identifier for an id or raw tenant string.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Identifier naming a known department id.
    pub fn department(id: ObjectId) -> Self {
        Self::Key(id.to_hex())
    }

    /// Identifier for a route segment that may hold either an id or a slug.
    ///
    /// Text shaped like an id is treated as a key, anything else as a slug.
    pub fn infer(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if ObjectId::is_valid(&raw) {
            Self::Key(raw)
        } else {
            Self::Slug(raw)
        }
    }

    /// The raw identifier text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Slug(text) | Self::Key(text) => text,
        }
    }
}

impl fmt::Display for TenantIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slug(slug) => write!(f, "slug:{}", slug),
            Self::Key(key) => write!(f, "key:{}", key),
        }
    }
}

/// A tenant identifier after department lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTenant {
    key: String,
    department: Option<Department>,
}

impl ResolvedTenant {
    /// Tenant for a known department; the key is the department id.
    pub fn of(department: &Department) -> Self {
        Self {
            key: department.id.to_hex(),
            department: Some(department.clone()),
        }
    }

    /// Tenant whose department could not be found; the raw key is used as is.
    pub fn unresolved(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            department: None,
        }
    }

    /// Key compared against the stored tenant attributes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The department, when one was found.
    pub fn department(&self) -> Option<&Department> {
        self.department.as_ref()
    }

    /// The department id, when one was found.
    pub fn department_id(&self) -> Option<ObjectId> {
        self.department.as_ref().map(|department| department.id)
    }

    /// Consume into the department.
    pub fn into_department(self) -> Option<Department> {
        self.department
    }
}

/// Ordered predicates to try for a resolved tenant.
///
/// `legacy_names` appends the `workspaceName` steps for collections that
/// carry that attribute.
pub fn resolution_plan(resolved: &ResolvedTenant, legacy_names: bool) -> Vec<TenantPredicate> {
    let key = resolved.key();
    let mut plan = vec![TenantPredicate::WorkspaceText(key.to_string())];

    if let Ok(oid) = ObjectId::parse_str(key) {
        plan.push(TenantPredicate::DepartmentReference(oid));
    }
    plan.push(TenantPredicate::DepartmentText(key.to_string()));

    if let Some(department) = resolved.department() {
        if !department.slug.is_empty() && department.slug != key {
            plan.push(TenantPredicate::WorkspaceText(department.slug.clone()));
        }
    }

    if legacy_names {
        let mut names = vec![key.to_string()];
        if let Some(department) = resolved.department() {
            names.push(department.slug.clone());
            names.push(department.name.clone());
        }

        let mut seen = Vec::with_capacity(names.len());
        for name in names {
            if !name.is_empty() && !seen.contains(&name) {
                seen.push(name.clone());
                plan.push(TenantPredicate::LegacyWorkspaceName(name));
            }
        }
    }

    plan
}

/// Resolves tenant identifiers and runs tenant-scoped queries.
pub struct TenantKeyResolver<S> {
    storage: Arc<S>,
}

impl<S> Clone for TenantKeyResolver<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: StorageProvider> TenantKeyResolver<S> {
    /// Create a resolver over shared storage.
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Look up the department an identifier names.
    ///
    /// A slug that matches no department, or a key that is not a known
    /// department id, resolves to itself with no department attached.
    pub async fn resolve(&self, identifier: &TenantIdentifier) -> YearbookResult<ResolvedTenant> {
        let department = match identifier {
            TenantIdentifier::Slug(slug) => self.department_by_slug(slug).await?,
            TenantIdentifier::Key(key) => match ObjectId::parse_str(key) {
                Ok(oid) => self.department_by_id(oid).await?,
                Err(_) => None,
            },
        };

        let resolved = match department {
            Some(department) => ResolvedTenant::of(&department),
            None => ResolvedTenant::unresolved(identifier.as_str()),
        };

        debug!(
            "Resolved tenant {} to key '{}' (department found: {})",
            identifier,
            resolved.key(),
            resolved.department().is_some()
        );
        Ok(resolved)
    }

    /// The department an identifier names, if any.
    pub async fn department_for(
        &self,
        identifier: &TenantIdentifier,
    ) -> YearbookResult<Option<Department>> {
        Ok(self.resolve(identifier).await?.into_department())
    }

    /// Every record of `D` in the tenant that also matches `extra`.
    ///
    /// Returns the result of the first plan step that finds anything.
    pub async fn find_scoped<D>(
        &self,
        resolved: &ResolvedTenant,
        extra: Filter,
    ) -> YearbookResult<Vec<D>>
    where
        D: Document + TenantScoped,
    {
        for predicate in resolution_plan(resolved, D::LEGACY_TENANT_NAME) {
            let filter = predicate.filter().and(extra.clone());
            let found = self
                .storage
                .find(StorageKey::collection(D::COLLECTION), &filter)
                .await
                .map_err(YearbookError::storage)?;

            if !found.is_empty() {
                trace!(
                    "Tenant '{}' matched {} {} record(s) on {}",
                    resolved.key(),
                    found.len(),
                    D::COLLECTION,
                    predicate
                );
                return decode_documents(found);
            }
        }

        trace!(
            "Tenant '{}' has no {} records matching {:?}",
            resolved.key(),
            D::COLLECTION,
            extra
        );
        Ok(Vec::new())
    }

    /// The single record of `D` in the tenant matching `extra`.
    pub async fn find_one_scoped<D>(
        &self,
        resolved: &ResolvedTenant,
        extra: Filter,
    ) -> YearbookResult<Option<D>>
    where
        D: Document + TenantScoped,
    {
        let mut found: Vec<D> = self.find_scoped(resolved, extra).await?;
        if found.len() > 1 {
            warn!(
                "Tenant '{}' has {} {} records where one was expected, using the first",
                resolved.key(),
                found.len(),
                D::COLLECTION
            );
        }
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }

    /// Count records of `D` in the tenant matching `extra`, stopping at the
    /// first plan step with a non-zero count.
    pub async fn count_scoped<D>(&self, resolved: &ResolvedTenant, extra: Filter) -> YearbookResult<usize>
    where
        D: Document + TenantScoped,
    {
        for predicate in resolution_plan(resolved, D::LEGACY_TENANT_NAME) {
            let filter = predicate.filter().and(extra.clone());
            let count = self
                .storage
                .count(StorageKey::collection(D::COLLECTION), &filter)
                .await
                .map_err(YearbookError::storage)?;

            if count > 0 {
                return Ok(count);
            }
        }
        Ok(0)
    }

    async fn department_by_slug(&self, slug: &str) -> YearbookResult<Option<Department>> {
        let found = self
            .storage
            .find(
                StorageKey::collection(Department::COLLECTION),
                &Filter::new().eq("slug", slug),
            )
            .await
            .map_err(YearbookError::storage)?;

        Ok(decode_documents::<Department>(found)?.into_iter().next())
    }

    async fn department_by_id(&self, id: ObjectId) -> YearbookResult<Option<Department>> {
        let stored = self
            .storage
            .get(StorageKey::new(Department::COLLECTION, id.to_hex()))
            .await
            .map_err(YearbookError::storage)?;

        stored
            .map(serde_json::from_value::<Department>)
            .transpose()
            .map_err(YearbookError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn department(name: &str, slug: &str) -> Department {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Department {
            id: ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap(),
            name: name.to_string(),
            code: "CS".to_string(),
            slug: slug.to_string(),
            admin_id: String::new(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_plan_order_for_object_id_key() {
        let dept = department("CS Dept", "cs-dept");
        let plan = resolution_plan(&ResolvedTenant::of(&dept), false);
        assert_eq!(
            plan,
            vec![
                TenantPredicate::WorkspaceText(dept.id.to_hex()),
                TenantPredicate::DepartmentReference(dept.id),
                TenantPredicate::DepartmentText(dept.id.to_hex()),
                TenantPredicate::WorkspaceText("cs-dept".into()),
            ]
        );
    }

    #[test]
    fn test_plan_skips_reference_step_for_text_key() {
        let plan = resolution_plan(&ResolvedTenant::unresolved("cs-dept"), false);
        assert_eq!(
            plan,
            vec![
                TenantPredicate::WorkspaceText("cs-dept".into()),
                TenantPredicate::DepartmentText("cs-dept".into()),
            ]
        );
    }

    #[test]
    fn test_plan_legacy_names_are_last_and_deduplicated() {
        let dept = department("cs-dept", "cs-dept");
        let plan = resolution_plan(&ResolvedTenant::of(&dept), true);
        assert_eq!(plan.len(), 6);
        assert_eq!(plan[3], TenantPredicate::WorkspaceText("cs-dept".into()));
        assert_eq!(
            plan[4],
            TenantPredicate::LegacyWorkspaceName(dept.id.to_hex())
        );
        assert_eq!(plan[5], TenantPredicate::LegacyWorkspaceName("cs-dept".into()));

        let unresolved = resolution_plan(&ResolvedTenant::unresolved("Physics"), true);
        assert_eq!(
            unresolved.last(),
            Some(&TenantPredicate::LegacyWorkspaceName("Physics".into()))
        );
    }

    #[test]
    fn test_identifier_display() {
        assert_eq!(TenantIdentifier::slug("cs").to_string(), "slug:cs");
        assert_eq!(TenantIdentifier::key("abc").as_str(), "abc");
    }

    #[test]
    fn test_infer_identifier() {
        assert_eq!(
            TenantIdentifier::infer("64b7f0c2a1b2c3d4e5f60718"),
            TenantIdentifier::key("64b7f0c2a1b2c3d4e5f60718")
        );
        assert_eq!(TenantIdentifier::infer("cs-dept"), TenantIdentifier::slug("cs-dept"));
    }
}
