//! Request and tenant context carried through server operations.

use crate::tenant::object_id::ObjectId;
use uuid::Uuid;

/// The authenticated caller: an admin acting for one department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    pub admin_id: ObjectId,
    pub department_id: ObjectId,
}

impl TenantContext {
    /// Create a tenant context.
    pub fn new(admin_id: ObjectId, department_id: ObjectId) -> Self {
        Self {
            admin_id,
            department_id,
        }
    }
}

/// Per-request context used for logging and tenant checks.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request
    pub request_id: String,
    /// Caller's tenant when the request is authenticated
    pub tenant_context: Option<TenantContext>,
}

impl RequestContext {
    /// Create an anonymous context with a specific request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            tenant_context: None,
        }
    }

    /// Create an anonymous context with a generated request id.
    pub fn with_generated_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Create an authenticated context.
    pub fn with_tenant(request_id: impl Into<String>, tenant_context: TenantContext) -> Self {
        Self {
            request_id: request_id.into(),
            tenant_context: Some(tenant_context),
        }
    }

    /// Create an authenticated context with a generated request id.
    pub fn with_tenant_generated_id(tenant_context: TenantContext) -> Self {
        Self::with_tenant(Uuid::new_v4().to_string(), tenant_context)
    }

    /// The caller's department id, if authenticated.
    pub fn department_id(&self) -> Option<ObjectId> {
        self.tenant_context.map(|tenant| tenant.department_id)
    }

    /// The caller's admin id, if authenticated.
    pub fn admin_id(&self) -> Option<ObjectId> {
        self.tenant_context.map(|tenant| tenant.admin_id)
    }

    /// Whether the request is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.tenant_context.is_some()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::with_generated_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts() {
        let anonymous = RequestContext::default();
        assert!(!anonymous.is_authenticated());
        assert_eq!(anonymous.request_id.len(), 36);

        let tenant = TenantContext::new(ObjectId::new(), ObjectId::new());
        let authed = RequestContext::with_tenant("req-1", tenant);
        assert_eq!(authed.request_id, "req-1");
        assert_eq!(authed.department_id(), Some(tenant.department_id));
        assert_eq!(authed.admin_id(), Some(tenant.admin_id));
    }
}
