//! Tenant/app scoping for engine operations
//!
//! Every engine call carries a [`Scope`] identifying the tenant (and
//! optionally the application) the operation runs under. The scope is an
//! explicit parameter rather than ambient state: the engine never hardcodes
//! a transport, so whatever carries tenancy at the edge (an HTTP header, a
//! job payload) is translated into a `Scope` by the caller.

use serde::{Deserialize, Serialize};

/// The `(tenant_id, app_id)` pair associated with an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Tenant identifier. Empty means unscoped (single-tenant deployments).
    pub tenant_id: String,
    /// Application identifier within the tenant.
    pub app_id: String,
}

impl Scope {
    /// Create a scope with both tenant and app set.
    pub fn new(tenant_id: impl Into<String>, app_id: impl Into<String>) -> Self {
        Scope {
            tenant_id: tenant_id.into(),
            app_id: app_id.into(),
        }
    }

    /// Create a tenant-only scope.
    pub fn tenant(tenant_id: impl Into<String>) -> Self {
        Scope {
            tenant_id: tenant_id.into(),
            app_id: String::new(),
        }
    }

    /// Whether neither tenant nor app is set.
    pub fn is_empty(&self) -> bool {
        self.tenant_id.is_empty() && self.app_id.is_empty()
    }
}
