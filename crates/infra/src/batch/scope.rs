use nippo_core::{Member, TenantId};

/// Tenant scope for a batch run.
///
/// - `Any`: process members of every tenant (shared scheduled run).
/// - `Tenant`: only process members of the specified tenant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TenantScope {
    #[default]
    Any,
    Tenant(TenantId),
}

impl TenantScope {
    pub fn allows(&self, tenant_id: TenantId) -> bool {
        match self {
            TenantScope::Any => true,
            TenantScope::Tenant(t) => *t == tenant_id,
        }
    }

    pub fn admits(&self, member: &Member) -> bool {
        self.allows(member.tenant_id)
    }
}
