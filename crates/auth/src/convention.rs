//! Where a deployment puts its role names.

use crate::{Role, TokenClaims};

/// Adapter that extracts role names from token claims.
///
/// Deployments differ: some issue a flat `roles` claim, others nest roles per
/// client under `resource_access`. Capability checks only ever go through this
/// trait, so both conventions answer the same question the same way.
pub trait RoleConvention: Send + Sync {
    fn roles<'c>(&self, claims: &'c TokenClaims) -> Vec<&'c Role>;
}

/// Roles in a top-level `roles` array claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlainRolesClaim;

impl RoleConvention for PlainRolesClaim {
    fn roles<'c>(&self, claims: &'c TokenClaims) -> Vec<&'c Role> {
        claims.roles.iter().collect()
    }
}

/// Roles granted to one client under `resource_access.<client_id>.roles`,
/// plus realm-wide roles under `realm_access.roles`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRoles {
    pub client_id: String,
}

impl ResourceRoles {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
        }
    }
}

impl RoleConvention for ResourceRoles {
    fn roles<'c>(&self, claims: &'c TokenClaims) -> Vec<&'c Role> {
        let resource = claims
            .resource_access
            .get(&self.client_id)
            .map(|list| list.roles.iter())
            .into_iter()
            .flatten();
        let realm = claims
            .realm_access
            .iter()
            .flat_map(|list| list.roles.iter());
        resource.chain(realm).collect()
    }
}
