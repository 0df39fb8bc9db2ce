use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{RoleConvention, TokenClaims};

/// A named permission granted through token roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Admin,
    Employee,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Admin => "admin",
            Capability::Employee => "employee",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Capability::Admin),
            "employee" => Ok(Capability::Employee),
            other => Err(format!("unknown capability '{other}'")),
        }
    }
}

/// Does the token grant `capability` under `convention`?
pub fn has_capability(
    claims: &TokenClaims,
    convention: &dyn RoleConvention,
    capability: Capability,
) -> bool {
    convention
        .roles(claims)
        .into_iter()
        .any(|role| role.grants(capability))
}

/// Capabilities of the signed-in user, resolved once per token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub admin: bool,
    pub employee: bool,
}

impl CapabilitySet {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_claims(claims: &TokenClaims, convention: &dyn RoleConvention) -> Self {
        let set = Self {
            admin: has_capability(claims, convention, Capability::Admin),
            employee: has_capability(claims, convention, Capability::Employee),
        };
        tracing::debug!(
            user = claims.display_name(),
            admin = set.admin,
            employee = set.employee,
            "resolved capabilities"
        );
        set
    }

    pub fn contains(&self, capability: Capability) -> bool {
        match capability {
            Capability::Admin => self.admin,
            Capability::Employee => self.employee,
        }
    }
}

/// Which parts of the product screen the user gets to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPermissions {
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_move_stock: bool,
    /// The stock summary panel is an employee view; admins get the actions instead.
    pub show_summary: bool,
}

impl From<CapabilitySet> for ViewPermissions {
    fn from(caps: CapabilitySet) -> Self {
        Self {
            can_create: caps.admin,
            can_edit: caps.admin,
            can_delete: caps.admin,
            can_move_stock: caps.admin || caps.employee,
            show_summary: caps.employee && !caps.admin,
        }
    }
}
