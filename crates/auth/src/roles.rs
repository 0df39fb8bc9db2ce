use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::capability::Capability;

/// Role name as it appears in a token claim.
///
/// Identity-provider deployments disagree on spelling (`ROLE_ADMIN`, `ADMIN`,
/// `admin`); [`Role::grants`] treats them as the same capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Role name with any `ROLE_` prefix removed.
    pub fn base_name(&self) -> &str {
        let name = self.as_str();
        match name.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("ROLE_") => &name[5..],
            _ => name,
        }
    }

    pub fn grants(&self, capability: Capability) -> bool {
        self.base_name().eq_ignore_ascii_case(capability.as_str())
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
