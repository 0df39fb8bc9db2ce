use thiserror::Error;

use crate::{Capability, CapabilitySet};

/// The one message shown whenever an action is refused locally.
pub const PERMISSION_DENIED_MESSAGE: &str = "Insufficient permission to perform this action";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("{}", PERMISSION_DENIED_MESSAGE)]
    PermissionDenied { required: Vec<Capability> },
}

/// Check that the caller holds `required`.
///
/// - No IO
/// - No panics
pub fn authorize(capabilities: &CapabilitySet, required: Capability) -> Result<(), AuthzError> {
    authorize_any(capabilities, &[required])
}

/// Check that the caller holds at least one of `accepted`.
pub fn authorize_any(
    capabilities: &CapabilitySet,
    accepted: &[Capability],
) -> Result<(), AuthzError> {
    if accepted.iter().any(|c| capabilities.contains(*c)) {
        Ok(())
    } else {
        Err(AuthzError::PermissionDenied {
            required: accepted.to_vec(),
        })
    }
}
