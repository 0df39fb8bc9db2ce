//! `stockroom-auth`: pure role/capability boundary.
//!
//! This crate is intentionally decoupled from HTTP and from the identity
//! provider: it reads roles out of an already-issued access token and answers
//! "may this caller do X".

pub mod authorize;
pub mod capability;
pub mod claims;
pub mod convention;
pub mod roles;

pub use authorize::{authorize, authorize_any, AuthzError, PERMISSION_DENIED_MESSAGE};
pub use capability::{has_capability, Capability, CapabilitySet, ViewPermissions};
pub use claims::{decode_claims, validate_claims, RoleList, TokenClaims, TokenError};
pub use convention::{PlainRolesClaim, ResourceRoles, RoleConvention};
pub use roles::Role;
