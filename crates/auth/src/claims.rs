use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// Access-token claims this client cares about.
///
/// Both role conventions are modelled: a top-level `roles` array, and
/// OpenID-Connect style `realm_access` / `resource_access` role lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default)]
    pub preferred_username: Option<String>,

    /// Expiration, seconds since the epoch.
    #[serde(default)]
    pub exp: Option<i64>,

    /// Issued-at, seconds since the epoch.
    #[serde(default)]
    pub iat: Option<i64>,

    #[serde(default)]
    pub roles: Vec<Role>,

    #[serde(default)]
    pub realm_access: Option<RoleList>,

    #[serde(default)]
    pub resource_access: HashMap<String, RoleList>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleList {
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|s| DateTime::from_timestamp(s, 0))
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|s| DateTime::from_timestamp(s, 0))
    }

    /// True when the token will have expired `min_validity` from `now`.
    /// Tokens without `exp` never expire. A horizon past the representable
    /// range counts as expiring.
    pub fn expires_within(&self, now: DateTime<Utc>, min_validity: Duration) -> bool {
        self.expires_at().is_some_and(|exp| {
            now.checked_add_signed(min_validity)
                .is_none_or(|horizon| exp <= horizon)
        })
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.preferred_username
            .as_deref()
            .or(self.sub.as_deref())
            .unwrap_or("User")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Read the claims out of a compact JWT.
///
/// The signature is NOT verified; the API verifies every token it receives.
/// The client only uses claims to decide what to offer the user.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_header), Some(payload), Some(_signature), None) => payload,
        _ => return Err(TokenError::Malformed("expected three dot-separated segments".into())),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Malformed(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("payload is not a claims object: {e}")))
}

/// Deterministically validate the token's time window.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if let (Some(iat), Some(exp)) = (claims.issued_at(), claims.expires_at()) {
        if exp <= iat {
            return Err(TokenError::InvalidTimeWindow);
        }
    }
    if claims.issued_at().is_some_and(|iat| now < iat) {
        return Err(TokenError::NotYetValid);
    }
    if claims.expires_at().is_some_and(|exp| now >= exp) {
        return Err(TokenError::Expired);
    }
    Ok(())
}
