//! Identity-provider boundary: where access tokens come from.
//!
//! The client never performs an interactive login itself. It is handed tokens
//! through configuration, renews them when it can, and flags the session as
//! needing a fresh login when it cannot.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;

use stockroom_auth::{decode_claims, validate_claims, TokenClaims};

use crate::config::AuthConfig;
use crate::error::{ClientError, ClientResult};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current bearer token, if the session has one.
    async fn access_token(&self) -> Option<String>;

    /// Renew the token if it expires within `min_validity`.
    ///
    /// Returns `Ok(true)` when a new token was obtained, `Ok(false)` when the
    /// current one is still good, and `Err(AuthExpired)` when renewal failed.
    async fn refresh(&self, min_validity: Duration) -> ClientResult<bool>;

    /// Drop the current tokens and ask for a new login.
    async fn login(&self);

    /// Whether a new login has been requested and not yet satisfied.
    async fn login_required(&self) -> bool;

    /// Claims of the current token.
    ///
    /// Tokens that fail to decode, have expired or are not yet valid carry no roles.
    async fn claims(&self) -> Option<TokenClaims> {
        let token = self.access_token().await?;
        let claims = decode_claims(&token)
            .and_then(|claims| validate_claims(&claims, Utc::now()).map(|()| claims));
        match claims {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::warn!("ignoring access token: {e}");
                None
            }
        }
    }
}

/// Build the provider for `auth`.
pub fn provider_for(auth: &AuthConfig, client_id: &str) -> Box<dyn IdentityProvider> {
    match auth {
        AuthConfig::Disabled | AuthConfig::Anonymous => Box::new(StaticToken::anonymous()),
        AuthConfig::Static { access_token } => Box::new(StaticToken::new(access_token.clone())),
        AuthConfig::Oidc {
            access_token,
            refresh_token,
            token_url,
        } => Box::new(OidcRefresh::new(
            token_url.clone(),
            client_id.to_string(),
            access_token.clone(),
            refresh_token.clone(),
        )),
    }
}

fn expires_within(token: &str, min_validity: Duration) -> bool {
    let Ok(claims) = decode_claims(token) else {
        return false;
    };
    match chrono::Duration::from_std(min_validity) {
        Ok(min_validity) => claims.expires_within(Utc::now(), min_validity),
        Err(_) => claims.exp.is_some(),
    }
}

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<String>,
    login_required: bool,
}

/// A token handed in from outside. It cannot be renewed.
#[derive(Debug)]
pub struct StaticToken {
    state: RwLock<SessionState>,
}

impl StaticToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(SessionState {
                access_token: Some(access_token.into()),
                login_required: false,
            }),
        }
    }

    /// A session without any token (read-only access).
    pub fn anonymous() -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticToken {
    async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    async fn refresh(&self, min_validity: Duration) -> ClientResult<bool> {
        let state = self.state.read().await;
        match &state.access_token {
            Some(token) if expires_within(token, min_validity) => Err(ClientError::AuthExpired),
            Some(_) => Ok(false),
            None if state.login_required => Err(ClientError::AuthExpired),
            None => Ok(false),
        }
    }

    async fn login(&self) {
        let mut state = self.state.write().await;
        if state.access_token.is_some() {
            tracing::warn!("access token expired; supply a new one to sign in again");
            state.access_token = None;
            state.login_required = true;
        }
    }

    async fn login_required(&self) -> bool {
        self.state.read().await.login_required
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Default)]
struct OidcState {
    access_token: Option<String>,
    refresh_token: Option<String>,
    login_required: bool,
}

/// Renews tokens with the OAuth2 refresh-token grant.
pub struct OidcRefresh {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    state: RwLock<OidcState>,
}

impl OidcRefresh {
    pub fn new(
        token_url: String,
        client_id: String,
        access_token: String,
        refresh_token: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url,
            client_id,
            state: RwLock::new(OidcState {
                access_token: Some(access_token),
                refresh_token: Some(refresh_token),
                login_required: false,
            }),
        }
    }

    async fn exchange(&self, refresh_token: &str) -> Result<TokenResponse, String> {
        let resp = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !resp.status().is_success() {
            return Err(format!("token endpoint returned {}", resp.status()));
        }
        resp.json::<TokenResponse>().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl IdentityProvider for OidcRefresh {
    async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    async fn refresh(&self, min_validity: Duration) -> ClientResult<bool> {
        let refresh_token = {
            let state = self.state.read().await;
            match (&state.access_token, &state.refresh_token) {
                (Some(access), _) if !expires_within(access, min_validity) => return Ok(false),
                (_, Some(refresh)) => refresh.clone(),
                (_, None) => return Err(ClientError::AuthExpired),
            }
        };

        match self.exchange(&refresh_token).await {
            Ok(tokens) => {
                let mut state = self.state.write().await;
                state.access_token = Some(tokens.access_token);
                if let Some(refresh) = tokens.refresh_token {
                    state.refresh_token = Some(refresh);
                }
                state.login_required = false;
                tracing::info!("access token refreshed");
                Ok(true)
            }
            Err(e) => {
                tracing::error!("failed to refresh access token: {e}");
                Err(ClientError::AuthExpired)
            }
        }
    }

    async fn login(&self) {
        let mut state = self.state.write().await;
        state.access_token = None;
        state.refresh_token = None;
        state.login_required = true;
        tracing::warn!("session expired; a new login is required");
    }

    async fn login_required(&self) -> bool {
        self.state.read().await.login_required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    fn mint(claims: serde_json::Value) -> String {
        jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test"))
            .expect("failed to encode jwt")
    }

    #[tokio::test]
    async fn static_token_refresh_fails_once_expired() {
        let expired = mint(json!({ "exp": 1000, "roles": ["ROLE_ADMIN"] }));
        let provider = StaticToken::new(expired);
        assert_eq!(
            provider.refresh(Duration::from_secs(30)).await,
            Err(ClientError::AuthExpired)
        );

        provider.login().await;
        assert!(provider.login_required().await);
        assert!(provider.access_token().await.is_none());
    }

    #[tokio::test]
    async fn huge_min_validity_counts_as_expiring() {
        let provider = StaticToken::new(mint(json!({ "exp": 2_000_000_000_i64 })));
        assert_eq!(
            provider.refresh(Duration::from_secs(10_000_000_000_000)).await,
            Err(ClientError::AuthExpired)
        );
        assert_eq!(
            provider.refresh(Duration::from_secs(u64::MAX)).await,
            Err(ClientError::AuthExpired)
        );

        let open_ended = StaticToken::new(mint(json!({ "roles": ["admin"] })));
        assert_eq!(open_ended.refresh(Duration::from_secs(u64::MAX)).await, Ok(false));
    }

    #[tokio::test]
    async fn roles_of_expired_or_future_tokens_are_ignored() {
        let now = Utc::now().timestamp();
        let expired = StaticToken::new(mint(json!({ "exp": now - 60, "roles": ["admin"] })));
        assert!(expired.claims().await.is_none());

        let future = StaticToken::new(mint(json!({
            "iat": now + 3_600,
            "exp": now + 7_200,
            "roles": ["admin"]
        })));
        assert!(future.claims().await.is_none());

        let current = StaticToken::new(mint(json!({
            "iat": now - 10,
            "exp": now + 600,
            "roles": ["admin"]
        })));
        assert_eq!(current.claims().await.map(|c| c.roles.len()), Some(1));
    }

    #[tokio::test]
    async fn static_token_without_expiry_is_kept() {
        let provider = StaticToken::new(mint(json!({ "roles": ["ROLE_EMPLOYEE"] })));
        assert_eq!(provider.refresh(Duration::from_secs(30)).await, Ok(false));
        let claims = provider.claims().await.unwrap();
        assert_eq!(claims.roles.len(), 1);
    }

    #[tokio::test]
    async fn anonymous_session_has_no_claims() {
        let provider = StaticToken::anonymous();
        assert!(provider.claims().await.is_none());
        assert_eq!(provider.refresh(Duration::from_secs(30)).await, Ok(false));
        provider.login().await;
        assert!(!provider.login_required().await);
    }

    #[tokio::test]
    async fn oidc_refresh_failure_reports_auth_expired() {
        let expired = mint(json!({ "exp": 1000 }));
        let provider = OidcRefresh::new(
            "http://127.0.0.1:9/token".to_string(),
            "inventory-app".to_string(),
            expired,
            "refresh".to_string(),
        );
        assert_eq!(
            provider.refresh(Duration::from_secs(30)).await,
            Err(ClientError::AuthExpired)
        );
    }
}
