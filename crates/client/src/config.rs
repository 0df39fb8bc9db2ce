//! Client configuration, read from the environment.

use std::time::Duration;

use thiserror::Error;

use stockroom_products::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_BASE_PATH: &str = "/api";
pub const DEFAULT_STOCK_PATH: &str = "/api/v2/stock";
pub const DEFAULT_CLIENT_ID: &str = "inventory-app";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_MIN_TOKEN_VALIDITY: Duration = Duration::from_secs(30);

/// Upper bound for the refresh interval and the minimum token validity.
const MAX_TOKEN_WINDOW_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("{0} is required when {1} is set")]
    Missing(&'static str, &'static str),
}

/// How the client authenticates against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// The deployment runs without auth; every action is offered.
    Disabled,
    /// No token: read-only access.
    Anonymous,
    /// A fixed access token; cannot be renewed once it expires.
    Static { access_token: String },
    /// Access + refresh token, renewed against an OpenID-Connect token endpoint.
    Oidc {
        access_token: String,
        refresh_token: String,
        token_url: String,
    },
}

/// Where the role names live in the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleConventionKind {
    /// Top-level `roles` claim.
    Plain,
    /// `resource_access.<client_id>.roles` (falls back to realm roles).
    Resource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_base_path: String,
    /// Stock API path, independent of `api_base_path`.
    pub stock_path: String,
    pub auth: AuthConfig,
    pub client_id: String,
    pub role_convention: RoleConventionKind,
    pub refresh_interval: Duration,
    pub min_token_validity: Duration,
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_base_path: DEFAULT_BASE_PATH.to_string(),
            stock_path: DEFAULT_STOCK_PATH.to_string(),
            auth: AuthConfig::Anonymous,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            role_convention: RoleConventionKind::Plain,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            min_token_validity: DEFAULT_MIN_TOKEN_VALIDITY,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Read `STOCKROOM_*` environment variables, defaulting what is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let api_url = get("STOCKROOM_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let api_base_path = get("STOCKROOM_API_BASE_PATH")
            .map(|p| format!("/{}", p.trim_matches('/')))
            .unwrap_or(defaults.api_base_path);

        let stock_path = get("STOCKROOM_STOCK_PATH")
            .map(|p| format!("/{}", p.trim_matches('/')))
            .unwrap_or(defaults.stock_path);

        let auth_disabled = match get("STOCKROOM_AUTH_DISABLED") {
            Some(v) => parse_bool("STOCKROOM_AUTH_DISABLED", &v)?,
            None => false,
        };

        let auth = if auth_disabled {
            AuthConfig::Disabled
        } else {
            match (
                get("STOCKROOM_AUTH_TOKEN"),
                get("STOCKROOM_REFRESH_TOKEN"),
                get("STOCKROOM_TOKEN_URL"),
            ) {
                (Some(access_token), Some(refresh_token), Some(token_url)) => AuthConfig::Oidc {
                    access_token,
                    refresh_token,
                    token_url,
                },
                (_, Some(_), None) => {
                    return Err(ConfigError::Missing("STOCKROOM_TOKEN_URL", "STOCKROOM_REFRESH_TOKEN"));
                }
                (None, Some(_), Some(_)) => {
                    return Err(ConfigError::Missing("STOCKROOM_AUTH_TOKEN", "STOCKROOM_REFRESH_TOKEN"));
                }
                (Some(access_token), _, _) => AuthConfig::Static { access_token },
                (None, None, _) => AuthConfig::Anonymous,
            }
        };

        let role_convention = match get("STOCKROOM_ROLE_CONVENTION").as_deref() {
            None => defaults.role_convention,
            Some(v) => match v.trim().to_lowercase().as_str() {
                "plain" | "roles" => RoleConventionKind::Plain,
                "resource" | "resource_access" => RoleConventionKind::Resource,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "STOCKROOM_ROLE_CONVENTION",
                        value: v.to_string(),
                        reason: "expected 'plain' or 'resource'",
                    });
                }
            },
        };

        let refresh_interval = match get("STOCKROOM_REFRESH_INTERVAL_SECS") {
            Some(v) => Duration::from_secs(parse_bounded(
                "STOCKROOM_REFRESH_INTERVAL_SECS",
                &v,
                MAX_TOKEN_WINDOW_SECS,
            )?),
            None => defaults.refresh_interval,
        };

        let min_token_validity = match get("STOCKROOM_MIN_TOKEN_VALIDITY_SECS") {
            Some(v) => Duration::from_secs(parse_bounded(
                "STOCKROOM_MIN_TOKEN_VALIDITY_SECS",
                &v,
                MAX_TOKEN_WINDOW_SECS,
            )?),
            None => defaults.min_token_validity,
        };

        let page_size = match get("STOCKROOM_PAGE_SIZE") {
            Some(v) => parse_positive("STOCKROOM_PAGE_SIZE", &v)? as usize,
            None => defaults.page_size,
        };

        Ok(Self {
            api_url,
            api_base_path,
            stock_path,
            auth,
            client_id: get("STOCKROOM_CLIENT_ID").unwrap_or(defaults.client_id),
            role_convention,
            refresh_interval,
            min_token_validity,
            page_size,
        })
    }

    /// `api_url` joined with the base path, e.g. `http://localhost:8080/api`.
    pub fn api_root(&self) -> String {
        format!("{}{}", self.api_url, self.api_base_path)
    }

    /// `api_url` joined with the stock path, e.g. `http://localhost:8080/api/v2/stock`.
    pub fn stock_root(&self) -> String {
        format!("{}{}", self.api_url, self.stock_path)
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected a positive integer",
        }),
    }
}

fn parse_bounded(key: &'static str, value: &str, max: u64) -> Result<u64, ConfigError> {
    match parse_positive(key, value)? {
        n if n <= max => Ok(n),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "exceeds one day",
        }),
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected true or false",
        }),
    }
}
