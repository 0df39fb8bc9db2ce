//! Client-side error model.

use serde::Deserialize;
use thiserror::Error;

use stockroom_auth::{AuthzError, PERMISSION_DENIED_MESSAGE};
use stockroom_core::DomainError;

pub type ClientResult<T> = Result<T, ClientError>;

/// Everything that can go wrong between a user action and the API.
///
/// None of these are fatal: the controller records the message and stays usable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never got an HTTP response.
    #[error("network error: {0}")]
    NetworkFailure(String),

    /// Non-2xx response, with the server's `message` if it sent one.
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    ServerRejection { status: u16, message: Option<String> },

    /// Refused locally by the role check; no request was made.
    #[error("{}", PERMISSION_DENIED_MESSAGE)]
    PermissionDenied,

    /// The access token could not be refreshed.
    #[error("session expired; please sign in again")]
    AuthExpired,

    /// Refused locally by form or stock validation; no request was made.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// A 2xx response whose body was not what the API contract promises.
    #[error("parse error: {0}")]
    Decode(String),
}

impl From<AuthzError> for ClientError {
    fn from(_: AuthzError) -> Self {
        ClientError::PermissionDenied
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::NetworkFailure(e.to_string())
        }
    }
}

/// User action an error is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
    MoveStock,
    History,
}

impl Operation {
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Fetch => "Failed to fetch products",
            Operation::Create => "Failed to create product",
            Operation::Update => "Failed to update product",
            Operation::Delete => "Failed to delete product",
            Operation::MoveStock => "Failed to record stock movement",
            Operation::History => "Failed to load stock history",
        }
    }
}

impl ClientError {
    /// The single line shown in the error region for a failed `operation`.
    ///
    /// A server-provided message is shown verbatim; otherwise a generic one.
    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            ClientError::ServerRejection {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            ClientError::PermissionDenied => PERMISSION_DENIED_MESSAGE.to_string(),
            ClientError::AuthExpired => "Your session has expired. Please log in again.".to_string(),
            ClientError::Validation(e) => e.to_string(),
            _ => operation.failure_message().to_string(),
        }
    }
}

/// Error body shapes seen from the API (`{message}` or `{error, message}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}
