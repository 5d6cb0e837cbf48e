// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portal error type with one human-readable message per failure.

use reqwest::StatusCode;

/// Every failure surfaced to callers of the portal.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// No response at all (connection refused, DNS, timeout...).
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Invalid token: {0}")]
    TokenDecode(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PortalError {
    /// Build an API error from a failed response's status and raw body.
    ///
    /// The message is the body's JSON `message` or `error` field when there is one, else
    /// the body text itself, else a generic status line.
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| format!("Error Code: {}", status.as_u16()));
        PortalError::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// True for HTTP 401 responses.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PortalError::Api { status: 401, .. })
    }

    /// HTTP status of an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PortalError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        PortalError::Transport(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for PortalError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        PortalError::TokenDecode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for PortalError {
    fn from(err: validator::ValidationErrors) -> Self {
        PortalError::Validation(err.to_string())
    }
}

pub(crate) fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .or_else(|| {
                map.get("error")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            }),
        Ok(serde_json::Value::String(s)) => Some(s),
        _ => Some(body.to_string()),
    }
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;
