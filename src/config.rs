// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portal configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default base URL of the user/auth service.
pub const DEFAULT_AUTH_URL: &str = "http://localhost:8089/tests";
/// Default base URL of the formation/reservation service.
pub const DEFAULT_FORMATION_URL: &str = "http://localhost:9094/Formation-Service/api";
/// Default location of the persisted session.
pub const DEFAULT_SESSION_FILE: &str = ".portal-session.json";

/// Portal configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the user/auth service (hosts `/auth/*` and `/user/*`)
    pub auth_api_url: String,
    /// Base URL of the formation service (hosts `/categories`, `/formations`, `/reservations`)
    pub formation_api_url: String,
    /// File backing the persisted credential storage
    pub session_file: PathBuf,
    /// Optional per-request timeout; `None` means requests never time out
    pub http_timeout: Option<Duration>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            auth_api_url: "http://127.0.0.1:8089/tests".to_string(),
            formation_api_url: "http://127.0.0.1:9094/Formation-Service/api".to_string(),
            session_file: PathBuf::from("test-session.json"),
            http_timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let http_timeout = match env::var("PORTAL_HTTP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("PORTAL_HTTP_TIMEOUT_SECS", raw.clone()))?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self {
            auth_api_url: base_url("PORTAL_AUTH_URL", DEFAULT_AUTH_URL),
            formation_api_url: base_url("PORTAL_FORMATION_URL", DEFAULT_FORMATION_URL),
            session_file: env::var("PORTAL_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE)),
            http_timeout,
        })
    }

    /// Config pointing both backends at one stub server (used by tests).
    pub fn for_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            auth_api_url: base.to_string(),
            formation_api_url: format!("{}/api", base),
            ..Self::default()
        }
    }
}

/// Read a base URL, stripping any trailing slash so paths can be appended.
fn base_url(var: &str, default: &str) -> String {
    env::var(var)
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .unwrap_or_else(|_| default.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
