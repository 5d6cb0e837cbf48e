// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request authenticator.
//!
//! Every backend call goes through [`ApiClient`]. It attaches the stored
//! bearer token and, when a backend answers 401, wipes the whole credential
//! before handing the error back to the caller. No redirect, no retry.
//!
//! Only the credential the rejected request carried is wiped: a login that
//! completes while the request is in flight keeps its new session.

use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::session::CredentialStore;
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// HTTP client bound to the credential store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    store: Arc<CredentialStore>,
}

impl ApiClient {
    /// Build a client honoring the configured timeout (none by default).
    pub fn new(config: &Config, store: Arc<CredentialStore>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PortalError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self { http, store })
    }

    pub fn with_client(http: reqwest::Client, store: Arc<CredentialStore>) -> Self {
        Self { http, store }
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Start a request. Authentication is applied at send time.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Attach `Authorization: Bearer <token>` when a token is stored.
    pub fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        self.attach_token(builder).0
    }

    fn attach_token(&self, builder: RequestBuilder) -> (RequestBuilder, Option<String>) {
        match self.store.token() {
            Some(token) => (
                builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
                Some(token),
            ),
            None => (builder, None),
        }
    }

    /// Send an authenticated request.
    ///
    /// A 401 clears the credential the request was sent with, then surfaces
    /// as an error.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let (builder, sent_token) = self.attach_token(builder);
        let response = builder.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(token) = sent_token {
                match self.store.clear_if_token(&token) {
                    Ok(true) => {
                        tracing::warn!(url = %response.url(), "Backend returned 401, session cleared")
                    }
                    Ok(false) => tracing::info!(
                        url = %response.url(),
                        "Backend returned 401 for a replaced token, session kept"
                    ),
                    Err(e) => tracing::error!(error = %e, "Failed to clear session after 401"),
                }
            }
        }

        check_response(response).await
    }

    /// Send a request without credentials (login, registration, recovery).
    ///
    /// A 401 here is an ordinary error and leaves the session alone.
    pub async fn send_anonymous(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        check_response(response).await
    }

    /// Like [`ApiClient::send_anonymous`], but hands back error responses
    /// unread so the caller can interpret their body.
    pub async fn send_anonymous_unchecked(&self, builder: RequestBuilder) -> Result<Response> {
        Ok(builder.send().await?)
    }

    /// Authenticated GET with a JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, url)).await?;
        read_json(response).await
    }

    /// Send an authenticated request and parse its JSON response.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        read_json(response).await
    }

    /// Send an authenticated request whose body is ignored.
    pub async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.send(builder).await?;
        Ok(())
    }
}

/// Turn non-success responses into a normalized [`PortalError::Api`].
pub(crate) async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let err = PortalError::from_response_body(status, &body);
    tracing::debug!(status = status.as_u16(), error = %err, "Backend call failed");
    Err(err)
}

/// Parse a JSON response body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let url = response.url().to_string();
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        PortalError::Internal(anyhow::anyhow!("Unexpected response from {}: {}", url, e))
    })
}
