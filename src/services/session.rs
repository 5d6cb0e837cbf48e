// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session service: login, registration, password recovery and logout
//! against the auth backend.
//!
//! Handles:
//! - Storing the issued token in the credential store
//! - Role-based navigation after login
//! - Two-step password reset (email, then email + one-time code)

use crate::config::Config;
use crate::error::{extract_message, PortalError, Result};
use crate::middleware::auth::check_response;
use crate::middleware::ApiClient;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::routes::{landing_for, Navigation, PortalRouter};
use crate::session::{Credential, CredentialStore};
use reqwest::Method;
use std::sync::Arc;
use validator::Validate;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub credential: Credential,
    pub navigation: Navigation,
}

/// Authentication operations. Drives the credential store.
#[derive(Clone)]
pub struct SessionService {
    api: ApiClient,
    router: Arc<PortalRouter>,
    base_url: String,
}

impl SessionService {
    pub fn new(config: &Config, api: ApiClient, router: Arc<PortalRouter>) -> Self {
        Self {
            api,
            router,
            base_url: config.auth_api_url.clone(),
        }
    }

    fn store(&self) -> &CredentialStore {
        self.api.store()
    }

    /// Exchange credentials for a token, store it and go to the role's landing page.
    ///
    /// On any failure the stored session is left as it was.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome> {
        request.validate()?;

        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .api
            .send_anonymous(self.api.request(Method::POST, &url).json(request))
            .await
            .inspect_err(|e| tracing::info!(error = %e, "Login rejected"))?;
        let auth: AuthResponse = crate::middleware::auth::read_json(response).await?;

        let credential = self.store().set_credential(&auth.token)?;
        tracing::info!(
            user_id = credential.user_id,
            role = %credential.role,
            "Login succeeded"
        );

        let navigation = self.router.navigate(landing_for(&credential.role));
        Ok(LoginOutcome {
            credential,
            navigation,
        })
    }

    /// Create an account. Does not log the new user in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        request.validate()?;

        let url = format!("{}/auth/register", self.base_url);
        let response = self
            .api
            .send_anonymous_unchecked(self.api.request(Method::POST, &url).json(request))
            .await?;

        let status = response.status();
        if status.is_client_error() {
            // Rejections come back as an AuthResponse whose token field holds the reason
            let body = response.text().await.unwrap_or_default();
            let err = match serde_json::from_str::<AuthResponse>(&body) {
                Ok(auth) if !auth.token.trim().is_empty() => PortalError::Api {
                    status: status.as_u16(),
                    message: auth.token,
                },
                _ => PortalError::from_response_body(status, &body),
            };
            tracing::info!(status = status.as_u16(), error = %err, "Registration rejected");
            return Err(err);
        }
        check_response(response).await?;

        tracing::info!(role = %request.role_type, "Account registered");
        Ok(())
    }

    /// Ask the backend to email a one-time reset code.
    pub async fn forgot_password(&self, email: &str) -> Result<String> {
        let email = email.trim();
        if email.is_empty() {
            return Err(PortalError::Validation("Email is required".to_string()));
        }

        let url = format!("{}/auth/forgot-password", self.base_url);
        let response = self
            .api
            .send_anonymous(
                self.api
                    .request(Method::POST, &url)
                    .query(&[("email", email)]),
            )
            .await?;

        tracing::info!("Password reset code requested");
        Ok(message_or(response, "Verification code sent").await)
    }

    /// Set a new password using the emailed one-time code.
    pub async fn reset_password(&self, email: &str, otp: &str, new_password: &str) -> Result<String> {
        if email.trim().is_empty() || otp.trim().is_empty() {
            return Err(PortalError::Validation(
                "Email and verification code are required".to_string(),
            ));
        }
        if new_password.chars().count() < 8 {
            return Err(PortalError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let url = format!("{}/auth/reset-password", self.base_url);
        let response = self
            .api
            .send_anonymous(self.api.request(Method::POST, &url).form(&[
                ("email", email.trim()),
                ("otp", otp.trim()),
                ("newPassword", new_password),
            ]))
            .await?;

        tracing::info!("Password reset");
        Ok(message_or(response, "Your password has been reset successfully.").await)
    }

    /// Forget the local session. The token is not revoked server-side.
    pub fn logout(&self) -> Result<()> {
        self.store().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Profile of the logged-in user.
    pub async fn current_user(&self) -> Result<User> {
        let user_id = self.store().user_id().ok_or(PortalError::NotAuthenticated)?;
        let url = format!("{}/user/getbyid/{}", self.base_url, user_id);
        self.api.get_json(&url).await
    }

    /// Save changes to the logged-in user's profile.
    pub async fn update_profile(&self, user: &User) -> Result<User> {
        let user_id = self.store().user_id().ok_or(PortalError::NotAuthenticated)?;
        let mut user = user.clone();
        user.id = Some(user_id);

        let url = format!("{}/user/updateUser", self.base_url);
        self.api
            .send_json(self.api.request(Method::PUT, &url).json(&user))
            .await
    }

    /// True when no account uses `email` yet.
    pub async fn check_email_unique(&self, email: &str) -> Result<bool> {
        let url = format!(
            "{}/user/check-email/{}",
            self.base_url,
            urlencoding::encode(email.trim())
        );
        let response = self
            .api
            .send_anonymous(self.api.request(Method::GET, &url))
            .await?;
        crate::middleware::auth::read_json(response).await
    }

    /// True when no account uses `phone` yet.
    pub async fn check_phone_unique(&self, phone: &str) -> Result<bool> {
        let url = format!(
            "{}/user/check-phone/{}",
            self.base_url,
            urlencoding::encode(phone.trim())
        );
        let response = self
            .api
            .send_anonymous(self.api.request(Method::GET, &url))
            .await?;
        crate::middleware::auth::read_json(response).await
    }
}

/// Confirmation text from a response body, or `default`.
async fn message_or(response: reqwest::Response, default: &str) -> String {
    let body = response.text().await.unwrap_or_default();
    extract_message(&body).unwrap_or_else(|| default.to_string())
}
