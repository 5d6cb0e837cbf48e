// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User administration (admin area: teaching staff management).

use crate::config::Config;
use crate::error::Result;
use crate::middleware::ApiClient;
use crate::models::User;
use reqwest::Method;

/// Client for the user service's `/user` endpoints.
#[derive(Clone)]
pub struct UserService {
    api: ApiClient,
    base_url: String,
}

impl UserService {
    pub fn new(config: &Config, api: ApiClient) -> Self {
        Self {
            api,
            base_url: format!("{}/user", config.auth_api_url),
        }
    }

    pub async fn all_users(&self) -> Result<Vec<User>> {
        self.api
            .get_json(&format!("{}/allUser", self.base_url))
            .await
    }

    /// Users holding the enseignant role.
    pub async fn enseignants(&self) -> Result<Vec<User>> {
        let users = self.all_users().await?;
        Ok(users.into_iter().filter(User::is_enseignant).collect())
    }

    pub async fn user_by_id(&self, id: u64) -> Result<User> {
        self.api
            .get_json(&format!("{}/getbyid/{}", self.base_url, id))
            .await
    }

    pub async fn add_user(&self, user: &User) -> Result<User> {
        let url = format!("{}/addUser", self.base_url);
        self.api
            .send_json(self.api.request(Method::POST, &url).json(user))
            .await
    }

    pub async fn update_user(&self, user: &User) -> Result<User> {
        let url = format!("{}/updateUser", self.base_url);
        self.api
            .send_json(self.api.request(Method::PUT, &url).json(user))
            .await
    }

    pub async fn delete_user(&self, id: u64) -> Result<()> {
        let url = format!("{}/delete/{}", self.base_url, id);
        self.api
            .send_empty(self.api.request(Method::DELETE, &url))
            .await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
