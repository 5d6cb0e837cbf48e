// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Formation Portal: session and authorization layer for the training
//! administration portal.
//!
//! This crate provides the credential store, the request authenticator that
//! signs every backend call, the role-based route guard, and clients for the
//! user and formation backends.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use config::Config;
use error::Result;
use middleware::{ApiClient, RouteGuard};
use routes::{PortalRouter, RouteTable};
use services::{FormationService, SessionService, UserService};
use session::{CredentialStore, FileStorage, SessionStorage};
use std::sync::Arc;

/// Shared portal state: one credential store wired into every component.
pub struct Portal {
    pub config: Config,
    pub store: Arc<CredentialStore>,
    pub router: Arc<PortalRouter>,
    pub session: SessionService,
    pub users: UserService,
    pub formations: FormationService,
}

impl Portal {
    /// Hydrate the session from the configured file and wire the services.
    pub fn open(config: Config) -> Result<Self> {
        let storage = FileStorage::open(&config.session_file)?;
        Self::with_storage(config, storage)
    }

    /// Build the portal on top of any storage backend.
    pub fn with_storage(config: Config, storage: impl SessionStorage + 'static) -> Result<Self> {
        let store = Arc::new(CredentialStore::open(storage)?);
        let api = ApiClient::new(&config, store.clone())?;
        let router = Arc::new(PortalRouter::new(
            RouteTable::portal(),
            RouteGuard::new(store.clone()),
        ));

        Ok(Self {
            session: SessionService::new(&config, api.clone(), router.clone()),
            users: UserService::new(&config, api.clone()),
            formations: FormationService::new(&config, api),
            config,
            store,
            router,
        })
    }
}
