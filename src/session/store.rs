// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store: the single answer to "who is logged in, with which role".
//!
//! A credential is either fully present (token, user ID and role) or fully
//! absent. The only mutators are [`CredentialStore::set_credential`] and
//! [`CredentialStore::clear`]; both touch all three keys at once.

use super::claims::{decode_claims, Role};
use super::storage::{MemoryStorage, SessionStorage};
use crate::error::{PortalError, Result};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const TOKEN_KEY: &str = "token";
pub const USER_ID_KEY: &str = "userId";
pub const ROLE_KEY: &str = "role";

const CREDENTIAL_KEYS: [&str; 3] = [TOKEN_KEY, USER_ID_KEY, ROLE_KEY];

/// Authenticated identity derived from a bearer token.
#[derive(Clone, PartialEq)]
pub struct Credential {
    pub token: String,
    pub user_id: u64,
    pub role: Role,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .finish()
    }
}

/// Owner of the persisted credential.
pub struct CredentialStore {
    storage: Box<dyn SessionStorage>,
    /// Serializes writers so a compare-and-clear cannot interleave with a login
    write: Mutex<()>,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

impl CredentialStore {
    /// Hydrate from persisted storage.
    ///
    /// A partial credential left behind in storage is wiped so the store
    /// starts either logged in or logged out.
    pub fn open(storage: impl SessionStorage + 'static) -> Result<Self> {
        let store = Self {
            storage: Box::new(storage),
            write: Mutex::new(()),
        };

        let present = CREDENTIAL_KEYS
            .iter()
            .filter(|key| store.storage.get(key).is_some())
            .count();

        if present > 0 && store.current().is_none() {
            tracing::warn!(present, "Discarding partial credential from storage");
            store.clear()?;
        } else if let Some(credential) = store.current() {
            tracing::info!(
                user_id = credential.user_id,
                role = %credential.role,
                "Session restored"
            );
        }

        Ok(store)
    }

    /// Empty, non-persistent store.
    pub fn in_memory() -> Self {
        Self {
            storage: Box::new(MemoryStorage::new()),
            write: Mutex::new(()),
        }
    }

    /// Decode `token` and persist it together with its user ID and role.
    ///
    /// Neither signature nor expiry is checked. Fails without touching storage
    /// when the token cannot be decoded or lacks an `id` or role claim.
    pub fn set_credential(&self, token: &str) -> Result<Credential> {
        let claims = decode_claims(token)?;

        let user_id = claims
            .id
            .ok_or_else(|| PortalError::TokenDecode("missing id claim".to_string()))?;
        let role = claims
            .primary_role()
            .ok_or_else(|| PortalError::TokenDecode("missing role claim".to_string()))?;

        let credential = Credential {
            token: token.trim().to_string(),
            user_id,
            role,
        };

        let _write = self.lock_writes();
        self.storage.set_many(&[
            (TOKEN_KEY, credential.token.clone()),
            (USER_ID_KEY, credential.user_id.to_string()),
            (ROLE_KEY, credential.role.to_string()),
        ])?;

        tracing::info!(
            user_id = credential.user_id,
            role = %credential.role,
            "Credential stored"
        );
        Ok(credential)
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn user_id(&self) -> Option<u64> {
        self.storage
            .get(USER_ID_KEY)
            .and_then(|id| id.trim().parse().ok())
    }

    pub fn role(&self) -> Option<Role> {
        self.storage.get(ROLE_KEY).map(Role::from)
    }

    /// The full credential, or `None` unless all three parts are present.
    pub fn current(&self) -> Option<Credential> {
        Some(Credential {
            token: self.token()?,
            user_id: self.user_id()?,
            role: self.role()?,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// Return to the logged-out state.
    pub fn clear(&self) -> Result<()> {
        let _write = self.lock_writes();
        self.remove_all()
    }

    /// Clear only if `token` is still the stored token.
    ///
    /// Returns whether the store was cleared. A credential stored after
    /// `token` was read survives.
    pub fn clear_if_token(&self, token: &str) -> Result<bool> {
        let _write = self.lock_writes();
        if self.token().as_deref() != Some(token) {
            tracing::debug!("Stored token changed, keeping credential");
            return Ok(false);
        }
        self.remove_all()?;
        Ok(true)
    }

    fn remove_all(&self) -> Result<()> {
        self.storage.remove_many(&CREDENTIAL_KEYS)?;
        tracing::info!("Credential cleared");
        Ok(())
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
