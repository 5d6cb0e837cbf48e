// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route authorizer.
//!
//! Decides, from the stored token alone, whether navigation to a
//! role-restricted route may proceed. The token is decoded but not verified,
//! so this is a navigation convenience only; the backends enforce access.

use crate::session::{decode_claims, CredentialStore, Role};
use std::sync::Arc;

/// Where unauthenticated navigation is sent.
pub const LOGIN_ROUTE: &str = "/auth/login";
/// Where authenticated navigation without the required role is sent.
pub const UNAUTHORIZED_ROUTE: &str = "/unauthorized";

/// Why a navigation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NoToken,
    InvalidToken,
    Expired,
    MissingRole,
}

/// Outcome of a guard check. Both states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny {
        redirect_to: &'static str,
        reason: DenyReason,
    },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    fn deny(reason: DenyReason) -> Self {
        let redirect_to = match reason {
            DenyReason::MissingRole => UNAUTHORIZED_ROUTE,
            DenyReason::NoToken | DenyReason::InvalidToken | DenyReason::Expired => LOGIN_ROUTE,
        };
        GuardDecision::Deny {
            redirect_to,
            reason,
        }
    }
}

/// Guard evaluated before entering a role-restricted route.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: Arc<CredentialStore>,
}

impl RouteGuard {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }

    /// Check the stored token against the route's required role.
    pub fn check(&self, required: &Role) -> GuardDecision {
        let Some(token) = self.store.token() else {
            tracing::debug!(required = %required, "Guard: no token");
            return GuardDecision::deny(DenyReason::NoToken);
        };

        let claims = match decode_claims(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(error = %e, "Guard: stored token does not decode");
                return GuardDecision::deny(DenyReason::InvalidToken);
            }
        };

        if claims.is_expired() {
            tracing::info!(exp = ?claims.exp, "Guard: stored token expired");
            return GuardDecision::deny(DenyReason::Expired);
        }

        if claims.has_role(required) {
            GuardDecision::Allow
        } else {
            tracing::info!(
                required = %required,
                roles = ?claims.roles(),
                "Guard: role not granted"
            );
            GuardDecision::deny(DenyReason::MissingRole)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryStorage, SessionStorage};

    fn token(payload: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &payload,
            &jsonwebtoken::EncodingKey::from_secret(b"k"),
        )
        .unwrap()
    }

    fn guard_with(payload: serde_json::Value) -> RouteGuard {
        let store = Arc::new(CredentialStore::in_memory());
        store.set_credential(&token(payload)).unwrap();
        RouteGuard::new(store)
    }

    #[test]
    fn test_matching_role_allowed() {
        let guard = guard_with(serde_json::json!({"id": 1, "role": "ADMIN"}));
        assert_eq!(guard.check(&Role::Admin), GuardDecision::Allow);
    }

    #[test]
    fn test_other_role_sent_to_unauthorized() {
        let guard = guard_with(serde_json::json!({"id": 1, "role": "ENSEIGNANT"}));
        assert_eq!(
            guard.check(&Role::Admin),
            GuardDecision::Deny {
                redirect_to: UNAUTHORIZED_ROUTE,
                reason: DenyReason::MissingRole
            }
        );
    }

    #[test]
    fn test_roles_array_is_honored() {
        let guard = guard_with(serde_json::json!({"id": 1, "roles": ["COORDINATOR", "ENSEIGNANT"]}));
        assert!(guard.check(&Role::Enseignant).is_allowed());
        assert!(guard.check(&Role::Coordinator).is_allowed());
        assert!(!guard.check(&Role::Admin).is_allowed());
    }

    #[test]
    fn test_no_token_sent_to_login() {
        let guard = RouteGuard::new(Arc::new(CredentialStore::in_memory()));
        for role in [Role::Admin, Role::Enseignant] {
            assert_eq!(
                guard.check(&role),
                GuardDecision::Deny {
                    redirect_to: LOGIN_ROUTE,
                    reason: DenyReason::NoToken
                }
            );
        }
    }

    #[test]
    fn test_malformed_token_sent_to_login() {
        let storage = MemoryStorage::new();
        storage
            .set_many(&[
                ("token", "definitely.not.ajwt".to_string()),
                ("userId", "1".to_string()),
                ("role", "ADMIN".to_string()),
            ])
            .unwrap();
        let guard = RouteGuard::new(Arc::new(CredentialStore::open(storage).unwrap()));

        assert_eq!(
            guard.check(&Role::Admin),
            GuardDecision::Deny {
                redirect_to: LOGIN_ROUTE,
                reason: DenyReason::InvalidToken
            }
        );
    }

    #[test]
    fn test_expired_token_sent_to_login() {
        let guard = guard_with(serde_json::json!({"id": 1, "role": "ADMIN", "exp": 1000}));
        assert_eq!(
            guard.check(&Role::Admin),
            GuardDecision::Deny {
                redirect_to: LOGIN_ROUTE,
                reason: DenyReason::Expired
            }
        );
    }
}
