// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portal routes and in-process navigation.
//!
//! Each route declares its access requirement next to its path. Navigation
//! follows redirects and runs the [`RouteGuard`] on every role-restricted
//! route it passes through.

use crate::middleware::guard::{DenyReason, GuardDecision, RouteGuard, LOGIN_ROUTE};
use crate::session::Role;
use std::sync::{Mutex, PoisonError};

pub use crate::middleware::guard::UNAUTHORIZED_ROUTE;

/// Target of unknown paths.
pub const NOT_FOUND_ROUTE: &str = "/pages/notfound";
/// Landing for roles without a dedicated area.
pub const HOME_ROUTE: &str = "/";
pub const ADMIN_HOME: &str = "/admin";
pub const ENSEIGNANT_HOME: &str = "/enseignant";

/// Redirect chains longer than this are treated as a configuration bug.
const MAX_HOPS: usize = 8;

/// Who may enter a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Role(Role),
}

/// One entry of the route table.
#[derive(Debug, Clone)]
pub struct RouteDef {
    pub path: &'static str,
    pub access: Access,
    pub redirect_to: Option<&'static str>,
}

impl RouteDef {
    fn public(path: &'static str) -> Self {
        Self {
            path,
            access: Access::Public,
            redirect_to: None,
        }
    }

    fn guarded(path: &'static str, role: Role) -> Self {
        Self {
            path,
            access: Access::Role(role),
            redirect_to: None,
        }
    }

    fn redirect(mut self, target: &'static str) -> Self {
        self.redirect_to = Some(target);
        self
    }
}

/// Static route configuration.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDef>) -> Self {
        Self { routes }
    }

    /// The portal's route table: an admin area, an enseignant area and public
    /// authentication pages.
    pub fn portal() -> Self {
        let mut routes = vec![
            RouteDef::public(HOME_ROUTE).redirect(LOGIN_ROUTE),
            RouteDef::public(LOGIN_ROUTE),
            RouteDef::public("/auth/register"),
            RouteDef::public("/auth/forgot-password"),
            RouteDef::public("/auth/reset-password"),
            RouteDef::public("/auth/access"),
            RouteDef::public("/auth/error"),
            RouteDef::public("/landing"),
            RouteDef::public(UNAUTHORIZED_ROUTE),
            RouteDef::public(NOT_FOUND_ROUTE),
            RouteDef::guarded(ADMIN_HOME, Role::Admin).redirect("/admin/dashboard"),
            RouteDef::guarded(ENSEIGNANT_HOME, Role::Enseignant).redirect("/enseignant/formations"),
        ];

        for child in [
            "/admin/dashboard",
            "/admin/profile",
            "/admin/formations",
            "/admin/categories",
            "/admin/enseignants",
            "/admin/reservations",
            "/admin/user-profile",
        ] {
            routes.push(RouteDef::guarded(child, Role::Admin));
        }

        for child in [
            "/enseignant/formations",
            "/enseignant/reservations",
            "/enseignant/about",
            "/enseignant/profile",
        ] {
            routes.push(RouteDef::guarded(child, Role::Enseignant));
        }

        Self::new(routes)
    }

    pub fn resolve(&self, path: &str) -> Option<&RouteDef> {
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }
}

/// Result of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Path the caller asked for (normalized)
    pub requested: String,
    /// Path actually reached after redirects
    pub location: String,
    /// Set when a guard refused entry somewhere along the way
    pub denied: Option<DenyReason>,
}

impl Navigation {
    pub fn is_granted(&self) -> bool {
        self.denied.is_none()
    }
}

/// Router holding the current location.
#[derive(Debug)]
pub struct PortalRouter {
    table: RouteTable,
    guard: RouteGuard,
    location: Mutex<String>,
}

impl PortalRouter {
    pub fn new(table: RouteTable, guard: RouteGuard) -> Self {
        Self {
            table,
            guard,
            location: Mutex::new(HOME_ROUTE.to_string()),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Current location.
    pub fn location(&self) -> String {
        self.location
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Navigate to `path`, following redirects and guard denials.
    pub fn navigate(&self, path: &str) -> Navigation {
        let requested = normalize_path(path);
        let mut current = requested.clone();
        let mut denied = None;

        for _ in 0..MAX_HOPS {
            let Some(route) = self.table.resolve(&current) else {
                tracing::debug!(path = %current, "No such route");
                current = NOT_FOUND_ROUTE.to_string();
                continue;
            };

            if let Access::Role(required) = &route.access {
                if let GuardDecision::Deny {
                    redirect_to,
                    reason,
                } = self.guard.check(required)
                {
                    denied = Some(reason);
                    current = redirect_to.to_string();
                    continue;
                }
            }

            match route.redirect_to {
                Some(target) => current = target.to_string(),
                None => break,
            }
        }

        tracing::info!(
            requested = %requested,
            location = %current,
            denied = ?denied,
            "Navigation"
        );

        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = current.clone();

        Navigation {
            requested,
            location: current,
            denied,
        }
    }
}

/// Landing page for a freshly logged-in role.
pub fn landing_for(role: &Role) -> &'static str {
    match role {
        Role::Enseignant => ENSEIGNANT_HOME,
        Role::Admin => ADMIN_HOME,
        _ => HOME_ROUTE,
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("").trim();
    let trimmed = path.trim_matches('/');
    format!("/{}", trimmed)
}
