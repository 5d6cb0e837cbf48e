// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cross-cutting request and navigation checks.

pub mod auth;
pub mod guard;

pub use auth::ApiClient;
pub use guard::{GuardDecision, RouteGuard};
