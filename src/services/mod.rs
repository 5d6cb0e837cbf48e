// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend operations.

pub mod formations;
pub mod password;
pub mod session;
pub mod users;

pub use formations::FormationService;
pub use session::{LoginOutcome, SessionService};
pub use users::UserService;
