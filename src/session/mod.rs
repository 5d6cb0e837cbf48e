// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state: token claims, persisted storage and the credential store.

pub mod claims;
pub mod storage;
pub mod store;

pub use claims::{decode_claims, Claims, Role};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{Credential, CredentialStore};
