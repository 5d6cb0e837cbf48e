// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use formation_portal::config::Config;
use formation_portal::session::MemoryStorage;
use formation_portal::Portal;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::time::{SystemTime, UNIX_EPOCH};
use wiremock::MockServer;

/// Secret the stub backend "signs" with. The portal never sees it.
pub const BACKEND_SECRET: &[u8] = b"ton-secret-base64-encode-ou-une-longue-phrase";

/// Create a token shaped like the auth backend's: `sub`, `id`, `role`, `iat`, `exp`.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: u64, role: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    sign(serde_json::json!({
        "sub": format!("user{}@esprit.tn", user_id),
        "id": user_id,
        "role": role,
        "iat": now,
        "exp": now + 86400,
    }))
}

/// Sign an arbitrary payload.
#[allow(dead_code)]
pub fn sign(payload: serde_json::Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(BACKEND_SECRET),
    )
    .expect("Failed to create JWT")
}

/// Portal wired to a stub backend, with an empty in-memory session.
#[allow(dead_code)]
pub fn test_portal(server: &MockServer) -> Portal {
    Portal::with_storage(Config::for_base_url(&server.uri()), MemoryStorage::new())
        .expect("Failed to build portal")
}

/// Portal already holding a credential for `user_id` / `role`.
#[allow(dead_code)]
pub fn logged_in_portal(server: &MockServer, user_id: u64, role: &str) -> (Portal, String) {
    let portal = test_portal(server);
    let token = create_test_jwt(user_id, role);
    portal
        .store
        .set_credential(&token)
        .expect("Failed to store credential");
    (portal, token)
}
