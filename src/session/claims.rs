// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token claims and roles.
//!
//! Tokens are issued and signed by the auth backend. The portal only reads
//! their payload: the signature is NOT verified here, so nothing decided from
//! these claims is a security boundary. Every privileged call is checked again
//! by the backend.

use crate::error::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Role tag carried in the token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Enseignant,
    Coordinator,
    /// A tag this client does not know about.
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "ADMIN",
            Role::Enseignant => "ENSEIGNANT",
            Role::Coordinator => "COORDINATOR",
            Role::Other(tag) => tag,
        }
    }
}

impl From<&str> for Role {
    fn from(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Role::Admin,
            "ENSEIGNANT" => Role::Enseignant,
            "COORDINATOR" => Role::Coordinator,
            _ => Role::Other(tag.trim().to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        Role::from(tag.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry of a `roles` array: either a bare tag or a `{ "name": ... }` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleClaim {
    Name(Role),
    Object { name: Role },
}

impl RoleClaim {
    pub fn role(&self) -> &Role {
        match self {
            RoleClaim::Name(role) | RoleClaim::Object { name: role } => role,
        }
    }
}

/// Token payload as issued by the auth backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// User ID
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,
    /// Single role tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Role list (used by some token issuers instead of `role`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<RoleClaim>,
    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

impl Claims {
    /// All roles carried by the token, `role` first, without duplicates.
    pub fn roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = Vec::new();
        let all = self
            .role
            .iter()
            .chain(self.roles.iter().map(RoleClaim::role));
        for role in all {
            if !roles.contains(role) {
                roles.push(role.clone());
            }
        }
        roles
    }

    /// The role the session is keyed on.
    pub fn primary_role(&self) -> Option<Role> {
        self.roles().into_iter().next()
    }

    pub fn has_role(&self, required: &Role) -> bool {
        self.roles().iter().any(|r| r == required)
    }

    /// True when the token carries an `exp` at or before `now` (Unix seconds).
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.exp.is_some_and(|exp| exp <= now)
    }

    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.is_expired_at(now)
    }
}

/// Decode a token's payload without verifying its signature or expiry.
pub fn decode_claims(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token.trim(), &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Accept the user ID as a JSON number or a numeric string.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid user id {:?}", text))),
    }
}
