//! User account and authentication payloads.

use crate::session::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User profile as served by the user service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: String,
    /// Only ever sent, never shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub role_type: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// "First Last", trimmed when either part is missing.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }

    /// Upper-case initials for avatars.
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.as_deref().and_then(|p| p.chars().next()))
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn is_enseignant(&self) -> bool {
        self.role_type == Some(Role::Enseignant)
    }
}

/// Login form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration form. New accounts default to the enseignant role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 6, max = 20, message = "Invalid phone number"))]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub role_type: Role,
}

/// Successful authentication response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_backend_json() {
        let user: User = serde_json::from_str(
            r#"{"id": 4, "firstName": "Amel", "lastName": "Ben Salah",
                "email": "amel@esprit.tn", "roleType": "ENSEIGNANT", "phoneNumber": null}"#,
        )
        .unwrap();

        assert_eq!(user.full_name(), "Amel Ben Salah");
        assert_eq!(user.initials(), "AB");
        assert!(user.is_enseignant());
        assert_eq!(user.phone_number, None);
    }

    #[test]
    fn test_user_missing_names() {
        let user = User {
            last_name: Some("solo".to_string()),
            ..User::default()
        };
        assert_eq!(user.full_name(), "solo");
        assert_eq!(user.initials(), "S");
    }

    #[test]
    fn test_register_validation() {
        let mut request = RegisterRequest {
            first_name: "Sami".to_string(),
            last_name: "Trabelsi".to_string(),
            email: "sami@esprit.tn".to_string(),
            password: "Str0ng!pass".to_string(),
            phone_number: Some("22123456".to_string()),
            address: None,
            role_type: Role::Enseignant,
        };
        assert!(request.validate().is_ok());

        request.email = "not-an-email".to_string();
        request.password = "short".to_string();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_register_serializes_camel_case() {
        let request = RegisterRequest {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "a@b.com".to_string(),
            password: "password1".to_string(),
            phone_number: None,
            address: None,
            role_type: Role::Enseignant,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["firstName"], "A");
        assert_eq!(json["roleType"], "ENSEIGNANT");
        assert!(json.get("phoneNumber").is_none());
    }
}
