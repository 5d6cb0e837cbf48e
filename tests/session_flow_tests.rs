// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session service tests against a stub auth backend.

use formation_portal::error::PortalError;
use formation_portal::middleware::guard::DenyReason;
use formation_portal::models::{LoginRequest, RegisterRequest, User};
use formation_portal::routes::UNAUTHORIZED_ROUTE;
use formation_portal::session::Role;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

#[tokio::test]
async fn test_enseignant_login_end_to_end() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);
    let token = common::create_test_jwt(7, "ENSEIGNANT");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({"email": "a@b.com", "password": "x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": token})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = portal
        .session
        .login(&LoginRequest::new("a@b.com", "x"))
        .await
        .unwrap();

    assert_eq!(portal.store.user_id(), Some(7));
    assert_eq!(portal.store.role(), Some(Role::Enseignant));
    assert_eq!(outcome.credential.token, token);
    // Enseignants land in their own area
    assert_eq!(outcome.navigation.location, "/enseignant/formations");

    let nav = portal.router.navigate("/enseignant/reservations");
    assert!(nav.is_granted());
    assert_eq!(nav.location, "/enseignant/reservations");

    let nav = portal.router.navigate("/admin/dashboard");
    assert_eq!(nav.location, UNAUTHORIZED_ROUTE);
    assert_eq!(nav.denied, Some(DenyReason::MissingRole));
}

#[tokio::test]
async fn test_admin_login_lands_on_dashboard() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": common::create_test_jwt(1, "ADMIN")
        })))
        .mount(&server)
        .await;

    let outcome = portal
        .session
        .login(&LoginRequest::new("admin@esprit.tn", "pw"))
        .await
        .unwrap();

    assert_eq!(outcome.navigation.location, "/admin/dashboard");
    assert!(portal.store.is_admin());
}

#[tokio::test]
async fn test_unknown_role_lands_on_login_page() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": common::create_test_jwt(2, "ETUDIANT")
        })))
        .mount(&server)
        .await;

    let outcome = portal
        .session
        .login(&LoginRequest::new("s@esprit.tn", "pw"))
        .await
        .unwrap();

    // Generic landing "/" redirects to the login page
    assert_eq!(outcome.navigation.requested, "/");
    assert_eq!(outcome.navigation.location, "/auth/login");
    assert_eq!(portal.store.role(), Some(Role::Other("ETUDIANT".to_string())));
}

#[tokio::test]
async fn test_login_with_undecodable_token_stores_nothing() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "opaque"})))
        .mount(&server)
        .await;

    let err = portal
        .session
        .login(&LoginRequest::new("a@b.com", "x"))
        .await
        .unwrap_err();

    assert!(matches!(err, PortalError::TokenDecode(_)));
    assert!(!portal.store.is_logged_in());
}

#[tokio::test]
async fn test_login_rejects_bad_email_before_network() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);

    let err = portal
        .session
        .login(&LoginRequest::new("not-an-email", "x"))
        .await
        .unwrap_err();

    assert!(matches!(err, PortalError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_does_not_log_in() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": common::create_test_jwt(11, "ENSEIGNANT")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = RegisterRequest {
        first_name: "Sami".to_string(),
        last_name: "Trabelsi".to_string(),
        email: "sami@esprit.tn".to_string(),
        password: "Str0ng!pass".to_string(),
        phone_number: Some("22123456".to_string()),
        address: None,
        role_type: Role::Enseignant,
    };
    portal.session.register(&request).await.unwrap();

    assert!(!portal.store.is_logged_in());
}

#[tokio::test]
async fn test_register_duplicate_email_message() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "token": "L'email est déjà utilisé."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = RegisterRequest {
        first_name: "A".to_string(),
        last_name: "B".to_string(),
        email: "taken@esprit.tn".to_string(),
        password: "password123".to_string(),
        phone_number: None,
        address: None,
        role_type: Role::Enseignant,
    };
    let err = portal.session.register(&request).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "L'email est déjà utilisé.");
    assert!(!portal.store.is_logged_in());
}

#[tokio::test]
async fn test_register_rejection_without_reason() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({"token": ""})))
        .mount(&server)
        .await;

    let request = RegisterRequest {
        first_name: "A".to_string(),
        last_name: "B".to_string(),
        email: "a@esprit.tn".to_string(),
        password: "password123".to_string(),
        phone_number: None,
        address: None,
        role_type: Role::Enseignant,
    };
    let err = portal.session.register(&request).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Error Code: 400");
}

#[tokio::test]
async fn test_password_recovery_two_steps() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);

    Mock::given(method("POST"))
        .and(path("/auth/forgot-password"))
        .and(query_param("email", "a@b.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "message": "Code de vérification envoyé par email !"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/reset-password"))
        .and(body_string_contains("otp=123456"))
        .and(body_string_contains("newPassword=N3wPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Mot de passe réinitialisé !"))
        .expect(1)
        .mount(&server)
        .await;

    let sent = portal.session.forgot_password("a@b.com").await.unwrap();
    assert_eq!(sent, "Code de vérification envoyé par email !");

    let done = portal
        .session
        .reset_password("a@b.com", "123456", "N3wPassword")
        .await
        .unwrap();
    assert_eq!(done, "Mot de passe réinitialisé !");
}

#[tokio::test]
async fn test_reset_password_rejects_short_password() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);

    let err = portal
        .session
        .reset_password("a@b.com", "123456", "short")
        .await
        .unwrap_err();
    assert!(matches!(err, PortalError::Validation(_)));
}

#[tokio::test]
async fn test_current_user_requires_session() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);

    let err = portal.session.current_user().await.unwrap_err();
    assert!(matches!(err, PortalError::NotAuthenticated));
}

#[tokio::test]
async fn test_current_user_fetches_profile() {
    let server = MockServer::start().await;
    let (portal, _) = common::logged_in_portal(&server, 7, "ENSEIGNANT");

    Mock::given(method("GET"))
        .and(path("/user/getbyid/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7, "firstName": "Amel", "lastName": "Ben Salah",
            "email": "amel@esprit.tn", "roleType": "ENSEIGNANT"
        })))
        .mount(&server)
        .await;

    let user = portal.session.current_user().await.unwrap();
    assert_eq!(user.full_name(), "Amel Ben Salah");
}

#[tokio::test]
async fn test_update_profile_uses_session_user_id() {
    let server = MockServer::start().await;
    let (portal, _) = common::logged_in_portal(&server, 7, "ENSEIGNANT");

    Mock::given(method("PUT"))
        .and(path("/user/updateUser"))
        .and(body_string_contains("\"id\":7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7, "firstName": "Amel", "email": "amel@esprit.tn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let edit = User {
        id: Some(999),
        first_name: Some("Amel".to_string()),
        email: "amel@esprit.tn".to_string(),
        ..User::default()
    };
    let saved = portal.session.update_profile(&edit).await.unwrap();
    assert_eq!(saved.id, Some(7));
}

#[tokio::test]
async fn test_uniqueness_checks() {
    let server = MockServer::start().await;
    let portal = common::test_portal(&server);

    Mock::given(method("GET"))
        .and(path("/user/check-email/taken%40esprit.tn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(false))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/check-phone/22123456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(true))
        .mount(&server)
        .await;

    assert!(!portal.session.check_email_unique("taken@esprit.tn").await.unwrap());
    assert!(portal.session.check_phone_unique("22123456").await.unwrap());
}

#[tokio::test]
async fn test_logout_clears_without_backend_call() {
    let server = MockServer::start().await;
    let (portal, _) = common::logged_in_portal(&server, 7, "ENSEIGNANT");

    portal.session.logout().unwrap();

    assert_eq!(portal.store.current(), None);
    assert!(server.received_requests().await.unwrap().is_empty());

    let nav = portal.router.navigate("/enseignant");
    assert_eq!(nav.location, "/auth/login");
    assert_eq!(nav.denied, Some(DenyReason::NoToken));
}
