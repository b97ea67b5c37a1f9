// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Authentication Integration Tests
//!
//! End-to-end tests for the token and bearer-header contract:
//!
//! - `test_header_*`: Authorization header parsing
//! - `test_token_*`: issuance, verification, expiry, tampering
//! - `test_login_*`: the login flow
//! - `test_status_*`: 401 vs 403 semantics

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use fleet_api::{Credential, TokenError};
use fleet_core::Role;
use fleet_tests::common::{delete, get, post_json, seeded_router, token_for, TEST_PASSWORD};

// =============================================================================
// Bearer Header Contract
// =============================================================================

#[tokio::test]
async fn test_header_missing_is_unauthorized() {
    let (router, _state) = seeded_router().await;

    let (status, body) = get(&router, "/vehicles", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_header_single_field_is_unauthorized() {
    let (router, _state) = seeded_router().await;

    let request = axum::http::Request::builder()
        .uri("/vehicles")
        .header("Authorization", "Bearer")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(router, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_header_wrong_scheme_is_unauthorized() {
    let (router, _state) = seeded_router().await;

    let request = axum::http::Request::builder()
        .uri("/vehicles")
        .header("Authorization", "Basic abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(router, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_header_scheme_is_case_insensitive() {
    let (router, state) = seeded_router().await;
    let token = token_for(&state, "admin", Role::Admin);

    for scheme in ["Bearer", "bearer", "BEARER", "bEaReR"] {
        let request = axum::http::Request::builder()
            .uri("/vehicles")
            .header("Authorization", format!("{} {}", scheme, token))
            .body(axum::body::Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(router.clone(), request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "scheme {}", scheme);
    }
}

// =============================================================================
// Token Lifecycle
// =============================================================================

#[tokio::test]
async fn test_token_roundtrip_through_router() {
    let (router, state) = seeded_router().await;
    let token = token_for(&state, "admin", Role::Admin);

    let (status, body) = get(&router, "/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn test_token_expired_is_unauthorized() {
    let (router, state) = seeded_router().await;

    // Seal a credential whose window has already elapsed
    let expired = Credential::new("admin", Role::Admin, Duration::seconds(-60));
    let token = state.tokens().seal(&expired).unwrap();

    let (status, body) = get(&router, "/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("expired"));
}

#[tokio::test]
async fn test_token_simulated_clock_expiry() {
    // The end-to-end scenario: issue for alice/admin with a 15-minute
    // lifetime, verify immediately, then advance the clock 16 minutes.
    let (_router, state) = seeded_router().await;

    let token = state.tokens().issue("alice", Role::Admin).unwrap();

    let now = Utc::now();
    let credential = state.tokens().verify_at(&token, now).unwrap();
    assert_eq!(credential.subject, "alice");
    assert_eq!(credential.role, Role::Admin);

    let err = state
        .tokens()
        .verify_at(&token, now + Duration::minutes(16))
        .unwrap_err();
    assert_eq!(err, TokenError::Expired);
}

#[tokio::test]
async fn test_token_tampered_is_unauthorized() {
    let (router, state) = seeded_router().await;
    let mut token = token_for(&state, "admin", Role::Admin);

    // Corrupt one character of the sealed blob
    let replacement = if token.ends_with('A') { 'B' } else { 'A' };
    token.pop();
    token.push(replacement);

    let (status, body) = get(&router, "/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("invalid"));
}

#[tokio::test]
async fn test_token_from_foreign_key_is_unauthorized() {
    let (router, _state) = seeded_router().await;
    let (_other_router, other_state) = seeded_router().await;

    // Token sealed under a different deployment's key
    let foreign = token_for(&other_state, "admin", Role::Admin);

    let (status, _body) = get(&router, "/me", Some(&foreign)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Login Flow
// =============================================================================

#[tokio::test]
async fn test_login_success_returns_working_token() {
    let (router, _state) = seeded_router().await;

    let (status, body) = post_json(
        &router,
        "/login",
        None,
        serde_json::json!({ "username": "admin", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 900);
    assert_eq!(body["user"]["username"], "admin");
    // The password hash must never appear in a response
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap().to_string();
    let (status, me) = get(&router, "/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "admin");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (router, _state) = seeded_router().await;

    let (status, _body) = post_json(
        &router,
        "/login",
        None,
        serde_json::json!({ "username": "admin", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let (router, _state) = seeded_router().await;

    let (status, _body) = post_json(
        &router,
        "/login",
        None,
        serde_json::json!({ "username": "nobody", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_empty_fields_rejected() {
    let (router, _state) = seeded_router().await;

    let (status, _body) = post_json(
        &router,
        "/login",
        None,
        serde_json::json!({ "username": "", "password": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// 401 vs 403
// =============================================================================

#[tokio::test]
async fn test_status_distinguishes_unauthenticated_from_forbidden() {
    let (router, state) = seeded_router().await;

    // No credential at all: 401
    let (status, body) = delete(&router, "/vehicles/1", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    // Valid credential, insufficient role: 403
    let token = token_for(&state, "dan", Role::Driver);
    let (status, body) = delete(&router, "/vehicles/1", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_status_forbidden_does_not_leak_sufficient_roles() {
    let (router, state) = seeded_router().await;
    let token = token_for(&state, "dan", Role::Driver);

    let (status, body) = delete(&router, "/vehicles/1", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let message = body["error"]["message"].as_str().unwrap().to_lowercase();
    assert!(!message.contains("admin"));
    assert!(!message.contains("fueling"));
    assert!(!message.contains("maintenance"));
}

#[tokio::test]
async fn test_me_lists_capabilities() {
    let (router, state) = seeded_router().await;
    let token = token_for(&state, "fae", Role::Fueling);

    let (status, body) = get(&router, "/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let capabilities: Vec<String> = body["capabilities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert!(capabilities.contains(&"fueling:manage".to_string()));
    assert!(capabilities.contains(&"vehicle:read".to_string()));
    assert!(!capabilities.contains(&"user:manage".to_string()));
}
