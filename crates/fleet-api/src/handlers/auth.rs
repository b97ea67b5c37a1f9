// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use fleet_core::audit::{AuditAction, AuditEvent};

use crate::auth::password::verify_password;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, ValidatedJson};
use crate::response::AuthResponse;
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// POST /login
///
/// Authenticates a user and returns a sealed bearer token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    let user = state.store().get_user_by_username(&request.username).await?;

    if let Err(e) = verify_password(&request.password, &user.password_hash) {
        let audit = state.audit().clone();
        let event = AuditEvent::new(AuditAction::LoginFailed).with_actor(&user.username);
        tokio::spawn(async move { audit.record(event).await });
        return Err(e);
    }

    let token = state.tokens().issue(&user.username, user.role)?;
    state.store().touch_last_login(user.id).await?;

    let audit = state.audit().clone();
    let event = AuditEvent::new(AuditAction::Login).with_actor(&user.username);
    tokio::spawn(async move { audit.record(event).await });

    tracing::info!(username = %user.username, role = %user.role, "user logged in");

    Ok(Json(AuthResponse::new(
        token,
        state.tokens().ttl_secs(),
        user.into(),
    )))
}

// =============================================================================
// Current Identity
// =============================================================================

/// Identity introspection response.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Authenticated username.
    pub username: String,
    /// Role carried by the credential.
    pub role: String,
    /// Capabilities the role resolves to.
    pub capabilities: Vec<String>,
    /// Credential expiry.
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// GET /me
///
/// Returns the authenticated identity and its capability set.
pub async fn me(Auth(ctx): Auth) -> ApiResult<impl IntoResponse> {
    let mut capabilities: Vec<String> =
        ctx.capabilities.iter().map(|c| c.to_string()).collect();
    capabilities.sort();

    Ok(Json(MeResponse {
        username: ctx.subject().to_string(),
        role: ctx.role().to_string(),
        capabilities,
        expires_at: ctx.credential.expires_at,
    }))
}
