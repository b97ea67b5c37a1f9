// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User account handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use fleet_core::audit::{AuditAction, AuditEvent};
use fleet_core::{Role, User, UserId};

use crate::auth::password::hash_password;
use crate::auth::{AccessScope, Capability, Resource};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, IdPath, OptionalAuth, ValidatedJson};
use crate::response::UserResponse;
use crate::state::AppState;

// =============================================================================
// Create
// =============================================================================

/// User creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
    /// Requested role; defaults to `driver` for self-registration.
    pub role: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Government-issued identifier.
    pub government_id: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Driving licence number.
    pub driving_licence_number: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Free-form account status.
    pub status: Option<String>,
}

/// POST /users
///
/// Registers a user account. The route is public so deployments can
/// bootstrap themselves, but only an authenticated account holder with
/// `user:manage` may register a role other than `driver`.
pub async fn create_user(
    State(state): State<AppState>,
    OptionalAuth(ctx): OptionalAuth,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.username.is_empty() {
        return Err(ApiError::validation("username must not be empty"));
    }
    if request.password.len() < 8 {
        return Err(ApiError::validation("password must be at least 8 characters"));
    }

    let role = match &request.role {
        Some(name) => Role::parse(name)
            .ok_or_else(|| ApiError::validation(format!("unknown role '{}'", name)))?,
        None => Role::Driver,
    };

    if role != Role::Driver {
        let privileged = ctx
            .as_ref()
            .is_some_and(|c| c.has_capability(Capability::UserManage));
        if !privileged {
            return Err(ApiError::forbidden("insufficient role for this operation"));
        }
    }

    let password_hash = hash_password(&request.password)?;
    let mut user = User::new(UserId::new(0), request.username, password_hash, role);
    user.first_name = request.first_name;
    user.last_name = request.last_name;
    user.middle_name = request.middle_name;
    user.government_id = request.government_id;
    user.address = request.address;
    user.phone_number = request.phone_number;
    user.driving_licence_number = request.driving_licence_number;
    user.email = request.email;
    user.status = request.status;

    let user = state.store().create_user(user).await?;

    let audit = state.audit().clone();
    let event = AuditEvent::new(AuditAction::RecordCreated)
        .with_actor(user.username.clone())
        .with_resource(format!("user/{}", user.id));
    tokio::spawn(async move { audit.record(event).await });

    tracing::info!(username = %user.username, role = %user.role, "user created");

    Ok(Json(UserResponse::from(user)))
}

// =============================================================================
// List / Get
// =============================================================================

/// GET /users
///
/// Administrators receive every account; everyone else receives only their
/// own profile.
pub async fn list_users(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<impl IntoResponse> {
    state.policy().authorize(&ctx.credential, Capability::UserRead)?;

    let users = match state.policy().scope(&ctx.credential, Resource::Users) {
        AccessScope::Unrestricted => state.store().list_users().await,
        AccessScope::OwnedOnly => {
            let user = state
                .store()
                .get_user_by_username(ctx.subject())
                .await
                .map_err(|_| ApiError::DirectoryResolution {
                    username: ctx.subject().to_string(),
                })?;
            vec![user]
        }
    };

    let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(response))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::UserManage)?;

    let user = state.store().get_user(UserId::new(id)).await?;
    Ok(Json(UserResponse::from(user)))
}

// =============================================================================
// Update
// =============================================================================

/// User update request body. Omitted fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    /// New login name.
    pub username: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// New role.
    pub role: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Government-issued identifier.
    pub government_id: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Driving licence number.
    pub driving_licence_number: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Free-form account status.
    pub status: Option<String>,
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::UserManage)?;

    let mut user = state.store().get_user(UserId::new(id)).await?;

    if let Some(username) = request.username {
        if username.is_empty() {
            return Err(ApiError::validation("username must not be empty"));
        }
        user.username = username;
    }
    if let Some(password) = request.password {
        if password.len() < 8 {
            return Err(ApiError::validation("password must be at least 8 characters"));
        }
        user.password_hash = hash_password(&password)?;
    }
    if let Some(role) = request.role {
        user.role = Role::parse(&role)
            .ok_or_else(|| ApiError::validation(format!("unknown role '{}'", role)))?;
    }
    if let Some(v) = request.first_name {
        user.first_name = Some(v);
    }
    if let Some(v) = request.last_name {
        user.last_name = Some(v);
    }
    if let Some(v) = request.middle_name {
        user.middle_name = Some(v);
    }
    if let Some(v) = request.government_id {
        user.government_id = Some(v);
    }
    if let Some(v) = request.address {
        user.address = Some(v);
    }
    if let Some(v) = request.phone_number {
        user.phone_number = Some(v);
    }
    if let Some(v) = request.driving_licence_number {
        user.driving_licence_number = Some(v);
    }
    if let Some(v) = request.email {
        user.email = Some(v);
    }
    if let Some(v) = request.status {
        user.status = Some(v);
    }

    let user = state.store().update_user(user).await?;

    tracing::info!(user_id = %user.id, actor = %ctx.subject(), "user updated");

    Ok(Json(UserResponse::from(user)))
}

// =============================================================================
// Delete
// =============================================================================

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::UserManage)?;

    state.store().delete_user(UserId::new(id)).await?;

    let audit = state.audit().clone();
    let event = AuditEvent::new(AuditAction::RecordDeleted)
        .with_actor(ctx.subject().to_string())
        .with_resource(format!("user/{}", id));
    tokio::spawn(async move { audit.record(event).await });

    Ok(Json(serde_json::json!({ "deleted": true })))
}
