// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared API response types.

use serde::{Deserialize, Serialize};

use fleet_core::{Role, User, UserId};

// =============================================================================
// Health
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Version string.
    pub version: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Login response: the sealed token plus the authenticated profile.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Sealed access token.
    pub token: String,
    /// Token type (always "Bearer").
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    /// The authenticated user's profile.
    pub user: UserResponse,
}

impl AuthResponse {
    /// Creates a new auth response.
    pub fn new(token: String, expires_in: i64, user: UserResponse) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// User profile response.
///
/// Selects its fields explicitly so the password hash can never leak into a
/// response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Account identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Account role.
    pub role: Role,
    /// Given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Middle name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Government-issued identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub government_id: Option<String>,
    /// Postal address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Driving licence number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driving_licence_number: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Free-form account status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            middle_name: user.middle_name,
            government_id: user.government_id,
            address: user.address,
            phone_number: user.phone_number,
            driving_licence_number: user.driving_licence_number,
            email: user.email,
            status: user.status,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_omits_password_hash() {
        let user = User::new(UserId::new(1), "alice", "super-secret-hash", Role::Admin);
        let response = UserResponse::from(user);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("super-secret-hash"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_auth_response_shape() {
        let user = User::new(UserId::new(1), "alice", "hash", Role::Admin);
        let response = AuthResponse::new("tok".into(), 900, user.into());
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 900);
    }
}
