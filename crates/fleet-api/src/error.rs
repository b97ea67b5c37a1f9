// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and handling.
//!
//! Maps every failure to an HTTP status and a structured JSON body. The
//! split that matters for clients: 401 means "re-authenticate" (missing,
//! malformed, invalid, or expired credential), 403 means "authenticated but
//! not allowed". The 403 body never enumerates which roles would have been
//! sufficient.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::TokenError;
use fleet_core::StoreError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// ApiError
// =============================================================================

/// API error type with HTTP status code mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404).
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// Bad request (400).
    #[error("bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Authentication failure (401).
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// Authorization failure (403): valid identity, insufficient role.
    #[error("forbidden: {message}")]
    Forbidden {
        /// Error message.
        message: String,
    },

    /// Validation error (422).
    #[error("validation failed: {message}")]
    Validation {
        /// Error message.
        message: String,
    },

    /// Conflict with existing state (409).
    #[error("conflict: {message}")]
    Conflict {
        /// Error message.
        message: String,
    },

    /// The user directory could not resolve a username during ownership
    /// scoping (500). Never downgraded: skipping the scope would widen
    /// access.
    #[error("could not resolve user '{username}'")]
    DirectoryResolution {
        /// The username that failed to resolve.
        username: String,
    },

    /// Internal server error (500).
    #[error("internal error: {message}")]
    Internal {
        /// Error message, logged but not sent to clients.
        message: String,
    },
}

impl ApiError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a not-found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an authentication failure.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates an authorization failure.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DirectoryResolution { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::Forbidden { .. } => "FORBIDDEN",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Conflict { .. } => "CONFLICT",
            ApiError::DirectoryResolution { .. } => "DIRECTORY_RESOLUTION_FAILED",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns the message sent to clients.
    ///
    /// Internal failures are reported generically; their detail stays in the
    /// server log.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Internal { .. } => "internal server error".to_string(),
            ApiError::DirectoryResolution { .. } => "internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Returns `true` if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            ApiError::Internal { .. } | ApiError::DirectoryResolution { .. }
        )
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            // A key or lifetime problem discovered after startup is a server
            // bug, not a client authentication failure.
            TokenError::KeyConfiguration { .. } | TokenError::LifetimeConfiguration => {
                ApiError::internal(err.to_string())
            }
            TokenError::Invalid => ApiError::unauthorized("invalid credential"),
            TokenError::Expired => ApiError::unauthorized("credential expired"),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { resource } => ApiError::not_found(resource),
            StoreError::Conflict { message } => ApiError::conflict(message),
            StoreError::Invalid { message } => ApiError::validation(message),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(format!("invalid JSON: {}", err))
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.client_message();

        if self.is_server_error() {
            tracing::error!(error = %self, error_code, status = %status, "server error");
        } else {
            tracing::debug!(error = %self, error_code, status = %status, "client error");
        }

        let body = ErrorResponseBody {
            error: ErrorDetails {
                code: error_code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Error Response Body
// =============================================================================

/// Error response body structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseBody {
    /// Error details.
    pub error: ErrorDetails,
}

/// Error details within the response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_found("vehicle").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::unauthorized("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::forbidden("no access").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::conflict("taken").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::validation("bad field").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::DirectoryResolution {
                username: "alice".into()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_token_error_mapping() {
        // Authentication failures are 401s with distinct codes per cause
        let invalid: ApiError = TokenError::Invalid.into();
        assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
        assert!(invalid.to_string().contains("invalid"));

        let expired: ApiError = TokenError::Expired.into();
        assert_eq!(expired.status_code(), StatusCode::UNAUTHORIZED);
        assert!(expired.to_string().contains("expired"));

        let key: ApiError = TokenError::KeyConfiguration { actual: 16 }.into();
        assert_eq!(key.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_error_mapping() {
        let err: ApiError = StoreError::not_found("task").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = StoreError::conflict("username taken").into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let err = ApiError::internal("db socket /var/run/secret.sock refused");
        assert_eq!(err.client_message(), "internal server error");
    }

    #[test]
    fn test_unauthorized_and_forbidden_are_distinct() {
        assert_ne!(
            ApiError::unauthorized("x").error_code(),
            ApiError::forbidden("x").error_code()
        );
    }
}
