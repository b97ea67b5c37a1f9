// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Store error hierarchy.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by the resource store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{resource} not found")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The operation conflicts with existing state.
    #[error("conflict: {message}")]
    Conflict {
        /// Conflict description.
        message: String,
    },

    /// The supplied data is invalid.
    #[error("invalid data: {message}")]
    Invalid {
        /// Validation failure description.
        message: String,
    },
}

impl StoreError {
    /// Creates a not-found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates an invalid-data error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(StoreError::not_found("vehicle").to_string(), "vehicle not found");
        assert_eq!(
            StoreError::conflict("username taken").to_string(),
            "conflict: username taken"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(StoreError::not_found("task").is_not_found());
        assert!(!StoreError::conflict("x").is_not_found());
    }
}
