// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The bearer credential payload.

use chrono::{DateTime, Duration, Utc};
use fleet_core::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The payload sealed inside a bearer token.
///
/// A credential is immutable once issued and entirely self-contained: no
/// server-side record exists for it, and validity is decided purely from the
/// expiry instant it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Unique token identifier, useful when diagnosing replayed tokens.
    pub token_id: Uuid,
    /// The authenticated username.
    pub subject: String,
    /// The role the subject held at issuance.
    pub role: Role,
    /// Issuance instant.
    pub issued_at: DateTime<Utc>,
    /// Expiry instant; the credential is valid strictly before this.
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// Creates a credential valid for `ttl` starting now.
    ///
    /// `ttl` must be positive; [`TokenAuthority`](super::TokenAuthority)
    /// guarantees this by validating its configuration at construction.
    pub fn new(subject: impl Into<String>, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token_id: Uuid::now_v7(),
            subject: subject.into(),
            role,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    /// Returns `true` if the credential is expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns `true` if the credential is expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns the remaining validity at the given instant, if any.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.is_expired_at(now) {
            None
        } else {
            Some(self.expires_at - now)
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
    fn test_credential_window() {
        let cred = Credential::new("alice", Role::Admin, Duration::minutes(15));
        assert!(cred.expires_at > cred.issued_at);
        assert!(!cred.is_expired());
        assert!(cred.remaining_at(cred.issued_at).is_some());
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let cred = Credential::new("alice", Role::Driver, Duration::minutes(15));
        // Valid strictly before expires_at, invalid at and after it
        assert!(!cred.is_expired_at(cred.expires_at - Duration::seconds(1)));
        assert!(cred.is_expired_at(cred.expires_at));
        assert!(cred.is_expired_at(cred.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_token_ids_are_unique() {
        let a = Credential::new("alice", Role::Admin, Duration::minutes(1));
        let b = Credential::new("alice", Role::Admin, Duration::minutes(1));
        assert_ne!(a.token_id, b.token_id);
    }

    #[test]
    fn test_serde_roundtrip() {
        let cred = Credential::new("bob", Role::Fueling, Duration::minutes(15));
        let json = serde_json::to_string(&cred).unwrap();
        let back: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cred);
    }
}
