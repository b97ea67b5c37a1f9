// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User directory abstraction.

use async_trait::async_trait;

use fleet_core::{StoreError, UserId};

/// Resolves usernames to user identifiers.
///
/// Ownership-scoped authorization narrows queries to `owner == resolved id`;
/// the credential carries only the username, so every scoped check goes
/// through this trait first. A resolution failure must be propagated;
/// falling back to an unscoped query would widen access.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolves a username to its user identifier.
    ///
    /// Returns [`StoreError::NotFound`] when no account with that username
    /// exists.
    async fn resolve_user_id(&self, username: &str) -> Result<UserId, StoreError>;
}
