// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: health and readiness probes
//! - [`auth`]: login and identity introspection
//! - [`users`]: user account management
//! - [`vehicles`]: vehicle lifecycle and driver assignment
//! - [`tasks`]: driving tasks
//! - [`maintenance`]: maintenance records
//! - [`fueling`]: fueling records
//! - [`auctions`]: auction listings
//! - [`reports`]: per-vehicle reports

mod auctions;
mod auth;
mod fueling;
mod health;
mod maintenance;
mod reports;
mod tasks;
mod users;
mod vehicles;

pub use auctions::*;
pub use auth::*;
pub use fueling::*;
pub use health::*;
pub use maintenance::*;
pub use reports::*;
pub use tasks::*;
pub use users::*;
pub use vehicles::*;

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::state::AppState;
use fleet_core::UserId;
use fleet_store::UserDirectory;

/// Resolves the requesting identity to its numeric user id for
/// ownership-scoped queries.
///
/// A failed resolution is a server-side inconsistency (the credential names
/// an account the directory does not know) and is never downgraded into an
/// unscoped query.
pub(crate) async fn resolve_owner(state: &AppState, ctx: &AuthContext) -> Result<UserId, ApiError> {
    state
        .directory()
        .resolve_user_id(ctx.subject())
        .await
        .map_err(|_| ApiError::DirectoryResolution {
            username: ctx.subject().to_string(),
        })
}
