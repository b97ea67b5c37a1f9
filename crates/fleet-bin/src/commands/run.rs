// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The `run` subcommand: start the server.

use std::sync::Arc;

use tracing::{info, warn};

use fleet_api::auth::password::hash_password;
use fleet_api::{ApiServer, AppState};
use fleet_core::audit::TracingAuditSink;
use fleet_core::{Role, User, UserId};
use fleet_store::MemoryStore;

use crate::cli::RunArgs;
use crate::config::AppConfig;
use crate::error::BinResult;
use crate::shutdown::shutdown_signal;

/// Runs the server until a shutdown signal arrives.
pub async fn run(mut config: AppConfig, args: RunArgs) -> BinResult<()> {
    if let Some(port) = args.port {
        config.api.port = port;
    }

    config.validate()?;

    let store = Arc::new(MemoryStore::new());
    seed_admin(&config, &store).await?;

    let state = AppState::builder()
        .config(config.api.clone())
        .store(store)
        .audit(Arc::new(TracingAuditSink))
        .build()?;

    let server = ApiServer::new(state);
    info!(addr = %server.addr(), "fleet server starting");

    server.run_with_shutdown(shutdown_signal()).await?;

    Ok(())
}

/// Creates the configured administrator account when it does not exist yet.
async fn seed_admin(config: &AppConfig, store: &MemoryStore) -> BinResult<()> {
    let Some(seed) = &config.seed_admin else {
        return Ok(());
    };

    if store.get_user_by_username(&seed.username).await.is_ok() {
        warn!(username = %seed.username, "seed admin already exists, skipping");
        return Ok(());
    }

    let password_hash = hash_password(&seed.password)?;
    let user = User::new(UserId::new(0), &seed.username, password_hash, Role::Admin);
    let user = store
        .create_user(user)
        .await
        .map_err(fleet_api::ApiError::from)?;

    info!(username = %user.username, "seeded administrator account");
    Ok(())
}
