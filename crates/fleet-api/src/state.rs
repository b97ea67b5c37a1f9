// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use fleet_core::audit::{AuditSink, NoOpAuditSink};
use fleet_store::{MemoryStore, UserDirectory};

use crate::auth::{AccessPolicy, TokenAuthority};
use crate::config::ApiConfig;
use crate::error::ApiResult;

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// Everything here is established once at startup and read-only afterwards;
/// cloning is cheap and requests never synchronize on it.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Token authority for credential issuance and verification.
    pub token_authority: Arc<TokenAuthority>,
    /// Role-to-capability policy table.
    pub access_policy: Arc<AccessPolicy>,
    /// Resource store.
    pub store: Arc<MemoryStore>,
    /// Audit sink.
    pub audit: Arc<dyn AuditSink>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token authority.
    pub fn tokens(&self) -> &TokenAuthority {
        &self.token_authority
    }

    /// Returns the access policy.
    pub fn policy(&self) -> &AccessPolicy {
        &self.access_policy
    }

    /// Returns the resource store.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Returns the user directory view of the store.
    pub fn directory(&self) -> &dyn UserDirectory {
        self.store.as_ref()
    }

    /// Returns the audit sink.
    pub fn audit(&self) -> &Arc<dyn AuditSink> {
        &self.audit
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing [`AppState`].
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    token_authority: Option<Arc<TokenAuthority>>,
    access_policy: Option<Arc<AccessPolicy>>,
    store: Option<Arc<MemoryStore>>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            token_authority: None,
            access_policy: None,
            store: None,
            audit: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the token authority.
    pub fn token_authority(mut self, authority: Arc<TokenAuthority>) -> Self {
        self.token_authority = Some(authority);
        self
    }

    /// Sets the access policy.
    pub fn access_policy(mut self, policy: Arc<AccessPolicy>) -> Self {
        self.access_policy = Some(policy);
        self
    }

    /// Sets the resource store.
    pub fn store(mut self, store: Arc<MemoryStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the audit sink.
    pub fn audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Builds the state.
    ///
    /// When no token authority was supplied, one is constructed from the
    /// configuration, which validates the key material and fails here, at
    /// startup, rather than on the first request.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let token_authority = match self.token_authority {
            Some(authority) => authority,
            None => Arc::new(TokenAuthority::new(&config.token)?),
        };

        Ok(AppState {
            config: Arc::new(config),
            token_authority,
            access_policy: self
                .access_policy
                .unwrap_or_else(|| Arc::new(AccessPolicy::new())),
            store: self.store.unwrap_or_else(|| Arc::new(MemoryStore::new())),
            audit: self.audit.unwrap_or_else(|| Arc::new(NoOpAuditSink)),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_key, TokenConfig};

    #[test]
    fn test_builder_with_valid_key() {
        let config = ApiConfig::default().with_token(TokenConfig::new(generate_key()));
        let state = AppState::builder().config(config).build().unwrap();
        assert!(state.policy().has_capability(
            fleet_core::Role::Admin,
            crate::auth::Capability::VehicleManage
        ));
    }

    #[test]
    fn test_builder_rejects_bad_key_at_startup() {
        let config = ApiConfig::default().with_token(TokenConfig::new("short"));
        assert!(AppState::builder().config(config).build().is_err());
    }
}
