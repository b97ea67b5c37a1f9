// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request authentication context.

use std::net::IpAddr;
use std::sync::Arc;

use fleet_core::Role;
use uuid::Uuid;

use super::capability::{Capability, CapabilitySet};
use super::Credential;

/// Authentication context attached to a request after verification.
///
/// Carries the verified credential, the capability set its role resolves to,
/// and request metadata for logging and auditing.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The verified credential.
    pub credential: Credential,
    /// Capabilities the credential's role holds.
    pub capabilities: Arc<CapabilitySet>,
    /// Request id for tracing.
    pub request_id: Uuid,
    /// Client address, when known.
    pub client_ip: Option<IpAddr>,
}

impl AuthContext {
    /// Creates a context from a verified credential and its resolved
    /// capability set.
    pub fn new(credential: Credential, capabilities: CapabilitySet) -> Self {
        Self {
            credential,
            capabilities: Arc::new(capabilities),
            request_id: Uuid::now_v7(),
            client_ip: None,
        }
    }

    /// Sets the client address.
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Sets the request id.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the authenticated username.
    pub fn subject(&self) -> &str {
        &self.credential.subject
    }

    /// Returns the credential's role.
    pub fn role(&self) -> Role {
        self.credential.role
    }

    /// Returns `true` if the context holds the given capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_context_from_credential() {
        let credential = Credential::new("alice", Role::Admin, Duration::minutes(15));
        let capabilities =
            CapabilitySet::from_capabilities([Capability::VehicleRead, Capability::VehicleManage]);

        let ctx = AuthContext::new(credential, capabilities);

        assert_eq!(ctx.subject(), "alice");
        assert_eq!(ctx.role(), Role::Admin);
        assert!(ctx.has_capability(Capability::VehicleRead));
        assert!(!ctx.has_capability(Capability::UserManage));
    }

    #[test]
    fn test_context_metadata() {
        let credential = Credential::new("bob", Role::Driver, Duration::minutes(15));
        let ctx = AuthContext::new(credential, CapabilitySet::new())
            .with_client_ip("10.0.0.7".parse().unwrap());

        assert_eq!(ctx.client_ip, Some("10.0.0.7".parse().unwrap()));
    }
}
