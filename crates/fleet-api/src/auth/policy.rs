// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Table-driven role-based access policy.
//!
//! One static table maps each role to its capability set and to the
//! resources on which the role is ownership-scoped. Every endpoint consults
//! this table instead of comparing role strings inline; multi-capability
//! requirements combine with OR, never AND.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fleet_core::Role;
use serde::{Deserialize, Serialize};

use super::capability::{Capability, CapabilitySet};
use super::Credential;
use crate::error::ApiError;

// =============================================================================
// Resource & Scope
// =============================================================================

/// Resource families the policy can scope by ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Vehicle records (owner field: `assigned_driver`).
    Vehicles,
    /// User profiles (owner field: the account itself).
    Users,
    /// Driving tasks (owner field: `driver`).
    Tasks,
}

/// How wide a role's view of a resource is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// The role sees every record.
    Unrestricted,
    /// The role sees only records whose owner field matches its own resolved
    /// user identifier.
    OwnedOnly,
}

impl AccessScope {
    /// Returns `true` for the owned-only scope.
    pub fn is_owned_only(&self) -> bool {
        matches!(self, AccessScope::OwnedOnly)
    }
}

// =============================================================================
// Role Grants
// =============================================================================

/// The grants a single role holds: its capabilities plus the resources on
/// which its reads and writes are narrowed to its own records.
#[derive(Debug, Clone, Default)]
pub struct RoleGrants {
    /// Capabilities granted to the role.
    pub capabilities: CapabilitySet,
    /// Resources on which the role is ownership-scoped.
    pub scoped: HashSet<Resource>,
}

impl RoleGrants {
    /// Creates grants from a capability list.
    pub fn new(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            capabilities: CapabilitySet::from_capabilities(capabilities),
            scoped: HashSet::new(),
        }
    }

    /// Marks a resource as ownership-scoped for this role.
    pub fn scoped_on(mut self, resource: Resource) -> Self {
        self.scoped.insert(resource);
        self
    }
}

// =============================================================================
// Access Policy
// =============================================================================

/// The static role-to-capability table.
///
/// Built once at startup and shared read-only across all requests; decisions
/// are pure functions of the credential, the requested capability, and this
/// table.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    grants: Arc<HashMap<Role, RoleGrants>>,
}

impl AccessPolicy {
    /// Creates the default policy table.
    ///
    /// - `admin`: every capability, unscoped.
    /// - `driver`: reads its own vehicles and tasks, may complete its own
    ///   task, sees its own profile.
    /// - `fueling`: vehicle reads plus fueling records; sees its own profile.
    /// - `maintenance`: vehicle reads plus maintenance records; sees its own
    ///   profile.
    pub fn new() -> Self {
        let mut grants = HashMap::new();

        grants.insert(
            Role::Admin,
            RoleGrants::new(Capability::all().iter().copied()),
        );
        grants.insert(
            Role::Driver,
            RoleGrants::new([
                Capability::VehicleRead,
                Capability::TaskRead,
                Capability::TaskComplete,
                Capability::UserRead,
            ])
            .scoped_on(Resource::Vehicles)
            .scoped_on(Resource::Tasks)
            .scoped_on(Resource::Users),
        );
        grants.insert(
            Role::Fueling,
            RoleGrants::new([
                Capability::VehicleRead,
                Capability::FuelingRead,
                Capability::FuelingManage,
                Capability::UserRead,
            ])
            .scoped_on(Resource::Users),
        );
        grants.insert(
            Role::Maintenance,
            RoleGrants::new([
                Capability::VehicleRead,
                Capability::MaintenanceRead,
                Capability::MaintenanceManage,
                Capability::UserRead,
            ])
            .scoped_on(Resource::Users),
        );

        Self {
            grants: Arc::new(grants),
        }
    }

    /// Creates a policy builder.
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    /// Returns the grants for a role, when the role is known to the table.
    pub fn grants(&self, role: Role) -> Option<&RoleGrants> {
        self.grants.get(&role)
    }

    /// Returns the capability set for a role; unknown roles hold nothing.
    pub fn capabilities(&self, role: Role) -> CapabilitySet {
        self.grants
            .get(&role)
            .map(|g| g.capabilities.clone())
            .unwrap_or_default()
    }

    /// Returns `true` if the role holds the capability.
    pub fn has_capability(&self, role: Role, capability: Capability) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|g| g.capabilities.contains(capability))
    }

    /// Requires the credential's role to hold the capability.
    ///
    /// The denial does not reveal which roles would have sufficed.
    pub fn authorize(
        &self,
        credential: &Credential,
        capability: Capability,
    ) -> Result<(), ApiError> {
        if self.has_capability(credential.role, capability) {
            Ok(())
        } else {
            tracing::warn!(
                subject = %credential.subject,
                role = %credential.role,
                capability = %capability,
                "authorization denied"
            );
            Err(ApiError::forbidden("insufficient role for this operation"))
        }
    }

    /// Requires the credential's role to hold any one of the capabilities.
    pub fn authorize_any(
        &self,
        credential: &Credential,
        capabilities: &[Capability],
    ) -> Result<(), ApiError> {
        let held = self
            .grants
            .get(&credential.role)
            .is_some_and(|g| g.capabilities.contains_any(capabilities));
        if held {
            Ok(())
        } else {
            tracing::warn!(
                subject = %credential.subject,
                role = %credential.role,
                capabilities = ?capabilities.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
                "authorization denied"
            );
            Err(ApiError::forbidden("insufficient role for this operation"))
        }
    }

    /// Returns how wide the credential's view of a resource is.
    pub fn scope(&self, credential: &Credential, resource: Resource) -> AccessScope {
        let scoped = self
            .grants
            .get(&credential.role)
            .is_some_and(|g| g.scoped.contains(&resource));
        if scoped {
            AccessScope::OwnedOnly
        } else {
            AccessScope::Unrestricted
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Access Policy Builder
// =============================================================================

/// Builder for constructing custom policy tables.
#[derive(Debug, Default)]
pub struct AccessPolicyBuilder {
    grants: HashMap<Role, RoleGrants>,
}

impl AccessPolicyBuilder {
    /// Starts from the default role table.
    pub fn with_default_roles(mut self) -> Self {
        let default = AccessPolicy::new();
        self.grants = (*default.grants).clone();
        self
    }

    /// Sets the grants for a role, replacing any existing entry.
    pub fn role(mut self, role: Role, grants: RoleGrants) -> Self {
        self.grants.insert(role, grants);
        self
    }

    /// Builds the policy.
    pub fn build(self) -> AccessPolicy {
        AccessPolicy {
            grants: Arc::new(self.grants),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn credential(role: Role) -> Credential {
        Credential::new("test-user", role, Duration::minutes(15))
    }

    #[test]
    fn test_admin_holds_everything() {
        let policy = AccessPolicy::new();
        for capability in Capability::all() {
            assert!(
                policy.has_capability(Role::Admin, *capability),
                "admin missing {}",
                capability
            );
        }
    }

    #[test]
    fn test_fueling_grants() {
        // The fueling role must actually hold its capabilities; a role check
        // that can never pass for the role it names is a policy bug.
        let policy = AccessPolicy::new();
        assert!(policy.has_capability(Role::Fueling, Capability::FuelingManage));
        assert!(policy.has_capability(Role::Fueling, Capability::FuelingRead));
        assert!(policy.has_capability(Role::Fueling, Capability::VehicleRead));
        assert!(!policy.has_capability(Role::Fueling, Capability::MaintenanceManage));
        assert!(!policy.has_capability(Role::Fueling, Capability::VehicleManage));
    }

    #[test]
    fn test_driver_grants() {
        let policy = AccessPolicy::new();
        assert!(policy.has_capability(Role::Driver, Capability::VehicleRead));
        assert!(policy.has_capability(Role::Driver, Capability::TaskComplete));
        assert!(!policy.has_capability(Role::Driver, Capability::TaskManage));
        assert!(!policy.has_capability(Role::Driver, Capability::UserManage));
    }

    #[test]
    fn test_authorize_denies_without_leaking_roles() {
        let policy = AccessPolicy::new();
        let err = policy
            .authorize(&credential(Role::Driver), Capability::VehicleManage)
            .unwrap_err();
        let message = err.to_string();
        assert!(!message.contains("admin"));
    }

    #[test]
    fn test_authorize_any_is_or_semantics() {
        let policy = AccessPolicy::new();
        let fueling = credential(Role::Fueling);

        // Holding either capability suffices
        policy
            .authorize_any(&fueling, &[Capability::MaintenanceManage, Capability::FuelingManage])
            .unwrap();

        // Holding neither denies
        assert!(policy
            .authorize_any(&fueling, &[Capability::MaintenanceManage, Capability::UserManage])
            .is_err());
    }

    #[test]
    fn test_scoping_table() {
        let policy = AccessPolicy::new();

        assert_eq!(
            policy.scope(&credential(Role::Driver), Resource::Vehicles),
            AccessScope::OwnedOnly
        );
        assert_eq!(
            policy.scope(&credential(Role::Driver), Resource::Tasks),
            AccessScope::OwnedOnly
        );
        assert_eq!(
            policy.scope(&credential(Role::Admin), Resource::Vehicles),
            AccessScope::Unrestricted
        );
        // Fueling sees every vehicle but only its own profile
        assert_eq!(
            policy.scope(&credential(Role::Fueling), Resource::Vehicles),
            AccessScope::Unrestricted
        );
        assert_eq!(
            policy.scope(&credential(Role::Fueling), Resource::Users),
            AccessScope::OwnedOnly
        );
    }

    #[test]
    fn test_builder_override() {
        let policy = AccessPolicy::builder()
            .with_default_roles()
            .role(
                Role::Fueling,
                RoleGrants::new([Capability::FuelingRead]),
            )
            .build();

        assert!(policy.has_capability(Role::Fueling, Capability::FuelingRead));
        assert!(!policy.has_capability(Role::Fueling, Capability::FuelingManage));
        // Untouched roles keep their defaults
        assert!(policy.has_capability(Role::Admin, Capability::VehicleManage));
    }
}
