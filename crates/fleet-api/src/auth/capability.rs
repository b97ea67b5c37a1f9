// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Capability definitions for the access policy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permitted operation categories.
///
/// Capabilities are assigned to roles by the access policy table; every
/// protected endpoint requires one or more of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    // =========================================================================
    // Vehicle Capabilities
    // =========================================================================
    /// Read vehicle records.
    VehicleRead,
    /// Create, update, activate, and delete vehicles.
    VehicleManage,
    /// Assign and unassign drivers.
    VehicleAssign,

    // =========================================================================
    // User Capabilities
    // =========================================================================
    /// Read user profiles.
    UserRead,
    /// Create, update, and delete user accounts.
    UserManage,

    // =========================================================================
    // Task Capabilities
    // =========================================================================
    /// Read driving tasks.
    TaskRead,
    /// Create, update, and delete tasks.
    TaskManage,
    /// Mark an own assigned task as completed.
    TaskComplete,

    // =========================================================================
    // Record Capabilities
    // =========================================================================
    /// Read maintenance records.
    MaintenanceRead,
    /// Create, update, and delete maintenance records.
    MaintenanceManage,
    /// Read fueling records.
    FuelingRead,
    /// Create and delete fueling records.
    FuelingManage,

    // =========================================================================
    // Auction & Report Capabilities
    // =========================================================================
    /// Create and delete auction listings. Browsing is public.
    AuctionManage,
    /// Generate per-vehicle reports.
    ReportRead,
}

impl Capability {
    /// Returns the capability name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::VehicleRead => "vehicle:read",
            Capability::VehicleManage => "vehicle:manage",
            Capability::VehicleAssign => "vehicle:assign",
            Capability::UserRead => "user:read",
            Capability::UserManage => "user:manage",
            Capability::TaskRead => "task:read",
            Capability::TaskManage => "task:manage",
            Capability::TaskComplete => "task:complete",
            Capability::MaintenanceRead => "maintenance:read",
            Capability::MaintenanceManage => "maintenance:manage",
            Capability::FuelingRead => "fueling:read",
            Capability::FuelingManage => "fueling:manage",
            Capability::AuctionManage => "auction:manage",
            Capability::ReportRead => "report:read",
        }
    }

    /// Returns all defined capabilities.
    pub fn all() -> &'static [Capability] {
        &[
            Capability::VehicleRead,
            Capability::VehicleManage,
            Capability::VehicleAssign,
            Capability::UserRead,
            Capability::UserManage,
            Capability::TaskRead,
            Capability::TaskManage,
            Capability::TaskComplete,
            Capability::MaintenanceRead,
            Capability::MaintenanceManage,
            Capability::FuelingRead,
            Capability::FuelingManage,
            Capability::AuctionManage,
            Capability::ReportRead,
        ]
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Capability Set
// =============================================================================

/// A set of capabilities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    capabilities: std::collections::HashSet<Capability>,
}

impl CapabilitySet {
    /// Creates an empty capability set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from a list of capabilities.
    pub fn from_capabilities(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// Adds a capability to the set.
    pub fn add(&mut self, capability: Capability) {
        self.capabilities.insert(capability);
    }

    /// Returns `true` if the set contains the given capability.
    pub fn contains(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Returns `true` if the set contains any of the given capabilities.
    pub fn contains_any(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().any(|c| self.capabilities.contains(c))
    }

    /// Returns the number of capabilities in the set.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Returns an iterator over the capabilities.
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self::from_capabilities(iter)
    }
}

// =============================================================================
// Tests
// =============================================================================
