// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identifier newtypes and domain enumerations.
//!
//! Record identifiers are numeric (the store allocates them sequentially) and
//! every ownership comparison in the service compares these resolved numeric
//! values, never raw usernames.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw value.
            #[inline]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier value.
            #[inline]
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

id_type! {
    /// A unique identifier for a user account.
    UserId
}

id_type! {
    /// A unique identifier for a vehicle.
    VehicleId
}

id_type! {
    /// A unique identifier for a driving task.
    TaskId
}

id_type! {
    /// A unique identifier for a maintenance or fueling record.
    RecordId
}

id_type! {
    /// A unique identifier for an auction listing.
    ListingId
}

// =============================================================================
// Role
// =============================================================================

/// The role attached to a user account.
///
/// Roles are fixed labels; the capability set of each role is defined by the
/// access policy table, not by the role itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Drives vehicles; sees only records assigned to itself.
    Driver,
    /// Fueling personnel; manages fueling records.
    Fueling,
    /// Maintenance personnel; manages maintenance records.
    Maintenance,
}

impl Role {
    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Driver => "driver",
            Role::Fueling => "fueling",
            Role::Maintenance => "maintenance",
        }
    }

    /// Parses a role from a string.
    ///
    /// Accepts the legacy aliases used by older clients
    /// (`fueling_person`, `maintenance_person`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" | "administrator" => Some(Role::Admin),
            "driver" => Some(Role::Driver),
            "fueling" | "fueling_person" => Some(Role::Fueling),
            "maintenance" | "maintenance_person" => Some(Role::Maintenance),
            _ => None,
        }
    }

    /// Returns all defined roles.
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::Driver, Role::Fueling, Role::Maintenance]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Status Enumerations
// =============================================================================

/// Lifecycle status of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    /// Registered but not yet approved for service.
    Pending,
    /// In active service.
    Active,
    /// Out of service.
    Inactive,
    /// Undergoing maintenance.
    InShop,
}

impl VehicleStatus {
    /// Returns the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Pending => "pending",
            VehicleStatus::Active => "active",
            VehicleStatus::Inactive => "inactive",
            VehicleStatus::InShop => "in_shop",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a driving task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Assigned to a driver, not yet finished.
    Assigned,
    /// Finished by the driver.
    Completed,
    /// Canceled before completion.
    Canceled,
    /// Running behind schedule.
    Delayed,
}

impl TaskStatus {
    /// Returns the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Assigned => "assigned",
            TaskStatus::Completed => "completed",
            TaskStatus::Canceled => "canceled",
            TaskStatus::Delayed => "delayed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a maintenance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    /// Scheduled but not yet performed.
    Pending,
    /// Completed.
    Done,
}

impl MaintenanceStatus {
    /// Returns the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Pending => "pending",
            MaintenanceStatus::Done => "done",
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = UserId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(u64::from(id), 42);
        assert_eq!(UserId::from(42), id);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = VehicleId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: VehicleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("fueling_person"), Some(Role::Fueling));
        assert_eq!(Role::parse("maintenance_person"), Some(Role::Maintenance));
        assert_eq!(Role::parse("unknown"), None);
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Driver).unwrap(), "\"driver\"");
        let role: Role = serde_json::from_str("\"fueling\"").unwrap();
        assert_eq!(role, Role::Fueling);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(VehicleStatus::InShop.as_str(), "in_shop");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
        assert_eq!(MaintenanceStatus::Done.as_str(), "done");
    }
}
