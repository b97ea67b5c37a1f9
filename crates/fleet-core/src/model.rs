// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Domain record structs.
//!
//! Most columns are optional: the intake flows accept sparse records and
//! administrators fill in details later. Structurally required fields
//! (identifiers, usernames, owning references) are concrete.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    ListingId, MaintenanceStatus, RecordId, Role, TaskId, TaskStatus, UserId, VehicleId,
    VehicleStatus,
};

// =============================================================================
// User
// =============================================================================

/// A user account.
///
/// The password hash is stored in PHC string format and must never be
/// serialized into API responses; response types select their fields
/// explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Argon2 password hash (PHC string).
    pub password_hash: String,
    /// Account role.
    pub role: Role,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Government-issued identifier.
    pub government_id: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Driving licence number.
    pub driving_licence_number: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Free-form account status.
    pub status: Option<String>,
    /// Time of the most recent successful login.
    pub last_login: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with the given identity fields.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            first_name: None,
            last_name: None,
            middle_name: None,
            government_id: None,
            address: None,
            phone_number: None,
            driving_licence_number: None,
            email: None,
            status: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Vehicle
// =============================================================================

/// A fleet vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Vehicle identifier.
    pub id: VehicleId,
    /// Manufacturer.
    pub make: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Model year.
    pub year: Option<i32>,
    /// Licence plate.
    pub license_plate: Option<String>,
    /// Seating capacity.
    pub seats: Option<u32>,
    /// Vehicle type (sedan, van, truck, ...).
    pub vehicle_type: Option<String>,
    /// Color.
    pub color: Option<String>,
    /// Vehicle identification number.
    pub vin: Option<String>,
    /// Current odometer reading in kilometers.
    pub mileage: Option<u32>,
    /// Date of the last maintenance service.
    pub last_maintenance: Option<NaiveDate>,
    /// Scheduled date of the next maintenance service.
    pub next_maintenance: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: VehicleStatus,
    /// Driver this vehicle is assigned to, if any.
    pub assigned_driver: Option<UserId>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Creates a new vehicle with the given status.
    pub fn new(id: VehicleId, status: VehicleStatus) -> Self {
        let now = Utc::now();
        Self {
            id,
            make: None,
            model: None,
            year: None,
            license_plate: None,
            seats: None,
            vehicle_type: None,
            color: None,
            vin: None,
            mileage: None,
            last_maintenance: None,
            next_maintenance: None,
            status,
            assigned_driver: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Task
// =============================================================================

/// A driving task: a route from a start coordinate to an end coordinate,
/// assigned to a driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,
    /// Driver the task is assigned to.
    pub driver: Option<UserId>,
    /// Start latitude.
    pub start_latitude: Option<f64>,
    /// Start longitude.
    pub start_longitude: Option<f64>,
    /// End latitude.
    pub end_latitude: Option<f64>,
    /// End longitude.
    pub end_longitude: Option<f64>,
    /// Scheduled start time.
    pub start_time: Option<DateTime<Utc>>,
    /// Scheduled end time.
    pub end_time: Option<DateTime<Utc>>,
    /// Task status.
    pub status: TaskStatus,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in the `Assigned` state.
    pub fn new(id: TaskId) -> Self {
        let now = Utc::now();
        Self {
            id,
            driver: None,
            start_latitude: None,
            start_longitude: None,
            end_latitude: None,
            end_longitude: None,
            start_time: None,
            end_time: None,
            status: TaskStatus::Assigned,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Maintenance Record
// =============================================================================

/// A maintenance service record for a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    /// Record identifier.
    pub id: RecordId,
    /// Serviced vehicle.
    pub vehicle: VehicleId,
    /// Maintenance person who performed the service.
    pub mechanic: UserId,
    /// Service date.
    pub date: Option<NaiveDate>,
    /// Type of service performed.
    pub service_type: Option<String>,
    /// Record status.
    pub status: MaintenanceStatus,
    /// Total cost of the service.
    pub total_cost: Option<f64>,
    /// Odometer reading at service time.
    pub mileage_at_service: Option<u32>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceRecord {
    /// Creates a new pending maintenance record.
    pub fn new(id: RecordId, vehicle: VehicleId, mechanic: UserId) -> Self {
        let now = Utc::now();
        Self {
            id,
            vehicle,
            mechanic,
            date: None,
            service_type: None,
            status: MaintenanceStatus::Pending,
            total_cost: None,
            mileage_at_service: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Fueling Record
// =============================================================================

/// A fueling record for a vehicle.
///
/// Image fields carry opaque URL references; file transport and storage live
/// outside this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelingRecord {
    /// Record identifier.
    pub id: RecordId,
    /// Fueled vehicle.
    pub vehicle: VehicleId,
    /// Fueling person who performed the fueling.
    pub attendant: UserId,
    /// Amount of fuel in liters.
    pub amount: Option<f64>,
    /// Total cost.
    pub total_cost: Option<f64>,
    /// Gas station name.
    pub station: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Image reference taken before fueling.
    pub before_image: Option<String>,
    /// Image reference taken after fueling.
    pub after_image: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl FuelingRecord {
    /// Creates a new fueling record.
    pub fn new(id: RecordId, vehicle: VehicleId, attendant: UserId) -> Self {
        let now = Utc::now();
        Self {
            id,
            vehicle,
            attendant,
            amount: None,
            total_cost: None,
            station: None,
            notes: None,
            before_image: None,
            after_image: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Auction Listing
// =============================================================================

/// A listing offering a vehicle at auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionListing {
    /// Listing identifier.
    pub id: ListingId,
    /// Vehicle being auctioned.
    pub vehicle: VehicleId,
    /// Listing description.
    pub details: Option<String>,
    /// Image URL references.
    pub images: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl AuctionListing {
    /// Creates a new listing for a vehicle.
    pub fn new(id: ListingId, vehicle: VehicleId) -> Self {
        let now = Utc::now();
        Self {
            id,
            vehicle,
            details: None,
            images: Vec::new(),
            created_at: now,
            updated_at: now,
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
    fn test_new_user_defaults() {
        let user = User::new(UserId::new(1), "alice", "hash", Role::Admin);
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Admin);
        assert!(user.last_login.is_none());
    }

    #[test]
    fn test_new_vehicle_unassigned() {
        let vehicle = Vehicle::new(VehicleId::new(1), VehicleStatus::Pending);
        assert_eq!(vehicle.status, VehicleStatus::Pending);
        assert!(vehicle.assigned_driver.is_none());
    }

    #[test]
    fn test_new_task_assigned_state() {
        let task = Task::new(TaskId::new(9));
        assert_eq!(task.status, TaskStatus::Assigned);
        assert!(task.driver.is_none());
    }

    #[test]
    fn test_maintenance_record_pending() {
        let record = MaintenanceRecord::new(RecordId::new(1), VehicleId::new(2), UserId::new(3));
        assert_eq!(record.status, MaintenanceStatus::Pending);
        assert_eq!(record.vehicle, VehicleId::new(2));
    }
}
