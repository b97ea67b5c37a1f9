// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory resource store.
//!
//! Tables are `RwLock`-guarded maps keyed by numeric id; identifiers are
//! allocated from atomic counters so concurrent creates never collide. List
//! operations accept narrowing predicates (owner, vehicle) because the
//! handlers scope queries by ownership before touching the table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use fleet_core::{
    AuctionListing, FuelingRecord, ListingId, MaintenanceRecord, RecordId, StoreError,
    StoreResult, Task, TaskId, User, UserId, Vehicle, VehicleId,
};

use crate::directory::UserDirectory;

// =============================================================================
// MemoryStore
// =============================================================================

/// Async in-memory store holding every resource table.
///
/// Creation methods allocate the record identifier themselves; the id on the
/// supplied record is replaced.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<u64, User>>,
    vehicles: RwLock<HashMap<u64, Vehicle>>,
    tasks: RwLock<HashMap<u64, Task>>,
    maintenance: RwLock<HashMap<u64, MaintenanceRecord>>,
    fueling: RwLock<HashMap<u64, FuelingRecord>>,
    auctions: RwLock<HashMap<u64, AuctionListing>>,
    next_user_id: AtomicU64,
    next_vehicle_id: AtomicU64,
    next_task_id: AtomicU64,
    next_record_id: AtomicU64,
    next_listing_id: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            vehicles: RwLock::new(HashMap::new()),
            tasks: RwLock::new(HashMap::new()),
            maintenance: RwLock::new(HashMap::new()),
            fueling: RwLock::new(HashMap::new()),
            auctions: RwLock::new(HashMap::new()),
            next_user_id: AtomicU64::new(1),
            next_vehicle_id: AtomicU64::new(1),
            next_task_id: AtomicU64::new(1),
            next_record_id: AtomicU64::new(1),
            next_listing_id: AtomicU64::new(1),
        }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Creates a user, allocating its identifier.
    ///
    /// Fails with [`StoreError::Conflict`] when the username is taken.
    pub async fn create_user(&self, mut user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::conflict(format!(
                "username '{}' is already taken",
                user.username
            )));
        }
        let id = self.next_user_id.fetch_add(1, Ordering::Relaxed);
        user.id = UserId::new(id);
        users.insert(id, user.clone());
        Ok(user)
    }

    /// Returns the user with the given id.
    pub async fn get_user(&self, id: UserId) -> StoreResult<User> {
        self.users
            .read()
            .await
            .get(&id.value())
            .cloned()
            .ok_or_else(|| StoreError::not_found("user"))
    }

    /// Returns the user with the given username.
    pub async fn get_user_by_username(&self, username: &str) -> StoreResult<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| StoreError::not_found("user"))
    }

    /// Returns all users, ordered by id.
    pub async fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }

    /// Replaces an existing user record.
    ///
    /// Fails with [`StoreError::Conflict`] when the new username collides
    /// with another account.
    pub async fn update_user(&self, mut user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id.value()) {
            return Err(StoreError::not_found("user"));
        }
        if users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(StoreError::conflict(format!(
                "username '{}' is already taken",
                user.username
            )));
        }
        user.updated_at = Utc::now();
        users.insert(user.id.value(), user.clone());
        Ok(user)
    }

    /// Deletes a user.
    pub async fn delete_user(&self, id: UserId) -> StoreResult<()> {
        self.users
            .write()
            .await
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("user"))
    }

    /// Records a successful login time.
    pub async fn touch_last_login(&self, id: UserId) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id.value())
            .ok_or_else(|| StoreError::not_found("user"))?;
        user.last_login = Some(Utc::now());
        Ok(())
    }

    // =========================================================================
    // Vehicles
    // =========================================================================

    /// Creates a vehicle, allocating its identifier.
    pub async fn create_vehicle(&self, mut vehicle: Vehicle) -> StoreResult<Vehicle> {
        let id = self.next_vehicle_id.fetch_add(1, Ordering::Relaxed);
        vehicle.id = VehicleId::new(id);
        self.vehicles.write().await.insert(id, vehicle.clone());
        Ok(vehicle)
    }

    /// Returns the vehicle with the given id.
    pub async fn get_vehicle(&self, id: VehicleId) -> StoreResult<Vehicle> {
        self.vehicles
            .read()
            .await
            .get(&id.value())
            .cloned()
            .ok_or_else(|| StoreError::not_found("vehicle"))
    }

    /// Returns vehicles, optionally narrowed to one assigned driver.
    pub async fn list_vehicles(&self, assigned_to: Option<UserId>) -> Vec<Vehicle> {
        let mut vehicles: Vec<Vehicle> = self
            .vehicles
            .read()
            .await
            .values()
            .filter(|v| match assigned_to {
                Some(driver) => v.assigned_driver == Some(driver),
                None => true,
            })
            .cloned()
            .collect();
        vehicles.sort_by_key(|v| v.id);
        vehicles
    }

    /// Replaces an existing vehicle record.
    pub async fn update_vehicle(&self, mut vehicle: Vehicle) -> StoreResult<Vehicle> {
        let mut vehicles = self.vehicles.write().await;
        if !vehicles.contains_key(&vehicle.id.value()) {
            return Err(StoreError::not_found("vehicle"));
        }
        vehicle.updated_at = Utc::now();
        vehicles.insert(vehicle.id.value(), vehicle.clone());
        Ok(vehicle)
    }

    /// Deletes a vehicle.
    pub async fn delete_vehicle(&self, id: VehicleId) -> StoreResult<()> {
        self.vehicles
            .write()
            .await
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("vehicle"))
    }

    /// Assigns a vehicle to a driver.
    ///
    /// Fails with [`StoreError::Conflict`] when the vehicle already has a
    /// driver, and with [`StoreError::NotFound`] when either side is missing.
    pub async fn assign_vehicle(
        &self,
        vehicle_id: VehicleId,
        driver: UserId,
    ) -> StoreResult<Vehicle> {
        if !self.users.read().await.contains_key(&driver.value()) {
            return Err(StoreError::not_found("user"));
        }
        let mut vehicles = self.vehicles.write().await;
        let vehicle = vehicles
            .get_mut(&vehicle_id.value())
            .ok_or_else(|| StoreError::not_found("vehicle"))?;
        if vehicle.assigned_driver.is_some() {
            return Err(StoreError::conflict("vehicle is already assigned to a driver"));
        }
        vehicle.assigned_driver = Some(driver);
        vehicle.updated_at = Utc::now();
        Ok(vehicle.clone())
    }

    /// Removes the driver assignment from a vehicle.
    ///
    /// Fails with [`StoreError::Conflict`] when the vehicle has no driver.
    pub async fn unassign_vehicle(&self, vehicle_id: VehicleId) -> StoreResult<Vehicle> {
        let mut vehicles = self.vehicles.write().await;
        let vehicle = vehicles
            .get_mut(&vehicle_id.value())
            .ok_or_else(|| StoreError::not_found("vehicle"))?;
        if vehicle.assigned_driver.is_none() {
            return Err(StoreError::conflict("vehicle is not assigned to a driver"));
        }
        vehicle.assigned_driver = None;
        vehicle.updated_at = Utc::now();
        Ok(vehicle.clone())
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Creates a task, allocating its identifier.
    pub async fn create_task(&self, mut task: Task) -> StoreResult<Task> {
        let id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        task.id = TaskId::new(id);
        self.tasks.write().await.insert(id, task.clone());
        Ok(task)
    }

    /// Returns the task with the given id.
    pub async fn get_task(&self, id: TaskId) -> StoreResult<Task> {
        self.tasks
            .read()
            .await
            .get(&id.value())
            .cloned()
            .ok_or_else(|| StoreError::not_found("task"))
    }

    /// Returns tasks, optionally narrowed to one driver.
    pub async fn list_tasks(&self, driver: Option<UserId>) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| match driver {
                Some(d) => t.driver == Some(d),
                None => true,
            })
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.id);
        tasks
    }

    /// Replaces an existing task record.
    pub async fn update_task(&self, mut task: Task) -> StoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        if !tasks.contains_key(&task.id.value()) {
            return Err(StoreError::not_found("task"));
        }
        task.updated_at = Utc::now();
        tasks.insert(task.id.value(), task.clone());
        Ok(task)
    }

    /// Deletes a task.
    pub async fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.tasks
            .write()
            .await
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("task"))
    }

    // =========================================================================
    // Maintenance Records
    // =========================================================================

    /// Creates a maintenance record, allocating its identifier.
    pub async fn create_maintenance(
        &self,
        mut record: MaintenanceRecord,
    ) -> StoreResult<MaintenanceRecord> {
        if !self
            .vehicles
            .read()
            .await
            .contains_key(&record.vehicle.value())
        {
            return Err(StoreError::not_found("vehicle"));
        }
        let id = self.next_record_id.fetch_add(1, Ordering::Relaxed);
        record.id = RecordId::new(id);
        self.maintenance.write().await.insert(id, record.clone());
        Ok(record)
    }

    /// Returns the maintenance record with the given id.
    pub async fn get_maintenance(&self, id: RecordId) -> StoreResult<MaintenanceRecord> {
        self.maintenance
            .read()
            .await
            .get(&id.value())
            .cloned()
            .ok_or_else(|| StoreError::not_found("maintenance record"))
    }

    /// Returns maintenance records, optionally narrowed by vehicle or
    /// mechanic.
    pub async fn list_maintenance(
        &self,
        vehicle: Option<VehicleId>,
        mechanic: Option<UserId>,
    ) -> Vec<MaintenanceRecord> {
        let mut records: Vec<MaintenanceRecord> = self
            .maintenance
            .read()
            .await
            .values()
            .filter(|r| vehicle.is_none_or(|v| r.vehicle == v))
            .filter(|r| mechanic.is_none_or(|m| r.mechanic == m))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Replaces an existing maintenance record.
    pub async fn update_maintenance(
        &self,
        mut record: MaintenanceRecord,
    ) -> StoreResult<MaintenanceRecord> {
        let mut records = self.maintenance.write().await;
        if !records.contains_key(&record.id.value()) {
            return Err(StoreError::not_found("maintenance record"));
        }
        record.updated_at = Utc::now();
        records.insert(record.id.value(), record.clone());
        Ok(record)
    }

    /// Deletes a maintenance record.
    pub async fn delete_maintenance(&self, id: RecordId) -> StoreResult<()> {
        self.maintenance
            .write()
            .await
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("maintenance record"))
    }

    // =========================================================================
    // Fueling Records
    // =========================================================================

    /// Creates a fueling record, allocating its identifier.
    pub async fn create_fueling(&self, mut record: FuelingRecord) -> StoreResult<FuelingRecord> {
        if !self
            .vehicles
            .read()
            .await
            .contains_key(&record.vehicle.value())
        {
            return Err(StoreError::not_found("vehicle"));
        }
        let id = self.next_record_id.fetch_add(1, Ordering::Relaxed);
        record.id = RecordId::new(id);
        self.fueling.write().await.insert(id, record.clone());
        Ok(record)
    }

    /// Returns the fueling record with the given id.
    pub async fn get_fueling(&self, id: RecordId) -> StoreResult<FuelingRecord> {
        self.fueling
            .read()
            .await
            .get(&id.value())
            .cloned()
            .ok_or_else(|| StoreError::not_found("fueling record"))
    }

    /// Returns fueling records, optionally narrowed by vehicle or attendant.
    pub async fn list_fueling(
        &self,
        vehicle: Option<VehicleId>,
        attendant: Option<UserId>,
    ) -> Vec<FuelingRecord> {
        let mut records: Vec<FuelingRecord> = self
            .fueling
            .read()
            .await
            .values()
            .filter(|r| vehicle.is_none_or(|v| r.vehicle == v))
            .filter(|r| attendant.is_none_or(|a| r.attendant == a))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Deletes a fueling record.
    pub async fn delete_fueling(&self, id: RecordId) -> StoreResult<()> {
        self.fueling
            .write()
            .await
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("fueling record"))
    }

    // =========================================================================
    // Auction Listings
    // =========================================================================

    /// Creates an auction listing, allocating its identifier.
    pub async fn create_listing(&self, mut listing: AuctionListing) -> StoreResult<AuctionListing> {
        if !self
            .vehicles
            .read()
            .await
            .contains_key(&listing.vehicle.value())
        {
            return Err(StoreError::not_found("vehicle"));
        }
        let id = self.next_listing_id.fetch_add(1, Ordering::Relaxed);
        listing.id = ListingId::new(id);
        self.auctions.write().await.insert(id, listing.clone());
        Ok(listing)
    }

    /// Returns the listing with the given id.
    pub async fn get_listing(&self, id: ListingId) -> StoreResult<AuctionListing> {
        self.auctions
            .read()
            .await
            .get(&id.value())
            .cloned()
            .ok_or_else(|| StoreError::not_found("auction listing"))
    }

    /// Returns all listings, ordered by id.
    pub async fn list_listings(&self) -> Vec<AuctionListing> {
        let mut listings: Vec<AuctionListing> =
            self.auctions.read().await.values().cloned().collect();
        listings.sort_by_key(|l| l.id);
        listings
    }

    /// Deletes a listing.
    pub async fn delete_listing(&self, id: ListingId) -> StoreResult<()> {
        self.auctions
            .write()
            .await
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("auction listing"))
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn resolve_user_id(&self, username: &str) -> Result<UserId, StoreError> {
        self.get_user_by_username(username).await.map(|u| u.id)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::{Role, VehicleStatus};

    fn user(name: &str, role: Role) -> User {
        User::new(UserId::new(0), name, "hash", role)
    }

    #[tokio::test]
    async fn test_create_user_allocates_ids() {
        let store = MemoryStore::new();
        let a = store.create_user(user("alice", Role::Admin)).await.unwrap();
        let b = store.create_user(user("bob", Role::Driver)).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list_users().await.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.create_user(user("alice", Role::Admin)).await.unwrap();
        let err = store.create_user(user("alice", Role::Driver)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_user_username_collision() {
        let store = MemoryStore::new();
        store.create_user(user("alice", Role::Admin)).await.unwrap();
        let mut bob = store.create_user(user("bob", Role::Driver)).await.unwrap();
        bob.username = "alice".to_string();
        let err = store.update_user(bob).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_resolve_user_id() {
        let store = MemoryStore::new();
        let alice = store.create_user(user("alice", Role::Driver)).await.unwrap();
        assert_eq!(store.resolve_user_id("alice").await.unwrap(), alice.id);
        assert!(store.resolve_user_id("nobody").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_vehicle_assignment_cycle() {
        let store = MemoryStore::new();
        let driver = store.create_user(user("dan", Role::Driver)).await.unwrap();
        let vehicle = store
            .create_vehicle(Vehicle::new(VehicleId::new(0), VehicleStatus::Active))
            .await
            .unwrap();

        let assigned = store.assign_vehicle(vehicle.id, driver.id).await.unwrap();
        assert_eq!(assigned.assigned_driver, Some(driver.id));

        // Second assignment conflicts
        let err = store.assign_vehicle(vehicle.id, driver.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));

        let unassigned = store.unassign_vehicle(vehicle.id).await.unwrap();
        assert!(unassigned.assigned_driver.is_none());

        let err = store.unassign_vehicle(vehicle.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_list_vehicles_scoped_by_driver() {
        let store = MemoryStore::new();
        let dan = store.create_user(user("dan", Role::Driver)).await.unwrap();
        let eve = store.create_user(user("eve", Role::Driver)).await.unwrap();

        let v1 = store
            .create_vehicle(Vehicle::new(VehicleId::new(0), VehicleStatus::Active))
            .await
            .unwrap();
        let v2 = store
            .create_vehicle(Vehicle::new(VehicleId::new(0), VehicleStatus::Active))
            .await
            .unwrap();
        store.assign_vehicle(v1.id, dan.id).await.unwrap();
        store.assign_vehicle(v2.id, eve.id).await.unwrap();

        let mine = store.list_vehicles(Some(dan.id)).await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, v1.id);

        assert_eq!(store.list_vehicles(None).await.len(), 2);
    }

    #[tokio::test]
    async fn test_list_tasks_scoped_by_driver() {
        let store = MemoryStore::new();
        let dan = store.create_user(user("dan", Role::Driver)).await.unwrap();

        let mut t1 = Task::new(TaskId::new(0));
        t1.driver = Some(dan.id);
        store.create_task(t1).await.unwrap();
        store.create_task(Task::new(TaskId::new(0))).await.unwrap();

        assert_eq!(store.list_tasks(Some(dan.id)).await.len(), 1);
        assert_eq!(store.list_tasks(None).await.len(), 2);
    }

    #[tokio::test]
    async fn test_records_require_vehicle() {
        let store = MemoryStore::new();
        let mech = store.create_user(user("mel", Role::Maintenance)).await.unwrap();

        let err = store
            .create_maintenance(MaintenanceRecord::new(
                RecordId::new(0),
                VehicleId::new(99),
                mech.id,
            ))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let vehicle = store
            .create_vehicle(Vehicle::new(VehicleId::new(0), VehicleStatus::Active))
            .await
            .unwrap();
        let record = store
            .create_maintenance(MaintenanceRecord::new(RecordId::new(0), vehicle.id, mech.id))
            .await
            .unwrap();

        let by_vehicle = store.list_maintenance(Some(vehicle.id), None).await;
        assert_eq!(by_vehicle.len(), 1);
        assert_eq!(by_vehicle[0].id, record.id);

        let by_mechanic = store.list_maintenance(None, Some(mech.id)).await;
        assert_eq!(by_mechanic.len(), 1);
    }

    #[tokio::test]
    async fn test_fueling_filters() {
        let store = MemoryStore::new();
        let fae = store.create_user(user("fae", Role::Fueling)).await.unwrap();
        let vehicle = store
            .create_vehicle(Vehicle::new(VehicleId::new(0), VehicleStatus::Active))
            .await
            .unwrap();

        store
            .create_fueling(FuelingRecord::new(RecordId::new(0), vehicle.id, fae.id))
            .await
            .unwrap();

        assert_eq!(store.list_fueling(Some(vehicle.id), None).await.len(), 1);
        assert_eq!(store.list_fueling(None, Some(fae.id)).await.len(), 1);
        assert_eq!(
            store.list_fueling(None, Some(UserId::new(999))).await.len(),
            0
        );
    }

    #[tokio::test]
    async fn test_listing_lifecycle() {
        let store = MemoryStore::new();
        let vehicle = store
            .create_vehicle(Vehicle::new(VehicleId::new(0), VehicleStatus::Inactive))
            .await
            .unwrap();

        let listing = store
            .create_listing(AuctionListing::new(ListingId::new(0), vehicle.id))
            .await
            .unwrap();
        assert_eq!(store.list_listings().await.len(), 1);

        store.delete_listing(listing.id).await.unwrap();
        assert!(store.get_listing(listing.id).await.unwrap_err().is_not_found());
    }
}
