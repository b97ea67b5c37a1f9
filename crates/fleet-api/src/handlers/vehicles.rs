// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Vehicle handlers.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::NaiveDate;
use serde::Deserialize;

use fleet_core::audit::{AuditAction, AuditEvent};
use fleet_core::{UserId, Vehicle, VehicleId, VehicleStatus};

use crate::auth::{AccessScope, Capability, Resource};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, IdPath, ValidatedJson};
use crate::state::AppState;

use super::resolve_owner;

// =============================================================================
// Payloads
// =============================================================================

/// Vehicle creation request body.
#[derive(Debug, Default, Deserialize)]
pub struct CreateVehicleRequest {
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
    /// Vehicle type.
    pub vehicle_type: Option<String>,
    /// Color.
    pub color: Option<String>,
    /// Vehicle identification number.
    pub vin: Option<String>,
    /// Current odometer reading.
    pub mileage: Option<u32>,
    /// Date of the last maintenance service.
    pub last_maintenance: Option<NaiveDate>,
    /// Scheduled date of the next maintenance service.
    pub next_maintenance: Option<NaiveDate>,
    /// Driver to assign.
    pub assigned_driver: Option<UserId>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl CreateVehicleRequest {
    fn into_vehicle(self, status: VehicleStatus) -> Vehicle {
        let mut vehicle = Vehicle::new(VehicleId::new(0), status);
        vehicle.make = self.make;
        vehicle.model = self.model;
        vehicle.year = self.year;
        vehicle.license_plate = self.license_plate;
        vehicle.seats = self.seats;
        vehicle.vehicle_type = self.vehicle_type;
        vehicle.color = self.color;
        vehicle.vin = self.vin;
        vehicle.mileage = self.mileage;
        vehicle.last_maintenance = self.last_maintenance;
        vehicle.next_maintenance = self.next_maintenance;
        vehicle.assigned_driver = self.assigned_driver;
        vehicle.notes = self.notes;
        vehicle
    }
}

/// Vehicle update request body. Omitted fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVehicleRequest {
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
    /// Vehicle type.
    pub vehicle_type: Option<String>,
    /// Color.
    pub color: Option<String>,
    /// Vehicle identification number.
    pub vin: Option<String>,
    /// Current odometer reading.
    pub mileage: Option<u32>,
    /// Date of the last maintenance service.
    pub last_maintenance: Option<NaiveDate>,
    /// Scheduled date of the next maintenance service.
    pub next_maintenance: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: Option<VehicleStatus>,
    /// Free-form notes.
    pub notes: Option<String>,
}

// =============================================================================
// Create / Register
// =============================================================================

/// POST /vehicles
///
/// Creates a vehicle directly in the `Active` state.
pub async fn create_vehicle(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::VehicleManage)?;

    let vehicle = state
        .store()
        .create_vehicle(request.into_vehicle(VehicleStatus::Active))
        .await?;

    let audit = state.audit().clone();
    let event = AuditEvent::new(AuditAction::RecordCreated)
        .with_actor(ctx.subject().to_string())
        .with_resource(format!("vehicle/{}", vehicle.id));
    tokio::spawn(async move { audit.record(event).await });

    tracing::info!(vehicle_id = %vehicle.id, actor = %ctx.subject(), "vehicle created");

    Ok(Json(vehicle))
}

/// POST /vehicles/register
///
/// Intake route: any authenticated account may register a vehicle, which
/// enters the fleet as `Pending` until an administrator activates it.
pub async fn register_vehicle(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> ApiResult<impl IntoResponse> {
    let vehicle = state
        .store()
        .create_vehicle(request.into_vehicle(VehicleStatus::Pending))
        .await?;

    tracing::info!(vehicle_id = %vehicle.id, actor = %ctx.subject(), "vehicle registered");

    Ok(Json(vehicle))
}

// =============================================================================
// List / Get
// =============================================================================

/// GET /vehicles
///
/// Drivers receive only vehicles assigned to them; other roles receive the
/// whole fleet.
pub async fn list_vehicles(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::VehicleRead)?;

    let vehicles = match state.policy().scope(&ctx.credential, Resource::Vehicles) {
        AccessScope::Unrestricted => state.store().list_vehicles(None).await,
        AccessScope::OwnedOnly => {
            let owner = resolve_owner(&state, &ctx).await?;
            state.store().list_vehicles(Some(owner)).await
        }
    };

    Ok(Json(vehicles))
}

/// GET /vehicles/{id}
///
/// A driver asking for a vehicle not assigned to them receives 404; the
/// scoped view does not reveal whether the vehicle exists.
pub async fn get_vehicle(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::VehicleRead)?;

    let vehicle = state.store().get_vehicle(VehicleId::new(id)).await?;

    if state
        .policy()
        .scope(&ctx.credential, Resource::Vehicles)
        .is_owned_only()
    {
        let owner = resolve_owner(&state, &ctx).await?;
        if vehicle.assigned_driver != Some(owner) {
            return Err(ApiError::not_found("vehicle"));
        }
    }

    Ok(Json(vehicle))
}

// =============================================================================
// Update / Delete / Activate
// =============================================================================

/// PUT /vehicles/{id}
pub async fn update_vehicle(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateVehicleRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::VehicleManage)?;

    let mut vehicle = state.store().get_vehicle(VehicleId::new(id)).await?;

    if let Some(v) = request.make {
        vehicle.make = Some(v);
    }
    if let Some(v) = request.model {
        vehicle.model = Some(v);
    }
    if let Some(v) = request.year {
        vehicle.year = Some(v);
    }
    if let Some(v) = request.license_plate {
        vehicle.license_plate = Some(v);
    }
    if let Some(v) = request.seats {
        vehicle.seats = Some(v);
    }
    if let Some(v) = request.vehicle_type {
        vehicle.vehicle_type = Some(v);
    }
    if let Some(v) = request.color {
        vehicle.color = Some(v);
    }
    if let Some(v) = request.vin {
        vehicle.vin = Some(v);
    }
    if let Some(v) = request.mileage {
        vehicle.mileage = Some(v);
    }
    if let Some(v) = request.last_maintenance {
        vehicle.last_maintenance = Some(v);
    }
    if let Some(v) = request.next_maintenance {
        vehicle.next_maintenance = Some(v);
    }
    if let Some(v) = request.status {
        vehicle.status = v;
    }
    if let Some(v) = request.notes {
        vehicle.notes = Some(v);
    }

    let vehicle = state.store().update_vehicle(vehicle).await?;

    tracing::info!(vehicle_id = %vehicle.id, actor = %ctx.subject(), "vehicle updated");

    Ok(Json(vehicle))
}

/// DELETE /vehicles/{id}
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::VehicleManage)?;

    state.store().delete_vehicle(VehicleId::new(id)).await?;

    let audit = state.audit().clone();
    let event = AuditEvent::new(AuditAction::RecordDeleted)
        .with_actor(ctx.subject().to_string())
        .with_resource(format!("vehicle/{}", id));
    tokio::spawn(async move { audit.record(event).await });

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// POST /vehicles/{id}/activate
///
/// Moves a pending vehicle into active service.
pub async fn activate_vehicle(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::VehicleManage)?;

    let mut vehicle = state.store().get_vehicle(VehicleId::new(id)).await?;
    vehicle.status = VehicleStatus::Active;
    let vehicle = state.store().update_vehicle(vehicle).await?;

    tracing::info!(vehicle_id = %vehicle.id, actor = %ctx.subject(), "vehicle activated");

    Ok(Json(vehicle))
}

// =============================================================================
// Assignment
// =============================================================================

/// Driver assignment request body.
#[derive(Debug, Deserialize)]
pub struct AssignVehicleRequest {
    /// The vehicle to (un)assign.
    pub vehicle_id: VehicleId,
    /// The driver receiving the vehicle; ignored for unassignment.
    pub user_id: Option<UserId>,
}

/// POST /vehicles/assign
pub async fn assign_vehicle(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(request): ValidatedJson<AssignVehicleRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::VehicleAssign)?;

    let user_id = request
        .user_id
        .ok_or_else(|| ApiError::validation("user_id is required"))?;

    let vehicle = state.store().assign_vehicle(request.vehicle_id, user_id).await?;

    tracing::info!(
        vehicle_id = %vehicle.id,
        driver_id = %user_id,
        actor = %ctx.subject(),
        "vehicle assigned"
    );

    Ok(Json(vehicle))
}

/// POST /vehicles/unassign
pub async fn unassign_vehicle(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(request): ValidatedJson<AssignVehicleRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::VehicleAssign)?;

    let vehicle = state.store().unassign_vehicle(request.vehicle_id).await?;

    tracing::info!(vehicle_id = %vehicle.id, actor = %ctx.subject(), "vehicle unassigned");

    Ok(Json(vehicle))
}
