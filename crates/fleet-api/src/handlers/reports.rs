// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Report handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use fleet_core::{FuelingRecord, MaintenanceRecord, Vehicle, VehicleId};

use crate::auth::Capability;
use crate::error::ApiResult;
use crate::extractors::{Auth, IdPath};
use crate::state::AppState;

/// A per-vehicle report: the vehicle plus its full service history.
#[derive(Debug, Serialize)]
pub struct VehicleReport {
    /// The vehicle.
    pub vehicle: Vehicle,
    /// All fueling records for the vehicle.
    pub fueling_records: Vec<FuelingRecord>,
    /// All maintenance records for the vehicle.
    pub maintenance_records: Vec<MaintenanceRecord>,
}

/// GET /reports/vehicles/{id}
pub async fn vehicle_report(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::ReportRead)?;

    let vehicle_id = VehicleId::new(id);
    let vehicle = state.store().get_vehicle(vehicle_id).await?;
    let fueling_records = state.store().list_fueling(Some(vehicle_id), None).await;
    let maintenance_records = state.store().list_maintenance(Some(vehicle_id), None).await;

    Ok(Json(VehicleReport {
        vehicle,
        fueling_records,
        maintenance_records,
    }))
}
