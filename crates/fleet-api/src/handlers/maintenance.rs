// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Maintenance record handlers.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::NaiveDate;
use serde::Deserialize;

use fleet_core::{MaintenanceRecord, MaintenanceStatus, RecordId, UserId, VehicleId};

use crate::auth::Capability;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, IdPath, ValidatedJson};
use crate::state::AppState;

// =============================================================================
// Payloads
// =============================================================================

/// Maintenance record creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateMaintenanceRequest {
    /// Serviced vehicle.
    pub vehicle_id: VehicleId,
    /// Maintenance person who performed the service.
    pub mechanic_id: UserId,
    /// Service date.
    pub date: Option<NaiveDate>,
    /// Type of service performed.
    pub service_type: Option<String>,
    /// Record status.
    pub status: Option<MaintenanceStatus>,
    /// Total cost of the service.
    pub total_cost: Option<f64>,
    /// Odometer reading at service time.
    pub mileage_at_service: Option<u32>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Maintenance record update request body. Omitted fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMaintenanceRequest {
    /// Service date.
    pub date: Option<NaiveDate>,
    /// Type of service performed.
    pub service_type: Option<String>,
    /// Record status.
    pub status: Option<MaintenanceStatus>,
    /// Total cost of the service.
    pub total_cost: Option<f64>,
    /// Odometer reading at service time.
    pub mileage_at_service: Option<u32>,
    /// Free-form notes.
    pub notes: Option<String>,
}

// =============================================================================
// Create
// =============================================================================

/// POST /maintenance
pub async fn create_maintenance(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(request): ValidatedJson<CreateMaintenanceRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::MaintenanceManage)?;

    if request.total_cost.is_some_and(|c| c < 0.0) {
        return Err(ApiError::validation("total_cost must not be negative"));
    }

    let mut record =
        MaintenanceRecord::new(RecordId::new(0), request.vehicle_id, request.mechanic_id);
    record.date = request.date;
    record.service_type = request.service_type;
    if let Some(status) = request.status {
        record.status = status;
    }
    record.total_cost = request.total_cost;
    record.mileage_at_service = request.mileage_at_service;
    record.notes = request.notes;

    let record = state.store().create_maintenance(record).await?;

    tracing::info!(record_id = %record.id, actor = %ctx.subject(), "maintenance record created");

    Ok(Json(record))
}

// =============================================================================
// List / Get
// =============================================================================

/// GET /maintenance
pub async fn list_maintenance(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::MaintenanceRead)?;

    Ok(Json(state.store().list_maintenance(None, None).await))
}

/// GET /maintenance/{id}
pub async fn get_maintenance(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::MaintenanceRead)?;

    let record = state.store().get_maintenance(RecordId::new(id)).await?;
    Ok(Json(record))
}

/// GET /vehicles/{id}/maintenance
pub async fn list_vehicle_maintenance(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::MaintenanceRead)?;

    let records = state
        .store()
        .list_maintenance(Some(VehicleId::new(id)), None)
        .await;
    Ok(Json(records))
}

/// GET /users/{id}/maintenance
pub async fn list_user_maintenance(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::MaintenanceRead)?;

    let records = state
        .store()
        .list_maintenance(None, Some(UserId::new(id)))
        .await;
    Ok(Json(records))
}

// =============================================================================
// Update / Delete
// =============================================================================

/// PUT /maintenance/{id}
pub async fn update_maintenance(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateMaintenanceRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::MaintenanceManage)?;

    if request.total_cost.is_some_and(|c| c < 0.0) {
        return Err(ApiError::validation("total_cost must not be negative"));
    }

    let mut record = state.store().get_maintenance(RecordId::new(id)).await?;

    if let Some(v) = request.date {
        record.date = Some(v);
    }
    if let Some(v) = request.service_type {
        record.service_type = Some(v);
    }
    if let Some(v) = request.status {
        record.status = v;
    }
    if let Some(v) = request.total_cost {
        record.total_cost = Some(v);
    }
    if let Some(v) = request.mileage_at_service {
        record.mileage_at_service = Some(v);
    }
    if let Some(v) = request.notes {
        record.notes = Some(v);
    }

    let record = state.store().update_maintenance(record).await?;

    tracing::info!(record_id = %record.id, actor = %ctx.subject(), "maintenance record updated");

    Ok(Json(record))
}

/// DELETE /maintenance/{id}
pub async fn delete_maintenance(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::MaintenanceManage)?;

    state.store().delete_maintenance(RecordId::new(id)).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
