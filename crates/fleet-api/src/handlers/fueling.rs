// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Fueling record handlers.
//!
//! Image fields carry opaque URL references supplied by the client; file
//! transport lives outside this service.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use fleet_core::{FuelingRecord, RecordId, UserId, VehicleId};

use crate::auth::Capability;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, IdPath, ValidatedJson};
use crate::state::AppState;

// =============================================================================
// Payloads
// =============================================================================

/// Fueling record creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateFuelingRequest {
    /// Fueled vehicle.
    pub vehicle_id: VehicleId,
    /// Fueling person who performed the fueling.
    pub attendant_id: UserId,
    /// Amount of fuel in liters.
    pub amount: f64,
    /// Total cost.
    pub total_cost: f64,
    /// Gas station name.
    pub station: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Image reference taken before fueling.
    pub before_image: String,
    /// Image reference taken after fueling.
    pub after_image: String,
}

// =============================================================================
// Create
// =============================================================================

/// POST /fueling
///
/// Both administrators and fueling personnel hold `fueling:manage` and may
/// create fueling records.
pub async fn create_fueling(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(request): ValidatedJson<CreateFuelingRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::FuelingManage)?;

    if request.amount <= 0.0 {
        return Err(ApiError::validation("amount must be positive"));
    }
    if request.total_cost < 0.0 {
        return Err(ApiError::validation("total_cost must not be negative"));
    }
    if request.before_image.is_empty() || request.after_image.is_empty() {
        return Err(ApiError::validation(
            "before_image and after_image are required",
        ));
    }

    let mut record = FuelingRecord::new(RecordId::new(0), request.vehicle_id, request.attendant_id);
    record.amount = Some(request.amount);
    record.total_cost = Some(request.total_cost);
    record.station = request.station;
    record.notes = request.notes;
    record.before_image = Some(request.before_image);
    record.after_image = Some(request.after_image);

    let record = state.store().create_fueling(record).await?;

    tracing::info!(record_id = %record.id, actor = %ctx.subject(), "fueling record created");

    Ok(Json(record))
}

// =============================================================================
// List / Get
// =============================================================================

/// GET /fueling
pub async fn list_fueling(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::FuelingRead)?;

    Ok(Json(state.store().list_fueling(None, None).await))
}

/// GET /fueling/{id}
pub async fn get_fueling(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::FuelingRead)?;

    let record = state.store().get_fueling(RecordId::new(id)).await?;
    Ok(Json(record))
}

/// GET /vehicles/{id}/fueling
pub async fn list_vehicle_fueling(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::FuelingRead)?;

    let records = state
        .store()
        .list_fueling(Some(VehicleId::new(id)), None)
        .await;
    Ok(Json(records))
}

/// GET /users/{id}/fueling
pub async fn list_user_fueling(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::FuelingRead)?;

    let records = state.store().list_fueling(None, Some(UserId::new(id))).await;
    Ok(Json(records))
}

// =============================================================================
// Delete
// =============================================================================

/// DELETE /fueling/{id}
pub async fn delete_fueling(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::FuelingManage)?;

    state.store().delete_fueling(RecordId::new(id)).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
