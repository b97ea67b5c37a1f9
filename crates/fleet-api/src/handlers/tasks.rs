// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Driving task handlers.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use fleet_core::{Task, TaskId, TaskStatus, UserId};

use crate::auth::{AccessScope, Capability, Resource};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, IdPath, ValidatedJson};
use crate::state::AppState;

use super::resolve_owner;

// =============================================================================
// Payloads
// =============================================================================

/// Task creation request body.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    /// Driver the task is assigned to.
    pub driver_id: Option<UserId>,
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
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Task update request body. Omitted fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// Driver the task is assigned to.
    pub driver_id: Option<UserId>,
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
    pub status: Option<TaskStatus>,
    /// Free-form notes.
    pub notes: Option<String>,
}

// =============================================================================
// Create
// =============================================================================

/// POST /tasks
pub async fn create_task(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(request): ValidatedJson<CreateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::TaskManage)?;

    let mut task = Task::new(TaskId::new(0));
    task.driver = request.driver_id;
    task.start_latitude = request.start_latitude;
    task.start_longitude = request.start_longitude;
    task.end_latitude = request.end_latitude;
    task.end_longitude = request.end_longitude;
    task.start_time = request.start_time;
    task.end_time = request.end_time;
    task.notes = request.notes;

    let task = state.store().create_task(task).await?;

    tracing::info!(task_id = %task.id, actor = %ctx.subject(), "task created");

    Ok(Json(task))
}

// =============================================================================
// List / Get
// =============================================================================

/// GET /tasks
///
/// Drivers receive only tasks assigned to them.
pub async fn list_tasks(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::TaskRead)?;

    let tasks = match state.policy().scope(&ctx.credential, Resource::Tasks) {
        AccessScope::Unrestricted => state.store().list_tasks(None).await,
        AccessScope::OwnedOnly => {
            let owner = resolve_owner(&state, &ctx).await?;
            state.store().list_tasks(Some(owner)).await
        }
    };

    Ok(Json(tasks))
}

/// GET /tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::TaskRead)?;

    let task = state.store().get_task(TaskId::new(id)).await?;

    if state
        .policy()
        .scope(&ctx.credential, Resource::Tasks)
        .is_owned_only()
    {
        let owner = resolve_owner(&state, &ctx).await?;
        if task.driver != Some(owner) {
            return Err(ApiError::not_found("task"));
        }
    }

    Ok(Json(task))
}

// =============================================================================
// Update
// =============================================================================

/// PUT /tasks/{id}
///
/// Two distinct flows share this route: accounts with `task:manage` perform
/// a per-field merge, while drivers holding only `task:complete` may do one
/// thing, mark a task assigned to them as completed. The ownership check
/// compares resolved numeric ids.
pub async fn update_task(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateTaskRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize_any(&ctx.credential, &[Capability::TaskManage, Capability::TaskComplete])?;

    let mut task = state.store().get_task(TaskId::new(id)).await?;

    if !state
        .policy()
        .has_capability(ctx.role(), Capability::TaskManage)
    {
        let owner = resolve_owner(&state, &ctx).await?;
        if task.driver != Some(owner) {
            return Err(ApiError::not_found("task"));
        }
        task.status = TaskStatus::Completed;
        let task = state.store().update_task(task).await?;
        tracing::info!(task_id = %task.id, driver = %ctx.subject(), "task completed");
        return Ok(Json(task));
    }

    if let Some(v) = request.driver_id {
        task.driver = Some(v);
    }
    if let Some(v) = request.start_latitude {
        task.start_latitude = Some(v);
    }
    if let Some(v) = request.start_longitude {
        task.start_longitude = Some(v);
    }
    if let Some(v) = request.end_latitude {
        task.end_latitude = Some(v);
    }
    if let Some(v) = request.end_longitude {
        task.end_longitude = Some(v);
    }
    if let Some(v) = request.start_time {
        task.start_time = Some(v);
    }
    if let Some(v) = request.end_time {
        task.end_time = Some(v);
    }
    if let Some(v) = request.status {
        task.status = v;
    }
    if let Some(v) = request.notes {
        task.notes = Some(v);
    }

    let task = state.store().update_task(task).await?;

    tracing::info!(task_id = %task.id, actor = %ctx.subject(), "task updated");

    Ok(Json(task))
}

// =============================================================================
// Delete
// =============================================================================

/// DELETE /tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::TaskManage)?;

    state.store().delete_task(TaskId::new(id)).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
