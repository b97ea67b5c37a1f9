// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Seeded application state and request helpers.
//!
//! Every suite runs against the same seeded world:
//!
//! - users (password [`TEST_PASSWORD`]): `admin` (admin), `dan` and `eve`
//!   (drivers), `fae` (fueling), `mel` (maintenance)
//! - vehicles: #1 assigned to dan, #2 assigned to eve, #3 unassigned
//! - tasks: #1 for dan, #2 for eve
//! - one fueling record (vehicle #1, by fae), one maintenance record
//!   (vehicle #1, by mel), one auction listing (vehicle #3)

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use fleet_api::auth::password::hash_password;
use fleet_api::{generate_key, ApiConfig, ApiServer, AppState, TokenConfig};
use fleet_core::{
    AuctionListing, FuelingRecord, ListingId, MaintenanceRecord, RecordId, Role, Task, TaskId,
    User, UserId, Vehicle, VehicleId, VehicleStatus,
};
use fleet_store::MemoryStore;

/// Password shared by every seeded account.
pub const TEST_PASSWORD: &str = "password123";

/// Returns the argon2 hash of [`TEST_PASSWORD`], computed once per process.
fn test_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).expect("hashing test password"))
        .clone()
}

/// Builds an [`AppState`] over a freshly seeded store.
pub async fn seeded_state() -> AppState {
    let store = Arc::new(MemoryStore::new());
    seed(&store).await;

    let config = ApiConfig::default().with_token(TokenConfig::new(generate_key()));
    AppState::builder()
        .config(config)
        .store(store)
        .build()
        .expect("building test state")
}

/// Builds the router over a freshly seeded store.
pub async fn seeded_router() -> (Router, AppState) {
    let state = seeded_state().await;
    let router = ApiServer::new(state.clone()).router();
    (router, state)
}

/// Issues a token for a seeded account.
pub fn token_for(state: &AppState, username: &str, role: Role) -> String {
    state
        .tokens()
        .issue(username, role)
        .expect("issuing test token")
}

async fn seed(store: &MemoryStore) {
    let hash = test_password_hash();

    for (name, role) in [
        ("admin", Role::Admin),
        ("dan", Role::Driver),
        ("eve", Role::Driver),
        ("fae", Role::Fueling),
        ("mel", Role::Maintenance),
    ] {
        store
            .create_user(User::new(UserId::new(0), name, hash.clone(), role))
            .await
            .expect("seeding user");
    }

    // Seeded ids are deterministic: users 1..=5 in the order above
    let dan = UserId::new(2);
    let eve = UserId::new(3);
    let fae = UserId::new(4);
    let mel = UserId::new(5);

    for assigned in [Some(dan), Some(eve), None] {
        let mut vehicle = Vehicle::new(VehicleId::new(0), VehicleStatus::Active);
        vehicle.assigned_driver = assigned;
        store.create_vehicle(vehicle).await.expect("seeding vehicle");
    }

    for driver in [dan, eve] {
        let mut task = Task::new(TaskId::new(0));
        task.driver = Some(driver);
        store.create_task(task).await.expect("seeding task");
    }

    let mut fueling = FuelingRecord::new(RecordId::new(0), VehicleId::new(1), fae);
    fueling.amount = Some(40.0);
    fueling.total_cost = Some(62.5);
    fueling.before_image = Some("/static/before.jpg".into());
    fueling.after_image = Some("/static/after.jpg".into());
    store.create_fueling(fueling).await.expect("seeding fueling");

    let mut maintenance = MaintenanceRecord::new(RecordId::new(0), VehicleId::new(1), mel);
    maintenance.service_type = Some("oil change".into());
    maintenance.total_cost = Some(120.0);
    store
        .create_maintenance(maintenance)
        .await
        .expect("seeding maintenance");

    let mut listing = AuctionListing::new(ListingId::new(0), VehicleId::new(3));
    listing.details = Some("decommissioned van".into());
    store.create_listing(listing).await.expect("seeding listing");
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Sends a request through the router and returns status plus parsed body.
pub async fn send(
    router: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router never fails");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collecting body")
        .to_bytes();

    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// GET with an optional token.
pub async fn get(
    router: &Router,
    path: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    send(router, "GET", path, token, None).await
}

/// POST with a JSON body and an optional token.
pub async fn post_json(
    router: &Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(router, "POST", path, token, Some(body)).await
}

/// PUT with a JSON body and a token.
pub async fn put_json(
    router: &Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(router, "PUT", path, token, Some(body)).await
}

/// DELETE with an optional token.
pub async fn delete(
    router: &Router,
    path: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    send(router, "DELETE", path, token, None).await
}
