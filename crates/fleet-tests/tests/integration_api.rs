// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # API Integration Tests
//!
//! End-to-end tests for role authorization and ownership scoping:
//!
//! - `test_vehicle_*`: vehicle CRUD, activation, assignment
//! - `test_task_*`: task CRUD and driver completion
//! - `test_user_*`: registration, profile scoping, management
//! - `test_record_*`: fueling and maintenance records
//! - `test_auction_*`: public browsing vs gated management
//! - `test_report_*`: per-vehicle reports

use axum::http::StatusCode;

use fleet_core::Role;
use fleet_tests::common::{
    delete, get, post_json, put_json, seeded_router, token_for, TEST_PASSWORD,
};

// =============================================================================
// Vehicles
// =============================================================================

#[tokio::test]
async fn test_vehicle_list_is_scoped_for_drivers() {
    let (router, state) = seeded_router().await;

    // The admin sees the whole fleet
    let admin = token_for(&state, "admin", Role::Admin);
    let (status, body) = get(&router, "/vehicles", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    // A driver sees only their own vehicle
    let dan = token_for(&state, "dan", Role::Driver);
    let (status, body) = get(&router, "/vehicles", Some(&dan)).await;
    assert_eq!(status, StatusCode::OK);
    let vehicles = body.as_array().unwrap();
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0]["id"], 1);
}

#[tokio::test]
async fn test_vehicle_get_hides_other_drivers_vehicle() {
    let (router, state) = seeded_router().await;
    let dan = token_for(&state, "dan", Role::Driver);

    // Own vehicle: visible
    let (status, _body) = get(&router, "/vehicles/1", Some(&dan)).await;
    assert_eq!(status, StatusCode::OK);

    // Eve's vehicle: a 404, not a 403 - the scoped view does not reveal
    // whether the vehicle exists
    let (status, _body) = get(&router, "/vehicles/2", Some(&dan)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_vehicle_fueling_role_sees_whole_fleet() {
    let (router, state) = seeded_router().await;
    let fae = token_for(&state, "fae", Role::Fueling);

    let (status, body) = get(&router, "/vehicles", Some(&fae)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_vehicle_create_requires_manage() {
    let (router, state) = seeded_router().await;

    let payload = serde_json::json!({ "make": "Ford", "model": "Transit" });

    let dan = token_for(&state, "dan", Role::Driver);
    let (status, _body) = post_json(&router, "/vehicles", Some(&dan), payload.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token_for(&state, "admin", Role::Admin);
    let (status, body) = post_json(&router, "/vehicles", Some(&admin), payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["make"], "Ford");
}

#[tokio::test]
async fn test_vehicle_register_enters_pending_and_needs_activation() {
    let (router, state) = seeded_router().await;

    // Any authenticated account may register
    let dan = token_for(&state, "dan", Role::Driver);
    let (status, body) = post_json(
        &router,
        "/vehicles/register",
        Some(&dan),
        serde_json::json!({ "make": "Toyota", "model": "HiAce" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    let id = body["id"].as_u64().unwrap();

    // Activation is gated
    let (status, _body) = post_json(
        &router,
        &format!("/vehicles/{}/activate", id),
        Some(&dan),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token_for(&state, "admin", Role::Admin);
    let (status, body) = post_json(
        &router,
        &format!("/vehicles/{}/activate", id),
        Some(&admin),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn test_vehicle_update_merges_only_provided_fields() {
    let (router, state) = seeded_router().await;
    let admin = token_for(&state, "admin", Role::Admin);

    let (status, body) = post_json(
        &router,
        "/vehicles",
        Some(&admin),
        serde_json::json!({ "make": "Ford", "color": "white" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_u64().unwrap();

    let (status, body) = put_json(
        &router,
        &format!("/vehicles/{}", id),
        Some(&admin),
        serde_json::json!({ "color": "blue" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["color"], "blue");
    // Omitted fields are untouched
    assert_eq!(body["make"], "Ford");
}

#[tokio::test]
async fn test_vehicle_assignment_conflicts() {
    let (router, state) = seeded_router().await;
    let admin = token_for(&state, "admin", Role::Admin);

    // Vehicle 1 already belongs to dan
    let (status, body) = post_json(
        &router,
        "/vehicles/assign",
        Some(&admin),
        serde_json::json!({ "vehicle_id": 1, "user_id": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    // Vehicle 3 is free
    let (status, body) = post_json(
        &router,
        "/vehicles/assign",
        Some(&admin),
        serde_json::json!({ "vehicle_id": 3, "user_id": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assigned_driver"], 3);

    // Unassigning twice conflicts
    let (status, _body) = post_json(
        &router,
        "/vehicles/unassign",
        Some(&admin),
        serde_json::json!({ "vehicle_id": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _body) = post_json(
        &router,
        "/vehicles/unassign",
        Some(&admin),
        serde_json::json!({ "vehicle_id": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// =============================================================================
// Tasks
// =============================================================================

#[tokio::test]
async fn test_task_list_is_scoped_for_drivers() {
    let (router, state) = seeded_router().await;

    let admin = token_for(&state, "admin", Role::Admin);
    let (status, body) = get(&router, "/tasks", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let dan = token_for(&state, "dan", Role::Driver);
    let (status, body) = get(&router, "/tasks", Some(&dan)).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["driver"], 2);
}

#[tokio::test]
async fn test_task_get_denies_other_drivers_task() {
    let (router, state) = seeded_router().await;
    let dan = token_for(&state, "dan", Role::Driver);

    // Own task (seeded task #1 belongs to dan)
    let (status, _body) = get(&router, "/tasks/1", Some(&dan)).await;
    assert_eq!(status, StatusCode::OK);

    // Eve's task
    let (status, _body) = get(&router, "/tasks/2", Some(&dan)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_driver_completes_own_task_only() {
    let (router, state) = seeded_router().await;
    let dan = token_for(&state, "dan", Role::Driver);

    // Completing the own task works regardless of the payload
    let (status, body) = put_json(
        &router,
        "/tasks/1",
        Some(&dan),
        serde_json::json!({ "notes": "ignored for drivers" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    // Another driver's task is invisible
    let (status, _body) =
        put_json(&router, "/tasks/2", Some(&dan), serde_json::json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_admin_full_update() {
    let (router, state) = seeded_router().await;
    let admin = token_for(&state, "admin", Role::Admin);

    let (status, body) = put_json(
        &router,
        "/tasks/2",
        Some(&admin),
        serde_json::json!({ "status": "delayed", "notes": "traffic" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "delayed");
    assert_eq!(body["notes"], "traffic");
}

#[tokio::test]
async fn test_task_create_and_delete_are_gated() {
    let (router, state) = seeded_router().await;
    let dan = token_for(&state, "dan", Role::Driver);

    let (status, _body) = post_json(
        &router,
        "/tasks",
        Some(&dan),
        serde_json::json!({ "driver_id": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _body) = delete(&router, "/tasks/1", Some(&dan)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token_for(&state, "admin", Role::Admin);
    let (status, body) = post_json(
        &router,
        "/tasks",
        Some(&admin),
        serde_json::json!({ "driver_id": 2, "start_latitude": 51.5, "start_longitude": -0.1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "assigned");
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_user_self_registration_defaults_to_driver() {
    let (router, _state) = seeded_router().await;

    let (status, body) = post_json(
        &router,
        "/users",
        None,
        serde_json::json!({ "username": "newbie", "password": "longenough" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "driver");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_user_privileged_role_needs_admin() {
    let (router, state) = seeded_router().await;

    // Anonymous registration cannot claim the admin role
    let (status, _body) = post_json(
        &router,
        "/users",
        None,
        serde_json::json!({ "username": "sneaky", "password": "longenough", "role": "admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // An administrator can create any role
    let admin = token_for(&state, "admin", Role::Admin);
    let (status, body) = post_json(
        &router,
        "/users",
        Some(&admin),
        serde_json::json!({ "username": "fran", "password": "longenough", "role": "fueling" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "fueling");
}

#[tokio::test]
async fn test_user_duplicate_username_conflicts() {
    let (router, _state) = seeded_router().await;

    let (status, body) = post_json(
        &router,
        "/users",
        None,
        serde_json::json!({ "username": "dan", "password": "longenough" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_user_list_scoped_to_self_for_non_admins() {
    let (router, state) = seeded_router().await;

    let admin = token_for(&state, "admin", Role::Admin);
    let (status, body) = get(&router, "/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);

    let dan = token_for(&state, "dan", Role::Driver);
    let (status, body) = get(&router, "/users", Some(&dan)).await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "dan");
}

#[tokio::test]
async fn test_user_management_is_admin_only() {
    let (router, state) = seeded_router().await;
    let fae = token_for(&state, "fae", Role::Fueling);

    let (status, _body) = get(&router, "/users/2", Some(&fae)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = token_for(&state, "admin", Role::Admin);
    let (status, body) = put_json(
        &router,
        "/users/2",
        Some(&admin),
        serde_json::json!({ "first_name": "Dan", "email": "dan@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Dan");
    // Username untouched by the merge
    assert_eq!(body["username"], "dan");

    let (status, _body) = delete(&router, "/users/3", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_password_change_keeps_login_working() {
    let (router, state) = seeded_router().await;
    let admin = token_for(&state, "admin", Role::Admin);

    let (status, _body) = put_json(
        &router,
        "/users/2",
        Some(&admin),
        serde_json::json!({ "password": "brand-new-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Old password no longer works
    let (status, _body) = post_json(
        &router,
        "/login",
        None,
        serde_json::json!({ "username": "dan", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // New password does
    let (status, _body) = post_json(
        &router,
        "/login",
        None,
        serde_json::json!({ "username": "dan", "password": "brand-new-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Fueling & Maintenance Records
// =============================================================================

#[tokio::test]
async fn test_record_fueling_role_can_create() {
    let (router, state) = seeded_router().await;
    let fae = token_for(&state, "fae", Role::Fueling);

    let (status, body) = post_json(
        &router,
        "/fueling",
        Some(&fae),
        serde_json::json!({
            "vehicle_id": 2,
            "attendant_id": 4,
            "amount": 35.0,
            "total_cost": 51.0,
            "before_image": "/static/b.jpg",
            "after_image": "/static/a.jpg"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vehicle"], 2);
    assert_eq!(body["attendant"], 4);
}

#[tokio::test]
async fn test_record_fueling_denied_for_driver_and_maintenance() {
    let (router, state) = seeded_router().await;

    let payload = serde_json::json!({
        "vehicle_id": 2,
        "attendant_id": 4,
        "amount": 35.0,
        "total_cost": 51.0,
        "before_image": "/static/b.jpg",
        "after_image": "/static/a.jpg"
    });

    for (name, role) in [("dan", Role::Driver), ("mel", Role::Maintenance)] {
        let token = token_for(&state, name, role);
        let (status, _body) = post_json(&router, "/fueling", Some(&token), payload.clone()).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "role {}", name);
    }
}

#[tokio::test]
async fn test_record_fueling_validation() {
    let (router, state) = seeded_router().await;
    let fae = token_for(&state, "fae", Role::Fueling);

    let (status, _body) = post_json(
        &router,
        "/fueling",
        Some(&fae),
        serde_json::json!({
            "vehicle_id": 2,
            "attendant_id": 4,
            "amount": -1.0,
            "total_cost": 51.0,
            "before_image": "/static/b.jpg",
            "after_image": "/static/a.jpg"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_record_maintenance_role_can_create_and_update() {
    let (router, state) = seeded_router().await;
    let mel = token_for(&state, "mel", Role::Maintenance);

    let (status, body) = post_json(
        &router,
        "/maintenance",
        Some(&mel),
        serde_json::json!({ "vehicle_id": 2, "mechanic_id": 5, "service_type": "brakes" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    let id = body["id"].as_u64().unwrap();

    let (status, body) = put_json(
        &router,
        &format!("/maintenance/{}", id),
        Some(&mel),
        serde_json::json!({ "status": "done", "total_cost": 240.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "done");
    assert_eq!(body["service_type"], "brakes");
}

#[tokio::test]
async fn test_record_cross_role_reads_denied() {
    let (router, state) = seeded_router().await;

    // Fueling staff cannot read maintenance records and vice versa
    let fae = token_for(&state, "fae", Role::Fueling);
    let (status, _body) = get(&router, "/maintenance", Some(&fae)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mel = token_for(&state, "mel", Role::Maintenance);
    let (status, _body) = get(&router, "/fueling", Some(&mel)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_record_filters_by_vehicle_and_person() {
    let (router, state) = seeded_router().await;
    let admin = token_for(&state, "admin", Role::Admin);

    let (status, body) = get(&router, "/vehicles/1/fueling", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = get(&router, "/vehicles/2/fueling", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, body) = get(&router, "/users/5/maintenance", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

// =============================================================================
// Auctions
// =============================================================================

#[tokio::test]
async fn test_auction_browsing_is_public() {
    let (router, _state) = seeded_router().await;

    let (status, body) = get(&router, "/auctions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = get(&router, "/auctions/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"], "decommissioned van");
}

#[tokio::test]
async fn test_auction_management_is_gated() {
    let (router, state) = seeded_router().await;

    // Anonymous deletion is an authentication failure
    let (status, _body) = delete(&router, "/auctions/1", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A driver is forbidden
    let dan = token_for(&state, "dan", Role::Driver);
    let (status, _body) = delete(&router, "/auctions/1", Some(&dan)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The admin succeeds
    let admin = token_for(&state, "admin", Role::Admin);
    let (status, _body) = delete(&router, "/auctions/1", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&router, "/auctions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_auction_create_requires_existing_vehicle() {
    let (router, state) = seeded_router().await;
    let admin = token_for(&state, "admin", Role::Admin);

    let (status, _body) = post_json(
        &router,
        "/auctions",
        Some(&admin),
        serde_json::json!({ "vehicle_id": 99 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn test_report_aggregates_vehicle_history() {
    let (router, state) = seeded_router().await;
    let admin = token_for(&state, "admin", Role::Admin);

    let (status, body) = get(&router, "/reports/vehicles/1", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vehicle"]["id"], 1);
    assert_eq!(body["fueling_records"].as_array().unwrap().len(), 1);
    assert_eq!(body["maintenance_records"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_report_is_admin_only() {
    let (router, state) = seeded_router().await;

    for (name, role) in [
        ("dan", Role::Driver),
        ("fae", Role::Fueling),
        ("mel", Role::Maintenance),
    ] {
        let token = token_for(&state, name, role);
        let (status, _body) = get(&router, "/reports/vehicles/1", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "role {}", name);
    }
}
