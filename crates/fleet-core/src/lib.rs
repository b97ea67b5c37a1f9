// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # fleet-core
//!
//! Core domain types and shared abstractions for the Fleet service.
//!
//! This crate provides the foundational types used across all Fleet
//! components:
//!
//! - **Types**: Identifier newtypes (`UserId`, `VehicleId`, ...) and the
//!   role/status enumerations
//! - **Model**: Record structs for vehicles, users, tasks, maintenance and
//!   fueling logs, and auction listings
//! - **Error**: The store error hierarchy
//! - **Audit**: Security audit events and sinks

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod audit;
pub mod error;
pub mod model;
pub mod types;

pub use audit::{AuditEvent, AuditSink, NoOpAuditSink, TracingAuditSink};
pub use error::{StoreError, StoreResult};
pub use model::{
    AuctionListing, FuelingRecord, MaintenanceRecord, Task, User, Vehicle,
};
pub use types::{
    ListingId, MaintenanceStatus, RecordId, Role, TaskId, TaskStatus, UserId, VehicleId,
    VehicleStatus,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
