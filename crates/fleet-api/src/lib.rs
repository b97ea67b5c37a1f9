// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # fleet-api
//!
//! HTTP API server for the Fleet service.
//!
//! This crate provides the REST API with sealed-token authentication,
//! table-driven role-based authorization with ownership scoping, and typed
//! error responses.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{
    generate_key, AccessPolicy, AccessScope, AuthContext, Capability, Credential, Resource,
    TokenAuthority, TokenConfig, TokenError,
};
pub use config::{ApiConfig, CorsConfig};
pub use error::{ApiError, ApiResult};
pub use server::ApiServer;
pub use state::AppState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
