// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - Sealed bearer-token issuance and verification
//! - The table-driven access policy (role to capability mapping with
//!   ownership scoping)
//! - Capability definitions
//! - The per-request authentication context

mod context;
mod credential;
pub mod capability;
pub mod password;
mod policy;
mod token;

pub use capability::{Capability, CapabilitySet};
pub use context::AuthContext;
pub use credential::Credential;
pub use policy::{AccessPolicy, AccessScope, Resource, RoleGrants};
pub use token::{generate_key, TokenAuthority, TokenConfig, TokenError};
