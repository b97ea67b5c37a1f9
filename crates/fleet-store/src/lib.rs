// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # fleet-store
//!
//! Resource store for the Fleet service.
//!
//! This crate provides:
//!
//! - [`UserDirectory`]: the username-to-identifier resolution seam that
//!   ownership-scoped authorization checks depend on
//! - [`MemoryStore`]: an async in-memory store with per-table maps and
//!   predicate-narrowed list operations

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod directory;
pub mod memory;

pub use directory::UserDirectory;
pub use memory::MemoryStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
