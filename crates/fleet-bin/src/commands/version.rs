// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The `version` subcommand.

/// Prints version information for all components.
pub fn version() {
    println!("fleet {}", fleet_core::VERSION);
    println!("  fleet-core  {}", fleet_core::VERSION);
    println!("  fleet-store {}", fleet_store::VERSION);
    println!("  fleet-api   {}", fleet_api::VERSION);
}
