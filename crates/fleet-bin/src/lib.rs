// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # fleet-bin
//!
//! Library portion of the `fleet` binary: CLI definitions, configuration
//! loading, logging setup, and subcommand implementations.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod shutdown;

pub use error::{BinError, BinResult};
