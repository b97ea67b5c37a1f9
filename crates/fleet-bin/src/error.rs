// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Binary error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for binary operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors produced by the `fleet` binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// The configuration file could not be read.
    #[error("cannot read configuration file {path}: {source}")]
    ConfigRead {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("cannot parse configuration file {path}: {source}")]
    ConfigParse {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The configuration is invalid.
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of the problem.
        message: String,
    },

    /// The API server failed.
    #[error("server error: {0}")]
    Server(#[from] fleet_api::ApiError),
}

impl BinError {
    /// Creates an invalid-configuration error.
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }
}
