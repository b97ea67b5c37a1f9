// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration file loading.
//!
//! The binary reads a TOML file (default `fleet.toml`); the token key may
//! also be supplied through `FLEET_TOKEN_KEY`, which takes precedence over
//! the file so the secret can stay out of it entirely.

use std::path::Path;

use serde::{Deserialize, Serialize};

use fleet_api::ApiConfig;

use crate::error::{BinError, BinResult};

/// Environment variable holding the base64-encoded token key.
pub const TOKEN_KEY_ENV: &str = "FLEET_TOKEN_KEY";

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level configuration for the `fleet` binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API server configuration.
    pub api: ApiConfig,
    /// Optional administrator account seeded at startup.
    pub seed_admin: Option<SeedAdmin>,
}

/// An administrator account created at startup when missing.
///
/// Gives fresh deployments a privileged account without going through the
/// public registration route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAdmin {
    /// Administrator username.
    pub username: String,
    /// Administrator password.
    #[serde(skip_serializing)]
    pub password: String,
}

impl AppConfig {
    /// Loads configuration from a TOML file, then applies environment
    /// overrides.
    ///
    /// A missing file yields the defaults; explicit paths that exist but
    /// cannot be read or parsed are errors.
    pub fn load(path: &Path) -> BinResult<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| BinError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&raw).map_err(|source| BinError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var(TOKEN_KEY_ENV) {
            config.api.token.key = key;
        }

        Ok(config)
    }

    /// Validates the configuration without starting anything.
    ///
    /// Constructing the token authority checks the key material; the same
    /// check guards `run`, so a configuration that validates here also
    /// starts.
    pub fn validate(&self) -> BinResult<()> {
        if self.api.token.key.is_empty() {
            return Err(BinError::config_invalid(format!(
                "token.key is not set (generate one with `fleet gen-key`, \
                 set it in the config file or via {})",
                TOKEN_KEY_ENV
            )));
        }
        fleet_api::TokenAuthority::new(&self.api.token)
            .map_err(|e| BinError::config_invalid(e.to_string()))?;

        if let Some(seed) = &self.seed_admin {
            if seed.username.is_empty() {
                return Err(BinError::config_invalid("seed_admin.username is empty"));
            }
            if seed.password.len() < 8 {
                return Err(BinError::config_invalid(
                    "seed_admin.password must be at least 8 characters",
                ));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parses() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.port, 8080);
        assert!(config.seed_admin.is_none());
    }

    #[test]
    fn test_full_config_parses() {
        let raw = r#"
            [api]
            port = 9090

            [api.token]
            key = "c2VjcmV0"
            ttl = 600

            [seed_admin]
            username = "root"
            password = "bootstrap-me"
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.api.port, 9090);
        assert_eq!(config.api.token.ttl.as_secs(), 600);
        assert_eq!(config.seed_admin.unwrap().username, "root");
    }

    #[test]
    fn test_validate_requires_key() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_generated_key() {
        let mut config = AppConfig::default();
        config.api.token.key = fleet_api::auth::generate_key();
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_short_key() {
        let mut config = AppConfig::default();
        config.api.token.key = "c2VjcmV0".to_string(); // 6 bytes
        assert!(config.validate().is_err());
    }
}
