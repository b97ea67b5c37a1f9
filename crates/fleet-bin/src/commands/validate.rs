// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The `validate` subcommand: check the configuration file.

use crate::cli::ValidateArgs;
use crate::config::AppConfig;
use crate::error::BinResult;

/// Validates the configuration and reports the outcome.
pub fn validate(config: AppConfig, args: ValidateArgs) -> BinResult<()> {
    config.validate()?;

    println!("configuration is valid");

    if args.show_config {
        // Secrets are marked skip_serializing and never printed
        match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("\n{}", rendered),
            Err(e) => eprintln!("cannot render configuration: {}", e),
        }
    }

    Ok(())
}
