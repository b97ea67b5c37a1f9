// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Fleet - role-based fleet management service.
//!
//! Main binary entry point.

use std::process::ExitCode;

use fleet_bin::cli::{Cli, Commands};
use fleet_bin::commands;
use fleet_bin::config::AppConfig;
use fleet_bin::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.effective_log_level(), cli.log_format);

    let result = match cli.effective_command() {
        Commands::Run(args) => match AppConfig::load(&cli.config) {
            Ok(config) => commands::run(config, args).await,
            Err(e) => Err(e),
        },
        Commands::Validate(args) => match AppConfig::load(&cli.config) {
            Ok(config) => commands::validate(config, args),
            Err(e) => Err(e),
        },
        Commands::Version => {
            commands::version();
            Ok(())
        }
        Commands::GenKey(args) => {
            commands::gen_key(args);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fleet exited with error");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
