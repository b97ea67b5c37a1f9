// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: start the server (default)
//! - `validate`: validate the configuration file
//! - `version`: show version information
//! - `gen-key`: generate a token sealing key

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Fleet - role-based fleet management service
#[derive(Parser, Debug)]
#[command(
    name = "fleet",
    author = "Sylvex <contact@sylvex.io>",
    version = fleet_core::VERSION,
    about = "Role-based fleet management service",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "fleet.toml",
        env = "FLEET_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "info",
        env = "FLEET_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "FLEET_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the server
    ///
    /// This is the default command when no subcommand is specified.
    Run(RunArgs),

    /// Validate the configuration file
    ///
    /// Parses the configuration and validates the token key without
    /// starting the server.
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,

    /// Generate a new token sealing key
    ///
    /// Generates a cryptographically secure 32-byte key suitable for the
    /// `token.key` configuration value.
    #[command(name = "gen-key")]
    GenKey(GenKeyArgs),
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Override the listen port from the configuration
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Show the parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,
}

/// Arguments for the `gen-key` command.
#[derive(Args, Debug, Default, Clone)]
pub struct GenKeyArgs {
    /// Output format for the key
    #[arg(short, long, default_value = "base64")]
    pub format: KeyFormat,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

/// Key output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum KeyFormat {
    /// Base64 encoded
    #[default]
    Base64,
    /// Hexadecimal encoded
    Hex,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parses CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the effective command, defaulting to `Run`.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Returns the effective log level based on flags.
    pub fn effective_log_level(&self) -> &str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["fleet"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Run(_)));
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["fleet", "-c", "/etc/fleet/fleet.toml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/fleet/fleet.toml"));
    }

    #[test]
    fn test_quiet_and_verbose() {
        let cli = Cli::parse_from(["fleet", "-q"]);
        assert_eq!(cli.effective_log_level(), "warn");

        let cli = Cli::parse_from(["fleet", "-v"]);
        assert_eq!(cli.effective_log_level(), "debug");
    }

    #[test]
    fn test_gen_key_command() {
        let cli = Cli::parse_from(["fleet", "gen-key", "-f", "hex"]);
        if let Some(Commands::GenKey(args)) = cli.command {
            assert_eq!(args.format, KeyFormat::Hex);
        } else {
            panic!("expected GenKey command");
        }
    }

    #[test]
    fn test_run_port_override() {
        let cli = Cli::parse_from(["fleet", "run", "-p", "9090"]);
        if let Some(Commands::Run(args)) = cli.command {
            assert_eq!(args.port, Some(9090));
        } else {
            panic!("expected Run command");
        }
    }
}
