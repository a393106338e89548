// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE        ← Additional config files (can repeat)
//! -C DIR               ← Working copy to operate on
//! --log-level N        ← Console verbosity (0-5)
//! --file-log-level N   ← File verbosity (falls back to --log-level)
//! --log-file FILE      ← global.log_file override
//! --credential-manager ← backends.credential_manager override
//! --json               ← Machine-readable output
//!
//! Precedence: CLI flags > VCSKIT_* env > --config > vcskit.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Disables loading `vcskit.toml` from the current directory.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,

    /// Working copy to operate on.
    #[arg(short = 'C', long = "directory", value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Lets the remote tool handle credentials itself (true/false).
    #[arg(long = "credential-manager", value_name = "BOOL")]
    pub credential_manager: Option<bool>,

    /// Prints results as JSON.
    #[arg(long)]
    pub json: bool,
}

impl GlobalOptions {
    /// Converts command-line options to configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(&'static str, ::config::Value)> {
        let mut overrides = Vec::new();

        if let Some(level) = self.log_level {
            overrides.push(("global.log_level", i64::from(level).into()));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("global.file_log_level", i64::from(level).into()));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(("global.log_file", path.display().to_string().into()));
        }

        if let Some(enabled) = self.credential_manager {
            overrides.push(("backends.credential_manager", enabled.into()));
        }

        overrides
    }
}
