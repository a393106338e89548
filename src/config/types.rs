// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! [global]    log_level, file_log_level, log_file
//! [backends]  order, credential_manager, remote_timeout_secs,
//!             git_program, hg_program
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::session::DEFAULT_SESSION_TIMEOUT;
use crate::backend::{BUILTIN_BACKENDS, BackendSettings};
use crate::error::ConfigError;
use crate::logging::{LogConfig, LogLevel};

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-5).
    pub log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::WARN,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

impl GlobalConfig {
    /// Logging configuration for these options.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig::builder()
            .with_console_level(self.log_level)
            .with_file_level(self.file_log_level)
            .maybe_with_log_file(self.log_file.clone())
            .with_show_timestamps(false)
            .build()
    }
}

/// Backend selection and behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendsConfig {
    /// Probe order; names of built-in backends.
    pub order: Vec<String>,
    /// Whether the remote tool manages credentials itself.
    /// Platform default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_manager: Option<bool>,
    /// Timeout of the interactive credential session, in seconds.
    pub remote_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_program: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hg_program: Option<PathBuf>,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            order: BUILTIN_BACKENDS.iter().map(ToString::to_string).collect(),
            credential_manager: None,
            remote_timeout_secs: DEFAULT_SESSION_TIMEOUT.as_secs(),
            git_program: None,
            hg_program: None,
        }
    }
}

impl BackendsConfig {
    /// Rejects an empty, unknown or duplicated probe order and a zero timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            section: "backends".to_string(),
            key: key.to_string(),
            message,
        };

        if self.order.is_empty() {
            return Err(invalid("order", "at least one backend is required".to_string()));
        }
        let mut seen = BTreeSet::new();
        for name in &self.order {
            if !BUILTIN_BACKENDS.contains(&name.as_str()) {
                return Err(invalid(
                    "order",
                    format!(
                        "unknown backend '{name}', expected one of: {}",
                        BUILTIN_BACKENDS.join(", ")
                    ),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(invalid("order", format!("backend '{name}' listed twice")));
            }
        }
        if self.remote_timeout_secs == 0 {
            return Err(invalid(
                "remote_timeout_secs",
                "timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings injected into every backend; the platform default for the
    /// credential manager is decided here, once.
    #[must_use]
    pub fn settings(&self) -> BackendSettings {
        BackendSettings::builder()
            .maybe_with_credential_manager(self.credential_manager)
            .with_remote_timeout(Duration::from_secs(self.remote_timeout_secs))
            .maybe_with_git_program(self.git_program.clone())
            .maybe_with_hg_program(self.hg_program.clone())
            .build()
    }
}
