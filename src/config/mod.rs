// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for vcskit.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. vcskit.toml (cwd, optional)
//! 3. --config
//! 4. VCSKIT_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! Sections and keys are separated by a double underscore:
//!
//! ```text
//! VCSKIT_GLOBAL__LOG_LEVEL=4                  → global.log_level = 4
//! VCSKIT_BACKENDS__CREDENTIAL_MANAGER=true    → backends.credential_manager = true
//! VCSKIT_BACKENDS__ORDER=mercurial,git        → backends.order = ["mercurial", "git"]
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

pub use loader::ConfigLoader;
pub use types::{BackendsConfig, GlobalConfig};

/// Default name of the optional configuration file in the working directory.
pub const CONFIG_FILE_NAME: &str = "vcskit.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Backend options.
    pub backends: BackendsConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vcskit::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("vcskit.toml")
    ///     .with_env_prefix("VCSKIT")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or fails validation.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` found.
    pub fn validate(&self) -> Result<()> {
        self.backends.validate()?;
        Ok(())
    }

    /// Format configuration options for display, one `key = value` per line.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        let fmt_path = |p: Option<&Path>| p.map_or_else(String::new, |p| p.display().to_string());

        options.insert(
            "global.log_level".to_string(),
            self.global.log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".to_string(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".to_string(),
            fmt_path(self.global.log_file.as_deref()),
        );
        options.insert("backends.order".to_string(), self.backends.order.join(", "));
        options.insert(
            "backends.credential_manager".to_string(),
            self.backends
                .credential_manager
                .map_or_else(|| "auto".to_string(), |v| v.to_string()),
        );
        options.insert(
            "backends.remote_timeout_secs".to_string(),
            self.backends.remote_timeout_secs.to_string(),
        );
        options.insert(
            "backends.git_program".to_string(),
            fmt_path(self.backends.git_program.as_deref()),
        );
        options.insert(
            "backends.hg_program".to_string(),
            fmt_path(self.backends.hg_program.as_deref()),
        );

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);
        options
            .into_iter()
            .map(|(key, value)| {
                format!("{key:<max_key_len$} = {value}")
                    .trim_end()
                    .to_string()
            })
            .collect()
    }
}
