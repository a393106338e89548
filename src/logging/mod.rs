// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tracing setup for the `vcskit` binary.
//!
//! ```text
//! GlobalConfig::log_config() ──> init_logging
//!                                  +- stderr      console_level
//!                                  +- log_file    file_level, text or JSON lines
//!                                       (non_blocking, flushed when LogGuard drops)
//! ```
//!
//! Stdout is reserved for command output, so nothing here writes to it.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Context;
use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{ConfigError, Result};

/// Verbosity from 0 (silent) to 5.
///
/// Info reports backend selection and remote results, debug every spawned
/// command, trace exit codes and credential-session states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogLevel(u8);

impl Default for LogLevel {
    fn default() -> Self {
        Self::INFO
    }
}

impl LogLevel {
    pub const SILENT: Self = Self(0);
    pub const ERROR: Self = Self(1);
    pub const WARN: Self = Self(2);
    pub const INFO: Self = Self(3);
    pub const DEBUG: Self = Self(4);
    pub const TRACE: Self = Self(5);

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` above [`Self::TRACE`].
    pub fn new(level: u8) -> std::result::Result<Self, ConfigError> {
        if level <= Self::TRACE.0 {
            Ok(Self(level))
        } else {
            Err(ConfigError::InvalidValue {
                section: "global".to_string(),
                key: "log_level".to_string(),
                message: format!("log level must be 0-5, got {level}"),
            })
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// `EnvFilter` directive for this level.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self.0 {
            0 => "off",
            1 => "error",
            2 => "warn",
            3 => "info",
            4 => "debug",
            _ => "trace",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::new(self.directive())
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Self::new(u8::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Builder)]
pub struct LogConfig {
    #[builder(setters(name = with_console_level), default = LogLevel::INFO)]
    console_level: LogLevel,
    #[builder(setters(name = with_file_level), default = LogLevel::TRACE)]
    file_level: LogLevel,
    #[builder(setters(name = with_log_file))]
    log_file: Option<PathBuf>,
    #[builder(setters(name = with_show_timestamps), default = true)]
    show_timestamps: bool,
    /// Write the log file as JSON lines.
    #[builder(setters(name = with_json_file), default = false)]
    json_file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LogConfig {
    #[must_use]
    pub const fn console_level(&self) -> LogLevel {
        self.console_level
    }

    #[must_use]
    pub const fn file_level(&self) -> LogLevel {
        self.file_level
    }

    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    #[must_use]
    pub const fn show_timestamps(&self) -> bool {
        self.show_timestamps
    }

    #[must_use]
    pub const fn json_file(&self) -> bool {
        self.json_file
    }
}

/// Keeps the file writer alive; pending lines are flushed on drop.
#[must_use = "dropping the guard stops the file writer"]
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails when the log file cannot be created or a subscriber is already set.
///
/// # Example
///
/// ```no_run
/// use vcskit::logging::{init_logging, LogConfig, LogLevel};
///
/// let config = LogConfig::builder()
///     .with_console_level(LogLevel::WARN)
///     .with_log_file("vcskit.log".into())
///     .build();
/// let _guard = init_logging(&config)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let console = if config.show_timestamps() {
        console.with_filter(config.console_level().filter()).boxed()
    } else {
        console
            .without_time()
            .with_filter(config.console_level().filter())
            .boxed()
    };

    let mut layers: Vec<BoxedLayer> = vec![console];
    let mut file_guard = None;
    if let Some(path) = config.log_file() {
        let (layer, guard) = file_layer(config, path)?;
        layers.push(layer);
        file_guard = Some(guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

fn file_layer(config: &LogConfig, path: &Path) -> Result<(BoxedLayer, WorkerGuard)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let layer = if config.json_file() {
        layer.json().with_filter(config.file_level().filter()).boxed()
    } else {
        layer.with_filter(config.file_level().filter()).boxed()
    };
    Ok((layer, guard))
}
