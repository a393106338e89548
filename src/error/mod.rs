// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                 VcsError (~24 bytes)
//!                        |
//!   +--------+--------+--+-----+---------+---------+
//!   |        |        |        |         |         |
//!   v        v        v        v         v         v
//! Backend  Property Operation  Auth  Unsupported  NoValidBackend
//! Unavail.   Box      Box      Box   (Operation)   NoActiveBackend
//!   Box                                            Config/Io/...
//!
//! BackendUnavailable  recoverable: the manager tries the next backend
//! Property            get/set/del of a backend property failed
//! Operation           a method-style operation failed
//! Authentication      credentials rejected; carries supplied/required
//! Unsupported         the operation's feature descriptor is disabled
//! ```
//!
//! Parsers never produce these errors: malformed tool output yields
//! `None`/empty and the calling operation decides what absence means.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth::CredentialFields;
use crate::feature::Operation;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`VcsError`].
pub type VcsResult<T> = std::result::Result<T, VcsError>;

/// Top-level library error type.
///
/// All structured payloads are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The backend cannot serve this directory (missing tool or not a repository).
    #[error("{0}")]
    BackendUnavailable(#[from] Box<BackendUnavailable>),

    /// A property operation failed.
    #[error("{0}")]
    Property(#[from] Box<PropertyError>),

    /// A method-style operation failed.
    #[error("{0}")]
    Operation(#[from] Box<OperationError>),

    /// Credentials were rejected or are missing.
    #[error("{0}")]
    Authentication(#[from] Box<AuthError>),

    /// The active backend does not implement the operation.
    #[error("operation '{0}' is not supported by this backend")]
    Unsupported(Operation),

    /// No registered backend recognised the directory.
    #[error("no valid backend for directory: {0}")]
    NoValidBackend(Box<str>),

    /// No backend is bound to the manager.
    #[error("no active backend")]
    NoActiveBackend,

    /// An argument is outside the accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(Box<str>),

    /// Unknown change state name or code.
    #[error("{0}")]
    ChangeState(#[from] Box<ChangeStateError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

impl VcsError {
    /// Creates a [`VcsError::NoValidBackend`] for `path`.
    #[must_use]
    pub fn no_valid_backend(path: &Path) -> Self {
        Self::NoValidBackend(path.display().to_string().into_boxed_str())
    }

    /// Creates a [`VcsError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into().into_boxed_str())
    }

    /// Returns true for the recoverable "backend not applicable here" signal.
    #[must_use]
    pub const fn is_backend_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }

    /// Returns true when the failure is an authentication problem.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Returns true when the operation is disabled for the active backend.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for VcsError {
                fn from(err: $error) -> Self {
                    VcsError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    BackendUnavailable => BackendUnavailable,
    PropertyError => Property,
    OperationError => Operation,
    AuthError => Authentication,
    ChangeStateError => ChangeState,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Backend availability ---

/// Raised by a backend that cannot initialise itself for a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUnavailable {
    /// The directory given to the backend.
    pub directory: PathBuf,
    /// Name of the backend that declined.
    pub backend: &'static str,
    /// Missing executables.
    pub programs: Vec<String>,
    /// False when the directory is not a repository of this kind.
    pub is_valid_repository: bool,
}

impl BackendUnavailable {
    /// The backend's executable could not be found or run.
    pub fn missing_program(
        directory: &Path,
        backend: &'static str,
        program: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.to_path_buf(),
            backend,
            programs: vec![program.into()],
            is_valid_repository: true,
        }
    }

    /// The directory is not a repository handled by the backend.
    #[must_use]
    pub fn not_a_repository(directory: &Path, backend: &'static str) -> Self {
        Self {
            directory: directory.to_path_buf(),
            backend,
            programs: Vec::new(),
            is_valid_repository: false,
        }
    }

    /// Checks if there are missing dependencies.
    #[must_use]
    pub const fn missing_dependencies(&self) -> bool {
        !self.programs.is_empty()
    }
}

impl fmt::Display for BackendUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} backend unavailable for {}", self.backend, self.directory.display())?;
        if self.missing_dependencies() {
            write!(f, ": missing {}", self.programs.join(", "))?;
        }
        if !self.is_valid_repository {
            f.write_str(": not a repository")?;
        }
        Ok(())
    }
}

impl std::error::Error for BackendUnavailable {}

// --- Property errors ---

/// Operation applied to a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOp {
    Get,
    Set,
    Del,
}

impl PropertyOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Del => "del",
        }
    }
}

impl fmt::Display for PropertyOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property get/set/del could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to {operation} property '{name}'{}", describe(.error.as_deref(), .raw_error.as_deref()))]
pub struct PropertyError {
    pub name: &'static str,
    pub operation: PropertyOp,
    /// Formatted error message.
    pub error: Option<String>,
    /// Raw output of the tool.
    pub raw_error: Option<String>,
}

impl PropertyError {
    #[must_use]
    pub const fn new(name: &'static str, operation: PropertyOp) -> Self {
        Self {
            name,
            operation,
            error: None,
            raw_error: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    #[must_use]
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if !raw.trim().is_empty() {
            self.raw_error = Some(raw);
        }
        self
    }
}

// --- Operation errors ---

/// A method-style operation failed unexpectedly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{method} failed{}", describe(.error.as_deref(), .raw_error.as_deref()))]
pub struct OperationError {
    pub method: &'static str,
    pub error: Option<String>,
    pub raw_error: Option<String>,
}

impl OperationError {
    #[must_use]
    pub const fn new(method: &'static str) -> Self {
        Self {
            method,
            error: None,
            raw_error: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    #[must_use]
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if !raw.trim().is_empty() {
            self.raw_error = Some(raw);
        }
        self
    }
}

fn describe(error: Option<&str>, raw: Option<&str>) -> String {
    match (error, raw) {
        (Some(e), Some(r)) => format!(": {e} ({})", r.trim()),
        (Some(e), None) => format!(": {e}"),
        (None, Some(r)) => format!(": {}", r.trim()),
        (None, None) => String::new(),
    }
}

// --- Authentication errors ---

/// Credentials were rejected or are missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("authentication failed: {error}")]
pub struct AuthError {
    /// Credential fields that were supplied to the tool.
    pub supplied: CredentialFields,
    /// Credential fields the backend requires.
    pub required: CredentialFields,
    /// Username given to the tool, if any.
    pub username: Option<String>,
    pub error: String,
}

impl AuthError {
    /// Fields the backend requires but the caller did not supply.
    #[must_use]
    pub fn missing(&self) -> CredentialFields {
        self.required.difference(self.supplied)
    }

    /// Checks if every required credential was supplied.
    #[must_use]
    pub fn are_credentials_inserted(&self) -> bool {
        self.supplied.contains(self.required)
    }
}

// --- Change state errors ---

/// Conversion failure between a [`crate::model::ChangeState`] and its name or code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeStateError {
    #[error("given state '{0}' does not exist")]
    UnknownName(String),

    #[error("given state code {0} does not exist")]
    UnknownCode(u8),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Configuration file not found.
    #[error("config file not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests;
