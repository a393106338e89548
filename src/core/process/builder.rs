// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process builder with configuration options.
//!
//! ```text
//! ProcessBuilder
//!  • new(program)
//!  • arg/args/cwd/env/name
//!  • display_name/command_line (logging)
//!
//! ProcessOutput { exit_code, stdout bytes, stderr bytes }
//!   exit_code = -1 when the process was killed by a signal
//! ```

use std::ffi::OsStr;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Exit code reported for a process terminated by a signal.
pub const SIGNAL_EXIT_CODE: i32 = -1;

/// Output from a completed process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    exit_code: i32,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl ProcessOutput {
    #[must_use]
    pub fn new(exit_code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Returns the process exit code (0 = success).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    /// Stdout decoded as UTF-8, invalid sequences replaced.
    #[must_use]
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    #[must_use]
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Stderr if it has content, otherwise stdout. Used as the raw error
    /// text of failed operations.
    #[must_use]
    pub fn error_text(&self) -> String {
        if self.stderr.iter().any(|b| !b.is_ascii_whitespace()) {
            self.stderr_text()
        } else {
            self.stdout_text()
        }
    }

    /// Returns true if the process exited successfully (code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns true if the process was killed by a signal.
    #[must_use]
    pub const fn signaled(&self) -> bool {
        self.exit_code == SIGNAL_EXIT_CODE
    }
}

/// Description of a process to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    /// Path to the executable
    program: PathBuf,
    /// Command-line arguments
    args: Vec<String>,
    /// Working directory
    cwd: Option<PathBuf>,
    /// Environment overrides, applied on top of the inherited environment
    env: Vec<(String, String)>,
    /// Display name for logging
    name: Option<String>,
}

impl ProcessBuilder {
    /// Creates a new `ProcessBuilder` for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            name: None,
        }
    }

    /// Adds an argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Adds multiple arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string_lossy().into_owned());
        }
        self
    }

    /// Sets the working directory for the process.
    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets an environment variable, replacing an earlier value for the same key.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.env.retain(|(k, _)| *k != key);
        self.env.push((key, value.into()));
        self
    }

    /// Sets the display name used in logs.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn args_slice(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    #[must_use]
    pub fn env_vars(&self) -> &[(String, String)] {
        &self.env
    }

    /// Returns the display name for this process.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.program.file_stem().map_or_else(
                || "process".to_string(),
                |s| s.to_string_lossy().into_owned(),
            )
        })
    }

    /// Returns the full command line as a string (for logging).
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut cmd = format!("{}", self.program.display());
        for arg in &self.args {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }
}
