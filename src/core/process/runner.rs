// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution.
//!
//! ```text
//! ProcessRunner::run(&ProcessBuilder)
//!              |
//!              v
//!     build_command()
//!     args, cwd, env, stdin=null
//!              |
//!              v
//!          output()
//!         /        \
//!   spawn error   exited / signaled
//!        |             |
//!        v             v
//!      None     Some(ProcessOutput)
//! ```
//!
//! `None` is the "unavailable" sentinel: the tool could not be started.
//! A non-zero exit is not an error at this layer.

use std::fmt;
use std::process::{Command, Stdio};

use tracing::{debug, trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, SIGNAL_EXIT_CODE};

/// Runs external processes to completion.
pub trait ProcessRunner: Send + Sync + fmt::Debug {
    /// Runs `builder` and captures its output.
    ///
    /// Returns `None` when the process could not be spawned.
    fn run(&self, builder: &ProcessBuilder) -> Option<ProcessOutput>;
}

/// Runs processes with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn build_command(builder: &ProcessBuilder) -> Command {
        let mut command = Command::new(builder.program());
        command.args(builder.args_slice());
        if let Some(cwd) = builder.working_dir() {
            command.current_dir(cwd);
        }
        for (key, value) in builder.env_vars() {
            command.env(key, value);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, builder: &ProcessBuilder) -> Option<ProcessOutput> {
        let name = builder.display_name();
        if let Some(cwd) = builder.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %builder.command_line(), "exec");

        let output = match Self::build_command(builder).output() {
            Ok(output) => output,
            Err(e) => {
                warn!(process = %name, error = %e, "failed to spawn");
                return None;
            }
        };

        let exit_code = output.status.code().unwrap_or(SIGNAL_EXIT_CODE);
        trace!(process = %name, exit_code, "completed");
        Some(ProcessOutput::new(exit_code, output.stdout, output.stderr))
    }
}
