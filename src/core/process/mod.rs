// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Blocking process spawning.
//!
//! ```text
//! ExecutableLocator::find("git") --> /usr/bin/git
//! ProcessBuilder::new(path)
//!   .args() .cwd() .env()
//!   ProcessRunner::run() --> Option<ProcessOutput>
//!       None: spawn failed (missing tool, bad cwd)
//! ```

pub mod builder;
mod locate;
mod runner;

pub use builder::{ProcessBuilder, ProcessOutput, SIGNAL_EXIT_CODE};
pub use locate::{ExecutableLocator, FixedLocator, WhichLocator};
pub use runner::{ProcessRunner, SystemRunner};
