// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers --> Output
//!   config (options, config-files, features), repo (everything else)
//! ```

pub mod config;
pub mod output;
pub mod repo;

#[cfg(test)]
mod tests;
