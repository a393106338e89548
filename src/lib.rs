// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |                     |
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          manager          |
//!              |  probe order, forwarding  |
//!              '-------------+-------------'
//!                            v
//!                 backend (VcsBackend trait)
//!                 git             mercurial
//!                  |                  |
//!         +--------+-------+     +----+
//!         v        v       v     v
//!       parse    auth    feature model
//!     porcelain  pty      table  states
//!     history   store   groups  records
//!
//!   +-----------------------------------------+
//!   |  core      process runner, locator      |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, config    |
//!   +-----------------------------------------+
//! ```

pub mod auth;
pub mod backend;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod feature;
pub mod logging;
pub mod manager;
pub mod model;
pub mod parse;

#[cfg(test)]
pub(crate) mod testing;
