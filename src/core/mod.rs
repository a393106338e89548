// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core services shared by every backend.
//!
//! ```text
//!        core
//!         |
//!      process
//!    /    |    \
//! Builder Runner Locator
//! Output  (std)  (which)
//! ```

pub mod process;
