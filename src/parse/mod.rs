// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pure parsers for text produced by version-control tools.
//!
//! ```text
//! git status -b --porcelain=v1  --> status::parse_status  --> ParsedStatus
//!                                    header  ## local...remote [behind N, ahead M]
//!                                    lines   XY path  --> StatusRecord
//!                                    quoted paths --> unescape::unescape_path
//! git branch/tag --format        --> refs::parse_ref_list  --> Vec<String>
//! git log --pretty=HISTORY_FORMAT --> history::parse_history --> Vec<CommitRecord>
//! hg status                      --> hg::parse_hg_status    --> Vec<FileChange>
//! ```
//!
//! None of these functions fail: malformed input yields `None` or an empty
//! collection and the caller decides whether that is an error.

pub mod hg;
pub mod history;
pub mod refs;
pub mod status;
pub mod unescape;

pub use history::{HISTORY_FORMAT, parse_history, parse_history_record};
pub use refs::parse_ref_list;
pub use status::{ParsedStatus, StatusHeader, StatusRecord, parse_status};
pub use unescape::unescape_path;
