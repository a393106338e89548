// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Parser for `hg status` output.
//!
//! ```text
//! M path   modified     A path   added
//! R path   removed      ! path   missing (removed)
//! ? path   untracked    I path   ignored
//! C path   clean (skipped)
//! ```
//!
//! Mercurial has no staging area, so every change is unstaged.

use crate::model::{ChangeState, FileChange};

/// Parses `hg status` lines into unstaged changes.
#[must_use]
pub fn parse_hg_status(output: &str) -> Vec<FileChange> {
    output.lines().filter_map(parse_hg_line).collect()
}

fn parse_hg_line(line: &str) -> Option<FileChange> {
    let (code, path) = line.split_once(' ')?;
    if path.is_empty() {
        return None;
    }
    let kind = match code {
        "M" => ChangeState::Modified,
        "A" | "?" => ChangeState::Added,
        "R" | "!" => ChangeState::Removed,
        "I" => ChangeState::Ignored,
        "C" => return None,
        _ => ChangeState::Unknown,
    };
    Some(FileChange::new(path, kind, false))
}
