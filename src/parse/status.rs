// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Parser for `git status -b --porcelain=v1` output.
//!
//! ```text
//! ## main...origin/main [ahead 2, behind 1]     header (optional)
//! M  src/lib.rs                                 XY path
//!  M README.md                                  X = staged, Y = unstaged
//! ?? notes.txt                                  untracked: unstaged Added
//! R  old -> new                                 rename/copy: skipped
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{ChangeState, FileChange};

use super::unescape::unescape_path;

/// Branch header of the status output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusHeader {
    pub local: Option<String>,
    pub remote: Option<String>,
    pub behind: u32,
    pub ahead: u32,
}

/// One path with the state of both areas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    pub path: String,
    pub staged: ChangeState,
    pub unstaged: ChangeState,
}

impl StatusRecord {
    /// Expands the record into per-area changes: unstaged first, then staged.
    ///
    /// Areas in [`ChangeState::Unchanged`] produce nothing. A path whose
    /// escaped form cannot be decoded produces nothing at all.
    #[must_use]
    pub fn expand(&self) -> Vec<FileChange> {
        let Some(path) = unescape_path(&self.path) else {
            return Vec::new();
        };

        let mut changes = Vec::with_capacity(2);
        if self.unstaged != ChangeState::Unchanged {
            changes.push(FileChange::new(path.clone(), self.unstaged, false));
        }
        if self.staged != ChangeState::Unchanged {
            changes.push(FileChange::new(path, self.staged, true));
        }
        changes
    }
}

/// Parsed status output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedStatus {
    pub header: StatusHeader,
    pub records: Vec<StatusRecord>,
}

impl ParsedStatus {
    /// All records expanded into [`FileChange`]s, in output order.
    #[must_use]
    pub fn changes(&self) -> Vec<FileChange> {
        self.records.iter().flat_map(StatusRecord::expand).collect()
    }
}

static HEADER_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^## (.+?)(?:\.\.\.(.+?))?(?: \[([a-z]+ [0-9]+)(?:, ([a-z]+ [0-9]+))?\]| \[gone\]| \((.+?)\))?$",
    )
    .ok()
});

const UNBORN_PREFIXES: [&str; 2] = ["No commits yet on ", "Initial commit on "];

/// Parses porcelain status output.
///
/// With a `pathspec` other than `"."`, several matching lines fold into one
/// record for the pathspec itself: each area keeps the kind its non-unchanged
/// entries agree on, and becomes [`ChangeState::Modified`] when they disagree.
#[must_use]
pub fn parse_status(output: &str, pathspec: &str) -> ParsedStatus {
    let mut lines = output.lines().peekable();

    let header = match lines.peek() {
        Some(first) if first.starts_with("## ") => {
            let header = parse_header(first);
            lines.next();
            header
        }
        _ => StatusHeader::default(),
    };

    let mut records: Vec<StatusRecord> = lines.filter_map(parse_line).collect();
    if pathspec != "." && records.len() > 1 {
        records = vec![aggregate(pathspec, &records)];
    }

    ParsedStatus { header, records }
}

fn parse_header(line: &str) -> StatusHeader {
    let Some(caps) = HEADER_RE.as_ref().and_then(|re| re.captures(line)) else {
        return StatusHeader::default();
    };

    let mut header = StatusHeader {
        local: caps.get(1).map(|m| unborn_branch(m.as_str()).to_string()),
        remote: caps.get(2).map(|m| m.as_str().to_string()),
        ..StatusHeader::default()
    };

    for count in [caps.get(3), caps.get(4)].into_iter().flatten() {
        let Some((label, value)) = count.as_str().split_once(' ') else {
            continue;
        };
        let Ok(value) = value.parse::<u32>() else {
            continue;
        };
        match label {
            "ahead" => header.ahead = value,
            "behind" => header.behind = value,
            _ => {}
        }
    }

    header
}

fn unborn_branch(local: &str) -> &str {
    UNBORN_PREFIXES
        .iter()
        .find_map(|prefix| local.strip_prefix(prefix))
        .unwrap_or(local)
}

fn parse_line(line: &str) -> Option<StatusRecord> {
    let bytes = line.as_bytes();
    if bytes.len() < 4 {
        return None;
    }
    let path = line.get(3..)?.to_string();

    if &bytes[..2] == b"??" {
        return Some(StatusRecord {
            path,
            staged: ChangeState::Unchanged,
            unstaged: ChangeState::Added,
        });
    }
    if bytes[..2].iter().any(|b| matches!(b, b'R' | b'C')) {
        return None;
    }

    Some(StatusRecord {
        path,
        staged: state_from_code(bytes[0]),
        unstaged: state_from_code(bytes[1]),
    })
}

const fn state_from_code(code: u8) -> ChangeState {
    match code {
        b' ' => ChangeState::Unchanged,
        b'A' => ChangeState::Added,
        b'D' | b'R' => ChangeState::Removed,
        b'M' => ChangeState::Modified,
        b'C' => ChangeState::Copied,
        b'!' => ChangeState::Ignored,
        _ => ChangeState::Unknown,
    }
}

fn aggregate(pathspec: &str, records: &[StatusRecord]) -> StatusRecord {
    StatusRecord {
        path: pathspec.to_string(),
        staged: merge_states(records.iter().map(|r| r.staged)),
        unstaged: merge_states(records.iter().map(|r| r.unstaged)),
    }
}

fn merge_states(states: impl Iterator<Item = ChangeState>) -> ChangeState {
    states
        .filter(|s| *s != ChangeState::Unchanged)
        .fold(None, |acc, state| match acc {
            None => Some(state),
            Some(seen) if seen == state => Some(seen),
            Some(_) => Some(ChangeState::Modified),
        })
        .unwrap_or(ChangeState::Unchanged)
}
