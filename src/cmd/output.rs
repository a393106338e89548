// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Text and JSON rendering of command results.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Context;
use serde::Serialize;

use crate::error::Result;
use crate::model::{CommitRecord, FileChange, RepositoryStatus, SyncCounts};

/// Destination of command results.
pub struct Output<'a> {
    json: bool,
    out: &'a mut dyn Write,
}

impl<'a> Output<'a> {
    pub fn new(out: &'a mut dyn Write, json: bool) -> Self {
        Self { json, out }
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Writes `value` as pretty JSON, or `text` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn emit<T: Serialize + ?Sized>(&mut self, value: &T, text: &str) -> Result<()> {
        if self.json {
            let rendered =
                serde_json::to_string_pretty(value).context("Failed to serialize output")?;
            writeln!(self.out, "{rendered}")?;
        } else if !text.is_empty() {
            writeln!(self.out, "{text}")?;
        }
        Ok(())
    }

    /// Writes one line per item, or the items as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn list(&mut self, items: &[String]) -> Result<()> {
        self.emit(items, &items.join("\n"))
    }
}

/// One change as `staged|unstaged  kind  path`.
#[must_use]
pub fn change_line(change: &FileChange) -> String {
    let area = if change.staged { "staged" } else { "unstaged" };
    format!("{area:<9} {:<9} {}", change.kind.name(), change.path)
}

/// Tracking summary such as `ahead 1, behind 2`.
#[must_use]
pub fn counts_line(counts: SyncCounts) -> String {
    match counts.ahead {
        Some(ahead) => format!("ahead {ahead}, behind {}", counts.behind),
        None => format!("behind {}", counts.behind),
    }
}

/// Multi-line status report.
#[must_use]
pub fn status_text(status: &RepositoryStatus) -> String {
    let mut text = match &status.local_branch {
        Some(branch) => format!("On branch {branch}"),
        None => "Not on a branch".to_string(),
    };
    if let Some(remote) = &status.remote_branch {
        let _ = write!(text, " (tracking {remote}, {})", counts_line(status.counts()));
    }
    if status.changes.is_empty() {
        text.push_str("\nnothing to commit, working tree clean");
    }
    for change in &status.changes {
        text.push('\n');
        text.push_str(&change_line(change));
    }
    text
}

/// One commit as `id date author  title`.
#[must_use]
pub fn commit_line(commit: &CommitRecord) -> String {
    let id: String = commit.id.chars().take(10).collect();
    let date = commit
        .commit_date
        .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d %H:%M").to_string());
    format!("{id} {date} {}  {}", commit.author_username, commit.title)
}
