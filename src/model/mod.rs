// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Structured records produced by backends.
//!
//! ```text
//! ChangeState   unchanged=0 added=1 removed=2 modified=3
//!               renamed=10 copied=11 ignored=98 unknown=99
//! FileChange    { path, kind, staged, comment }
//! BranchSet     { local, editable, tags, remote }
//! RepositoryStatus { local_branch, remote_branch, behind, ahead, changes }
//! CommitRecord  { id, title, description, content, author_*, commit_date }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ChangeStateError;

/// The change state a file can have in one area (index or working tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeState {
    Unchanged,
    Added,
    Removed,
    /// Also known as "edited".
    Modified,
    Renamed,
    Copied,
    Ignored,
    Unknown,
}

impl ChangeState {
    /// Every state, in code order.
    pub const ALL: [Self; 8] = [
        Self::Unchanged,
        Self::Added,
        Self::Removed,
        Self::Modified,
        Self::Renamed,
        Self::Copied,
        Self::Ignored,
        Self::Unknown,
    ];

    /// Stable small-integer code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Unchanged => 0,
            Self::Added => 1,
            Self::Removed => 2,
            Self::Modified => 3,
            Self::Renamed => 10,
            Self::Copied => 11,
            Self::Ignored => 98,
            Self::Unknown => 99,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Ignored => "ignored",
            Self::Unknown => "unknown",
        }
    }

    /// Looks a state up by code.
    ///
    /// # Errors
    ///
    /// Returns [`ChangeStateError::UnknownCode`] for a code no state uses.
    pub fn from_code(code: u8) -> Result<Self, ChangeStateError> {
        Self::ALL
            .into_iter()
            .find(|state| state.code() == code)
            .ok_or(ChangeStateError::UnknownCode(code))
    }

    /// Looks a state up by name (case-insensitive, `edited` accepted).
    ///
    /// # Errors
    ///
    /// Returns [`ChangeStateError::UnknownName`] for an unknown name.
    pub fn from_name(name: &str) -> Result<Self, ChangeStateError> {
        let lower = name.to_ascii_lowercase();
        if lower == "edited" {
            return Ok(Self::Modified);
        }
        Self::ALL
            .into_iter()
            .find(|state| state.name() == lower)
            .ok_or_else(|| ChangeStateError::UnknownName(name.to_string()))
    }
}

impl fmt::Display for ChangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChangeState {
    type Err = ChangeStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl TryFrom<u8> for ChangeState {
    type Error = ChangeStateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}

impl From<ChangeState> for u8 {
    fn from(state: ChangeState) -> Self {
        state.code()
    }
}

impl Serialize for ChangeState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ChangeState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name).map_err(serde::de::Error::custom)
    }
}

/// One file's state in one area.
///
/// A path reported with independent index and working-tree states yields two
/// records (one staged, one unstaged); a path unchanged in both yields none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeState,
    pub staged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl FileChange {
    pub fn new(path: impl Into<String>, kind: ChangeState, staged: bool) -> Self {
        Self {
            path: path.into(),
            kind,
            staged,
            comment: None,
        }
    }
}

/// Branch-like names known to a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSet {
    pub local: Vec<String>,
    /// Subset of `local` where committing is allowed.
    pub editable: Vec<String>,
    pub tags: Vec<String>,
    pub remote: Vec<String>,
}

/// Commits to pull and to push.
///
/// `ahead` is `None` when the backend cannot push.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCounts {
    pub behind: u32,
    pub ahead: Option<u32>,
}

/// Summary of a repository's branch and working state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStatus {
    pub local_branch: Option<String>,
    pub remote_branch: Option<String>,
    pub behind: u32,
    pub ahead: Option<u32>,
    pub changes: Vec<FileChange>,
}

impl RepositoryStatus {
    #[must_use]
    pub const fn counts(&self) -> SyncCounts {
        SyncCounts {
            behind: self.behind,
            ahead: self.ahead,
        }
    }
}

/// One commit from the history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Always `title + "\n" + description`.
    pub content: String,
    pub author_username: String,
    pub author_email: String,
    pub commit_date: Option<DateTime<Utc>>,
}

impl CommitRecord {
    /// Builds a record, deriving `content` from title and description.
    #[must_use]
    pub fn new(
        id: String,
        title: String,
        description: String,
        author_username: String,
        author_email: String,
        commit_date: Option<DateTime<Utc>>,
    ) -> Self {
        let content = format!("{title}\n{description}");
        Self {
            id,
            title,
            description,
            content,
            author_username,
            author_email,
            commit_date,
        }
    }
}

#[cfg(test)]
mod tests;
