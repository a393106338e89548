// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Operations that change the repository.
//!
//! Success is judged by re-reading repository state rather than by git's
//! exit code alone.

use std::path::Path;

use tracing::debug;

use crate::error::{OperationError, PropertyError, PropertyOp, VcsError, VcsResult};
use crate::model::{ChangeState, CommitRecord, FileChange};
use crate::parse::parse_history_record;

use super::GitBackend;

/// An unstaged record that `checkout --` cannot revert (untracked file).
fn is_untracked(change: &FileChange) -> bool {
    !change.staged && change.kind == ChangeState::Added
}

impl GitBackend {
    pub(super) fn checkout(&mut self, name: &str) -> VcsResult<()> {
        let output = self.git.run(["checkout", name])?;
        let current = self.current_branch().ok();
        if !output.success() || current.as_deref() != Some(name) {
            return Err(PropertyError::new("branch", PropertyOp::Set)
                .with_raw(output.stderr_text())
                .into());
        }
        Ok(())
    }

    pub(super) fn new_branch(&mut self, name: &str, from_current: bool) -> VcsResult<bool> {
        let mode = if from_current { "-b" } else { "--orphan" };
        if !self.git.run(["checkout", mode, name])?.success() {
            return Ok(false);
        }
        if !from_current {
            // Orphan branches start with the old tree staged; empty it.
            let cleared = self.git.run(["rm", "-r", "-q", "--ignore-unmatch", "."])?;
            if !cleared.success() {
                return Ok(false);
            }
        }
        Ok(self.current_branch().ok().as_deref() == Some(name))
    }

    pub(super) fn remove_branch(&mut self, name: &str) -> VcsResult<bool> {
        if self.current_branch().ok().as_deref() == Some(name) {
            debug!(branch = name, "refusing to delete the current branch");
            return Ok(false);
        }
        Ok(self.git.run(["branch", "-d", name])?.success())
    }

    /// Stages `path`; succeeds when nothing under it is left unstaged.
    pub(super) fn add(&mut self, path: &str) -> VcsResult<bool> {
        if !self.git.run(["add", "--", path])?.success() {
            return Ok(false);
        }
        Ok(self
            .path_change(path, true)?
            .is_some_and(|change| change.staged))
    }

    /// Unstages `path`; succeeds when its remaining record is unstaged.
    pub(super) fn reset(&mut self, path: &str) -> VcsResult<bool> {
        if !self.git.run(["reset", "-q", "--", path])?.success() {
            return Ok(false);
        }
        Ok(self
            .path_change(path, false)?
            .is_some_and(|change| !change.staged))
    }

    pub(super) fn add_all(&mut self) -> VcsResult<bool> {
        if !self.git.run(["add", "--all", "--", "."])?.success() {
            return Ok(false);
        }
        Ok(self.all_changes()?.iter().all(|change| change.staged))
    }

    pub(super) fn reset_all(&mut self) -> VcsResult<bool> {
        if !self.git.run(["reset", "-q", "--", "."])?.success() {
            return Ok(false);
        }
        Ok(self.all_changes()?.iter().all(|change| !change.staged))
    }

    pub(super) fn record_commit(&mut self, message: &str, is_path: Option<bool>) -> VcsResult<bool> {
        let is_path = is_path.unwrap_or_else(|| {
            !message.is_empty() && self.git.cwd().join(Path::new(message)).is_file()
        });

        let output = if is_path {
            self.git.run(["commit", "-F", message])?
        } else {
            let mut args = vec!["commit"];
            for paragraph in message.split("\n\n").filter(|p| !p.trim().is_empty()) {
                args.extend(["-m", paragraph]);
            }
            if args.len() == 1 {
                return Ok(false);
            }
            self.git.run(&args)?
        };
        Ok(output.success())
    }

    /// Discards unstaged changes under `path`; untracked files are kept.
    pub(super) fn discard(&mut self, path: &str) -> VcsResult<bool> {
        if !self.git.run(["checkout", "--", path])?.success() {
            return Ok(false);
        }
        let reverted = if path == "." {
            self.all_changes()?
                .iter()
                .all(|change| change.staged || is_untracked(change))
        } else {
            self.path_change(path, true)?
                .is_none_or(|change| change.staged || is_untracked(&change))
        };
        Ok(reverted)
    }

    /// `reset --soft HEAD~n`, clamped so the root commit survives.
    pub(super) fn soft_reset(&mut self, commits: u32) -> VcsResult<Option<CommitRecord>> {
        if commits < 1 {
            return Err(VcsError::invalid_argument(
                "only numbers greater or equal than 1 are allowed",
            ));
        }

        let output = self
            .git
            .run(["rev-list", "HEAD", "--count", "--first-parent"])?;
        if !output.success() {
            let branch = self.current_branch().unwrap_or_default();
            return Err(OperationError::new("undo_commit")
                .with_error(format!("failed to get the number of commits in branch {branch}"))
                .with_raw(output.stderr_text())
                .into());
        }

        let mut commits = commits;
        if let Ok(available) = output.stdout_text().trim().parse::<u32>()
            && commits >= available
        {
            commits = available.saturating_sub(1);
        }
        if commits == 0 {
            return Err(OperationError::new("undo_commit")
                .with_error("the root commit cannot be undone")
                .into());
        }

        let oldest = format!("HEAD~{}", commits - 1);
        let log = self.log_output(1, Some(&oldest))?;
        let record = if log.success() {
            parse_history_record(log.stdout_text().trim_end_matches('\0'))
        } else {
            None
        };

        let target = format!("HEAD~{commits}");
        let reset = self.git.run(["reset", "--soft", target.as_str()])?;
        if !reset.success() {
            return Err(OperationError::new("undo_commit")
                .with_error(format!("failed to undo {commits} commits"))
                .with_raw(reset.stderr_text())
                .into());
        }
        Ok(record)
    }
}
