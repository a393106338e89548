// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only queries.
//!
//! ```text
//! status -b -uall --porcelain=v1 --ignore-submodule=all <pathspec>
//! branch    --format %(refname:lstrip=2)
//! tag -l    --format %(refname:lstrip=2)
//! branch -r -l --format %(refname:lstrip=2)
//! log -<n> --date=unix --pretty=<HISTORY_FORMAT>
//! ```

use crate::core::process::ProcessOutput;
use crate::error::{OperationError, PropertyError, PropertyOp, VcsError, VcsResult};
use crate::model::{BranchSet, CommitRecord, FileChange, RepositoryStatus};
use crate::parse::{HISTORY_FORMAT, ParsedStatus, parse_history, parse_ref_list, parse_status};

use super::GitBackend;

const REF_FORMAT: &str = "%(refname:lstrip=2)";

impl GitBackend {
    /// Porcelain status for `pathspec`; `None` when git reports failure.
    pub(super) fn git_status(&self, pathspec: &str) -> VcsResult<Option<ParsedStatus>> {
        let output = self.git.run([
            "status",
            "-b",
            "-uall",
            "--porcelain=v1",
            "--ignore-submodule=all",
            pathspec,
        ])?;
        if !output.success() {
            return Ok(None);
        }
        Ok(Some(parse_status(&output.stdout_text(), pathspec)))
    }

    pub(super) fn repository_status(&self) -> VcsResult<RepositoryStatus> {
        let status = self.git_status(".")?.ok_or_else(|| {
            OperationError::new("status").with_error("failed to get git status")
        })?;
        Ok(RepositoryStatus {
            changes: status.changes(),
            local_branch: status.header.local,
            remote_branch: status.header.remote,
            behind: status.header.behind,
            ahead: Some(status.header.ahead),
        })
    }

    pub(super) fn current_branch(&self) -> VcsResult<String> {
        self.git_status(".")?
            .and_then(|status| status.header.local)
            .ok_or_else(|| {
                PropertyError::new("branch", PropertyOp::Get)
                    .with_error("branch unavailable")
                    .into()
            })
    }

    /// One name per line from a ref listing; `None` when empty or failed.
    fn ref_list(&self, args: &[&str]) -> VcsResult<Option<Vec<String>>> {
        let output = self.git.run(args.iter().chain(&["--format", REF_FORMAT]))?;
        if !output.success() {
            return Ok(None);
        }
        let refs = parse_ref_list(&output.stdout_text());
        Ok((!refs.is_empty()).then_some(refs))
    }

    pub(super) fn local_branches(&self) -> VcsResult<Vec<String>> {
        self.ref_list(&["branch"])?
            .ok_or_else(|| PropertyError::new("editable_branches", PropertyOp::Get).into())
    }

    pub(super) fn tag_list(&self) -> VcsResult<Vec<String>> {
        self.ref_list(&["tag", "-l"])?
            .ok_or_else(|| PropertyError::new("tags", PropertyOp::Get).into())
    }

    pub(super) fn list_branch_set(&self) -> VcsResult<BranchSet> {
        let local = self.ref_list(&["branch"])?;
        let tags = self.ref_list(&["tag", "-l"])?;
        let remote = self.ref_list(&["branch", "-r", "-l"])?;
        if local.is_none() && tags.is_none() && remote.is_none() {
            return Err(PropertyError::new("branches", PropertyOp::Get).into());
        }

        let local = local.unwrap_or_default();
        Ok(BranchSet {
            editable: local.clone(),
            local,
            tags: tags.unwrap_or_default(),
            remote: remote.unwrap_or_default(),
        })
    }

    pub(super) fn all_branches(&self) -> VcsResult<Vec<String>> {
        let set = self.list_branch_set()?;
        Ok(set
            .local
            .into_iter()
            .chain(set.tags)
            .chain(set.remote)
            .collect())
    }

    pub(super) fn path_change(
        &self,
        path: &str,
        prefer_unstaged: bool,
    ) -> VcsResult<Option<FileChange>> {
        let status = self.git_status(path)?.ok_or_else(|| {
            OperationError::new("change").with_error("failed to get git changes")
        })?;

        for record in &status.records {
            let mut changes = record.expand();
            match changes.len() {
                // unstaged first, staged second
                2 => return Ok(Some(changes.swap_remove(usize::from(!prefer_unstaged)))),
                1 => return Ok(changes.pop()),
                _ => {}
            }
        }
        Ok(None)
    }

    pub(super) fn all_changes(&self) -> VcsResult<Vec<FileChange>> {
        self.git_status(".")?
            .map(|status| status.changes())
            .ok_or_else(|| {
                PropertyError::new("changes", PropertyOp::Get)
                    .with_error("failed to get git changes")
                    .into()
            })
    }

    /// Runs `log` for `count` commits, newest first, starting at `revision`.
    pub(super) fn log_output(
        &self,
        count: u32,
        revision: Option<&str>,
    ) -> VcsResult<ProcessOutput> {
        let count = format!("-{count}");
        let pretty = format!("--pretty={HISTORY_FORMAT}");
        let mut args = vec!["log", count.as_str(), "--date=unix", pretty.as_str()];
        args.extend(revision);
        self.git.run(&args)
    }

    pub(super) fn history(&self, commits: u32) -> VcsResult<Vec<CommitRecord>> {
        if commits < 1 {
            return Err(VcsError::invalid_argument(
                "only numbers greater or equal than 1 are allowed",
            ));
        }
        let output = self.log_output(commits, None)?;
        if !output.success() {
            return Err(OperationError::new("get_last_commits")
                .with_error("failed to get git history")
                .with_raw(output.stderr_text())
                .into());
        }
        Ok(parse_history(&output.stdout_text()))
    }
}
