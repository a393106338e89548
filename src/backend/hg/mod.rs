// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mercurial backend.
//!
//! ```text
//! hg root          repository root
//! hg branch        current branch
//! hg branches -q   branches (all editable)
//! hg tags -q       tags, without the moving `tip`
//! hg status        changes; Mercurial has no staging area
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use serde_json::json;
use tracing::debug;

use crate::error::{BackendUnavailable, OperationError, PropertyError, PropertyOp, VcsResult};
use crate::feature::{FeatureTable, Operation};
use crate::model::{BranchSet, ChangeState, FileChange, RepositoryStatus};
use crate::parse::hg::parse_hg_status;
use crate::parse::parse_ref_list;

use super::{BackendContext, Tool, VcsBackend};

/// `HGPLAIN` disables localisation and user aliases.
const HG_ENV: &[(&str, &str)] = &[("HGPLAIN", "1")];

static HG_FEATURES: LazyLock<FeatureTable> = LazyLock::new(|| {
    let states = json!({"states": ["path", "kind", "staged"]});
    FeatureTable::builder()
        .enable_all(&[
            Operation::Status,
            Operation::BranchGet,
            Operation::Branches,
            Operation::EditableBranches,
        ])
        .enable_with(Operation::Tags, json!({"branch": true}))
        .enable_with(Operation::Change, states.clone())
        .enable_with(Operation::Changes, states)
        .build()
});

/// A Mercurial working directory.
#[derive(Debug)]
pub struct MercurialBackend {
    hg: Tool,
}

impl MercurialBackend {
    pub const NAME: &'static str = "mercurial";

    /// Binds to the repository containing `directory`.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` when `hg` is missing or `directory` is
    /// not inside a Mercurial repository.
    pub fn open(directory: &Path, ctx: &BackendContext) -> VcsResult<Self> {
        if !directory.is_dir() {
            return Err(BackendUnavailable::not_a_repository(directory, Self::NAME).into());
        }
        let program = ctx
            .find_program("hg", ctx.settings.hg_program.as_deref())
            .ok_or_else(|| BackendUnavailable::missing_program(directory, Self::NAME, "hg"))?;

        let mut hg = Tool::new(
            Self::NAME,
            program,
            directory.to_path_buf(),
            HG_ENV,
            Arc::clone(&ctx.runner),
        );
        let output = hg.run(["root"])?;
        let root = output.stdout_text();
        let root = root.trim_end_matches(['\r', '\n']);
        if !output.success() || root.is_empty() {
            return Err(BackendUnavailable::not_a_repository(directory, Self::NAME).into());
        }
        hg.rebind(PathBuf::from(root));
        debug!(root, "mercurial repository");
        Ok(Self { hg })
    }

    fn list(&self, args: &[&str], property: &'static str) -> VcsResult<Vec<String>> {
        let output = self.hg.run(args)?;
        if !output.success() {
            return Err(PropertyError::new(property, PropertyOp::Get)
                .with_raw(output.stderr_text())
                .into());
        }
        Ok(parse_ref_list(&output.stdout_text()))
    }

    fn hg_status(&self, path: Option<&str>) -> VcsResult<Vec<FileChange>> {
        let mut args = vec!["status"];
        if let Some(path) = path {
            args.extend(["--", path]);
        }
        let output = self.hg.run(&args)?;
        if !output.success() {
            return Err(OperationError::new("status")
                .with_error("failed to get mercurial status")
                .with_raw(output.stderr_text())
                .into());
        }
        Ok(parse_hg_status(&output.stdout_text()))
    }
}

impl VcsBackend for MercurialBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn features(&self) -> &'static FeatureTable {
        &HG_FEATURES
    }

    fn repo_dir(&self) -> &Path {
        self.hg.cwd()
    }

    fn status(&self) -> VcsResult<RepositoryStatus> {
        Ok(RepositoryStatus {
            local_branch: self.branch().ok(),
            remote_branch: None,
            behind: 0,
            ahead: None,
            changes: self.hg_status(None)?,
        })
    }

    fn branch(&self) -> VcsResult<String> {
        let output = self.hg.run(["branch"])?;
        let name = output.stdout_text().trim().to_string();
        if !output.success() || name.is_empty() {
            return Err(PropertyError::new("branch", PropertyOp::Get)
                .with_raw(output.stderr_text())
                .into());
        }
        Ok(name)
    }

    fn branches(&self) -> VcsResult<Vec<String>> {
        self.list(&["branches", "-q"], "branches")
    }

    fn editable_branches(&self) -> VcsResult<Vec<String>> {
        self.list(&["branches", "-q"], "editable_branches")
    }

    fn tags(&self) -> VcsResult<Vec<String>> {
        let mut tags = self.list(&["tags", "-q"], "tags")?;
        tags.retain(|tag| tag != "tip");
        Ok(tags)
    }

    fn branch_set(&self) -> VcsResult<BranchSet> {
        let local = self.branches()?;
        Ok(BranchSet {
            editable: local.clone(),
            local,
            tags: self.tags()?,
            remote: Vec::new(),
        })
    }

    fn change(&self, path: &str, _prefer_unstaged: bool) -> VcsResult<Option<FileChange>> {
        let mut changes = self.hg_status(Some(path))?;
        // "." is the whole working copy, never folded into one record.
        if path == "." || changes.len() <= 1 {
            return Ok((!changes.is_empty()).then(|| changes.swap_remove(0)));
        }
        // A directory: one record, modified unless every entry agrees.
        let first = changes[0].kind;
        let kind = if changes.iter().all(|c| c.kind == first) {
            first
        } else {
            ChangeState::Modified
        };
        Ok(Some(FileChange::new(path, kind, false)))
    }

    fn changes(&self) -> VcsResult<Vec<FileChange>> {
        self.hg_status(None)
    }
}
