// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend.
//!
//! ```text
//!                 GitBackend::open(dir)
//!        locate git --> rev-parse --show-toplevel --> repo root
//!                            |
//!        +-------------------+-------------------+
//!        v                   v                   v
//!    query.rs             ops.rs             remote.rs
//!   status -b            checkout/branch     fetch/pull/push
//!   branch/tag lists     add/reset/commit    credential session
//!   log history          undo                credential store
//! ```
//!
//! Every operation shells out through the injected `ProcessRunner`; a
//! spawn failure surfaces as `BackendUnavailable`.

mod ops;
mod query;
mod remote;

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use serde_json::json;
use tracing::debug;

use crate::auth::{CredentialFields, CredentialStore, Credentials, TerminalLauncher};
use crate::error::{BackendUnavailable, VcsResult};
use crate::feature::{FeatureTable, Operation};
use crate::model::{BranchSet, CommitRecord, FileChange, RepositoryStatus, SyncCounts};

use super::{BackendContext, BackendSettings, Tool, VcsBackend};

/// Environment for non-interactive git runs.
const GIT_ENV: &[(&str, &str)] = &[
    ("GCM_INTERACTIVE", "never"),
    ("GIT_TERMINAL_PROMPT", "0"),
    ("LC_ALL", "C"),
];

static GIT_FEATURES: LazyLock<FeatureTable> = LazyLock::new(|| git_features(true));
static GIT_FEATURES_NATIVE_CREDENTIALS: LazyLock<FeatureTable> =
    LazyLock::new(|| git_features(false));

fn git_features(credentials: bool) -> FeatureTable {
    let states = json!({"states": ["path", "kind", "staged"]});
    let mut builder = FeatureTable::builder()
        .enable_all(&[
            Operation::Status,
            Operation::BranchGet,
            Operation::BranchSet,
            Operation::Branches,
            Operation::EditableBranches,
            Operation::CreateBranch,
            Operation::DeleteBranch,
            Operation::Stage,
            Operation::Unstage,
            Operation::StageAll,
            Operation::UnstageAll,
            Operation::Commit,
            Operation::Fetch,
            Operation::Pull,
            Operation::Push,
            Operation::UndoCommit,
            Operation::UndoStage,
            Operation::UndoChange,
            Operation::UndoChangeAll,
        ])
        .enable_with(Operation::Change, states.clone())
        .enable_with(Operation::Changes, states)
        .enable_with(Operation::Tags, json!({"branch": true}))
        .enable_with(
            Operation::GetLastCommits,
            json!({"attrs": [
                "id",
                "title",
                "description",
                "content",
                "author_username",
                "author_email",
                "commit_date",
            ]}),
        );
    if credentials {
        builder = builder.enable_all(&[
            Operation::CredentialsGet,
            Operation::CredentialsSet,
            Operation::CredentialsClear,
        ]);
    }
    builder.build()
}

/// A git working tree.
#[derive(Debug)]
pub struct GitBackend {
    git: Tool,
    launcher: Arc<dyn TerminalLauncher>,
    store: Option<Arc<dyn CredentialStore>>,
    settings: BackendSettings,
    credentials: Credentials,
}

impl GitBackend {
    pub const NAME: &'static str = "git";

    /// Binds to the working tree containing `directory`.
    ///
    /// # Errors
    ///
    /// Returns `BackendUnavailable` when git cannot be found or `directory`
    /// is not inside a git working tree.
    pub fn open(directory: &Path, ctx: &BackendContext) -> VcsResult<Self> {
        if !directory.is_dir() {
            return Err(BackendUnavailable::not_a_repository(directory, Self::NAME).into());
        }
        let program = ctx
            .find_program("git", ctx.settings.git_program.as_deref())
            .ok_or_else(|| BackendUnavailable::missing_program(directory, Self::NAME, "git"))?;

        let mut git = Tool::new(
            Self::NAME,
            program,
            directory.to_path_buf(),
            GIT_ENV,
            Arc::clone(&ctx.runner),
        );

        let output = git.run(["rev-parse", "--show-toplevel"])?;
        let root = output.stdout_text();
        let root = root.trim_end_matches(['\r', '\n']);
        if !output.success() || root.is_empty() {
            return Err(BackendUnavailable::not_a_repository(directory, Self::NAME).into());
        }
        git.rebind(PathBuf::from(root));
        debug!(root, "git repository");

        let mut backend = Self {
            git,
            launcher: Arc::clone(&ctx.launcher),
            store: ctx.store.clone(),
            settings: ctx.settings.clone(),
            credentials: Credentials::default(),
        };
        if !backend.settings.credential_manager {
            backend.load_stored_credentials();
        }
        Ok(backend)
    }
}

impl VcsBackend for GitBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn features(&self) -> &'static FeatureTable {
        if self.settings.credential_manager {
            &GIT_FEATURES_NATIVE_CREDENTIALS
        } else {
            &GIT_FEATURES
        }
    }

    fn repo_dir(&self) -> &Path {
        self.git.cwd()
    }

    fn required_credentials(&self) -> CredentialFields {
        if self.settings.credential_manager {
            CredentialFields::empty()
        } else {
            CredentialFields::USERNAME | CredentialFields::PASSWORD
        }
    }

    fn credentials(&self) -> VcsResult<Credentials> {
        Ok(self.credentials.clone())
    }

    fn set_credentials(&mut self, credentials: Credentials) -> VcsResult<()> {
        self.store_credentials(credentials);
        Ok(())
    }

    fn clear_credentials(&mut self) -> VcsResult<()> {
        self.forget_credentials();
        Ok(())
    }

    fn status(&self) -> VcsResult<RepositoryStatus> {
        self.repository_status()
    }

    fn branch(&self) -> VcsResult<String> {
        self.current_branch()
    }

    fn set_branch(&mut self, name: &str) -> VcsResult<()> {
        self.checkout(name)
    }

    fn branches(&self) -> VcsResult<Vec<String>> {
        self.all_branches()
    }

    fn editable_branches(&self) -> VcsResult<Vec<String>> {
        self.local_branches()
    }

    fn tags(&self) -> VcsResult<Vec<String>> {
        self.tag_list()
    }

    fn branch_set(&self) -> VcsResult<BranchSet> {
        self.list_branch_set()
    }

    fn create_branch(&mut self, name: &str, from_current: bool) -> VcsResult<bool> {
        self.new_branch(name, from_current)
    }

    fn delete_branch(&mut self, name: &str) -> VcsResult<bool> {
        self.remove_branch(name)
    }

    fn change(&self, path: &str, prefer_unstaged: bool) -> VcsResult<Option<FileChange>> {
        self.path_change(path, prefer_unstaged)
    }

    fn changes(&self) -> VcsResult<Vec<FileChange>> {
        self.all_changes()
    }

    fn stage(&mut self, path: &str) -> VcsResult<bool> {
        self.add(path)
    }

    fn unstage(&mut self, path: &str) -> VcsResult<bool> {
        self.reset(path)
    }

    fn stage_all(&mut self) -> VcsResult<bool> {
        self.add_all()
    }

    fn unstage_all(&mut self) -> VcsResult<bool> {
        self.reset_all()
    }

    fn commit(&mut self, message: &str, is_path: Option<bool>) -> VcsResult<bool> {
        self.record_commit(message, is_path)
    }

    fn fetch(&mut self, sync: bool) -> VcsResult<SyncCounts> {
        self.fetch_counts(sync)
    }

    fn pull(&mut self) -> VcsResult<bool> {
        self.remote_operation(Operation::Pull)
    }

    fn push(&mut self) -> VcsResult<bool> {
        self.remote_operation(Operation::Push)
    }

    fn undo_commit(&mut self, commits: u32) -> VcsResult<Option<CommitRecord>> {
        self.soft_reset(commits)
    }

    fn undo_stage(&mut self, path: &str) -> VcsResult<bool> {
        self.reset(path)
    }

    fn undo_change(&mut self, path: &str) -> VcsResult<bool> {
        self.discard(path)
    }

    fn undo_change_all(&mut self) -> VcsResult<bool> {
        self.discard(".")
    }

    fn get_last_commits(&self, commits: u32) -> VcsResult<Vec<CommitRecord>> {
        self.history(commits)
    }
}
