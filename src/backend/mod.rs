// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backend interface and construction.
//!
//! ```text
//!   BackendFactory { name, probe }
//!          |
//!          v  probe(dir, &BackendContext)
//!   Probe::Ready(Box<dyn VcsBackend>)      backend owns the repository root
//!   Probe::NotApplicable(BackendUnavailable)  tool missing / not a repo
//!   Probe::Failed(VcsError)                anything else: stop probing
//!
//!   BackendContext
//!     runner    ProcessRunner       (std::process)
//!     locator   ExecutableLocator   (which)
//!     launcher  TerminalLauncher    (portable-pty)
//!     store     CredentialStore     (optional)
//!     settings  credential manager, session timeout, program overrides
//! ```
//!
//! Every [`VcsBackend`] method has a default body returning
//! [`VcsError::Unsupported`]; a backend overrides what its feature table
//! enables.

pub mod git;
pub mod hg;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bon::Builder;

use crate::auth::session::DEFAULT_SESSION_TIMEOUT;
use crate::auth::{
    CredentialFields, CredentialStore, Credentials, PtyLauncher, TerminalLauncher,
};
use crate::core::process::{
    ExecutableLocator, ProcessBuilder, ProcessOutput, ProcessRunner, SystemRunner, WhichLocator,
};
use crate::error::{BackendUnavailable, VcsError, VcsResult};
use crate::feature::{FeatureTable, Operation};
use crate::model::{BranchSet, CommitRecord, FileChange, RepositoryStatus, SyncCounts};

pub use git::GitBackend;
pub use hg::MercurialBackend;

/// Operations shared by every version-control backend.
///
/// A backend instance is bound to exactly one repository directory for its
/// whole lifetime.
#[allow(unused_variables)]
pub trait VcsBackend: Send + fmt::Debug {
    /// Short backend name (`git`, `mercurial`).
    fn name(&self) -> &'static str;

    /// The backend's capability table.
    fn features(&self) -> &'static FeatureTable;

    /// Root of the bound repository.
    fn repo_dir(&self) -> &Path;

    /// Credential fields remote operations need.
    fn required_credentials(&self) -> CredentialFields {
        CredentialFields::empty()
    }

    fn credentials(&self) -> VcsResult<Credentials> {
        unsupported(Operation::CredentialsGet)
    }

    fn set_credentials(&mut self, credentials: Credentials) -> VcsResult<()> {
        unsupported(Operation::CredentialsSet)
    }

    fn clear_credentials(&mut self) -> VcsResult<()> {
        unsupported(Operation::CredentialsClear)
    }

    /// Branch, tracking and change summary in one query.
    fn status(&self) -> VcsResult<RepositoryStatus> {
        unsupported(Operation::Status)
    }

    /// Current branch.
    fn branch(&self) -> VcsResult<String> {
        unsupported(Operation::BranchGet)
    }

    /// Switches to `name`; fails unless the reported branch is `name` afterwards.
    fn set_branch(&mut self, name: &str) -> VcsResult<()> {
        unsupported(Operation::BranchSet)
    }

    /// Every branch-like name: local branches, tags and remote branches.
    fn branches(&self) -> VcsResult<Vec<String>> {
        unsupported(Operation::Branches)
    }

    /// Branches that can be checked out and committed to.
    fn editable_branches(&self) -> VcsResult<Vec<String>> {
        unsupported(Operation::EditableBranches)
    }

    fn tags(&self) -> VcsResult<Vec<String>> {
        unsupported(Operation::Tags)
    }

    /// Branch names split by kind.
    fn branch_set(&self) -> VcsResult<BranchSet> {
        unsupported(Operation::Branches)
    }

    /// Creates and switches to a branch, seeded from the current one or orphaned.
    fn create_branch(&mut self, name: &str, from_current: bool) -> VcsResult<bool> {
        unsupported(Operation::CreateBranch)
    }

    /// Deletes a branch other than the current one.
    fn delete_branch(&mut self, name: &str) -> VcsResult<bool> {
        unsupported(Operation::DeleteBranch)
    }

    /// State of one path. When both areas changed, the staged record is
    /// returned unless `prefer_unstaged` is set.
    fn change(&self, path: &str, prefer_unstaged: bool) -> VcsResult<Option<FileChange>> {
        unsupported(Operation::Change)
    }

    /// Every changed path, unstaged record before staged record.
    fn changes(&self) -> VcsResult<Vec<FileChange>> {
        unsupported(Operation::Changes)
    }

    fn stage(&mut self, path: &str) -> VcsResult<bool> {
        unsupported(Operation::Stage)
    }

    fn unstage(&mut self, path: &str) -> VcsResult<bool> {
        unsupported(Operation::Unstage)
    }

    fn stage_all(&mut self) -> VcsResult<bool> {
        unsupported(Operation::StageAll)
    }

    fn unstage_all(&mut self) -> VcsResult<bool> {
        unsupported(Operation::UnstageAll)
    }

    /// Commits staged changes. `is_path = None` treats `message` as a
    /// message file when such a file exists.
    fn commit(&mut self, message: &str, is_path: Option<bool>) -> VcsResult<bool> {
        unsupported(Operation::Commit)
    }

    /// Optionally synchronises with the remote, then reports behind/ahead.
    fn fetch(&mut self, sync: bool) -> VcsResult<SyncCounts> {
        unsupported(Operation::Fetch)
    }

    fn pull(&mut self) -> VcsResult<bool> {
        unsupported(Operation::Pull)
    }

    fn push(&mut self) -> VcsResult<bool> {
        unsupported(Operation::Push)
    }

    /// Undoes the last `commits` commits, keeping their changes staged.
    /// Returns the oldest undone commit when it could be read.
    fn undo_commit(&mut self, commits: u32) -> VcsResult<Option<CommitRecord>> {
        unsupported(Operation::UndoCommit)
    }

    fn undo_stage(&mut self, path: &str) -> VcsResult<bool> {
        unsupported(Operation::UndoStage)
    }

    /// Discards unstaged changes of `path`.
    fn undo_change(&mut self, path: &str) -> VcsResult<bool> {
        unsupported(Operation::UndoChange)
    }

    fn undo_change_all(&mut self) -> VcsResult<bool> {
        unsupported(Operation::UndoChangeAll)
    }

    /// The most recent `commits` commits, newest first.
    fn get_last_commits(&self, commits: u32) -> VcsResult<Vec<CommitRecord>> {
        unsupported(Operation::GetLastCommits)
    }
}

const fn unsupported<T>(operation: Operation) -> VcsResult<T> {
    Err(VcsError::Unsupported(operation))
}

// =============================================================================
// Construction
// =============================================================================

/// Settings resolved once at startup and injected into every backend.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct BackendSettings {
    /// The remote tool manages credentials itself; remote operations run
    /// non-interactively.
    #[builder(setters(name = with_credential_manager), default = cfg!(windows))]
    pub credential_manager: bool,

    /// Timeout of the interactive credential session.
    #[builder(setters(name = with_remote_timeout), default = DEFAULT_SESSION_TIMEOUT)]
    pub remote_timeout: Duration,

    #[builder(setters(name = with_git_program))]
    pub git_program: Option<PathBuf>,

    #[builder(setters(name = with_hg_program))]
    pub hg_program: Option<PathBuf>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Services and settings shared by the backends a manager constructs.
#[derive(Debug, Clone)]
pub struct BackendContext {
    pub runner: Arc<dyn ProcessRunner>,
    pub locator: Arc<dyn ExecutableLocator>,
    pub launcher: Arc<dyn TerminalLauncher>,
    pub store: Option<Arc<dyn CredentialStore>>,
    pub settings: BackendSettings,
}

impl BackendContext {
    /// Real processes, `PATH` lookup and pseudo-terminal sessions.
    #[must_use]
    pub fn system(settings: BackendSettings) -> Self {
        Self {
            runner: Arc::new(SystemRunner),
            locator: Arc::new(WhichLocator),
            launcher: Arc::new(PtyLauncher),
            store: None,
            settings,
        }
    }

    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Resolves a program, preferring an explicit override.
    #[must_use]
    pub fn find_program(&self, program: &str, configured: Option<&Path>) -> Option<PathBuf> {
        configured
            .map(Path::to_path_buf)
            .or_else(|| self.locator.find(program))
    }
}

/// Outcome of offering a directory to a backend.
#[derive(Debug)]
pub enum Probe {
    Ready(Box<dyn VcsBackend>),
    /// Recoverable: the next backend is tried.
    NotApplicable(BackendUnavailable),
    /// Fatal: probing stops and the error propagates.
    Failed(VcsError),
}

impl From<VcsResult<Box<dyn VcsBackend>>> for Probe {
    fn from(result: VcsResult<Box<dyn VcsBackend>>) -> Self {
        match result {
            Ok(backend) => Self::Ready(backend),
            Err(VcsError::BackendUnavailable(reason)) => Self::NotApplicable(*reason),
            Err(e) => Self::Failed(e),
        }
    }
}

type ProbeFn = dyn Fn(&Path, &BackendContext) -> Probe + Send + Sync;

/// Named backend constructor.
#[derive(Clone)]
pub struct BackendFactory {
    name: &'static str,
    probe: Arc<ProbeFn>,
}

impl BackendFactory {
    pub fn new(
        name: &'static str,
        probe: impl Fn(&Path, &BackendContext) -> Probe + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            probe: Arc::new(probe),
        }
    }

    #[must_use]
    pub fn git() -> Self {
        Self::new(GitBackend::NAME, |dir, ctx| {
            GitBackend::open(dir, ctx)
                .map(|b| Box::new(b) as Box<dyn VcsBackend>)
                .into()
        })
    }

    #[must_use]
    pub fn mercurial() -> Self {
        Self::new(MercurialBackend::NAME, |dir, ctx| {
            MercurialBackend::open(dir, ctx)
                .map(|b| Box::new(b) as Box<dyn VcsBackend>)
                .into()
        })
    }

    /// Factory for a built-in backend name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            GitBackend::NAME => Some(Self::git()),
            MercurialBackend::NAME => Some(Self::mercurial()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn probe(&self, directory: &Path, ctx: &BackendContext) -> Probe {
        (self.probe)(directory, ctx)
    }
}

impl fmt::Debug for BackendFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendFactory")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Names of the built-in backends, in default probe order.
pub const BUILTIN_BACKENDS: [&str; 2] = [GitBackend::NAME, MercurialBackend::NAME];

// =============================================================================
// Shared process plumbing
// =============================================================================

/// A located tool bound to a working directory.
#[derive(Debug, Clone)]
pub(crate) struct Tool {
    backend: &'static str,
    program: PathBuf,
    cwd: PathBuf,
    /// Set on every non-interactive run.
    env: &'static [(&'static str, &'static str)],
    runner: Arc<dyn ProcessRunner>,
}

impl Tool {
    pub(crate) fn new(
        backend: &'static str,
        program: PathBuf,
        cwd: PathBuf,
        env: &'static [(&'static str, &'static str)],
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            backend,
            program,
            cwd,
            env,
            runner,
        }
    }

    pub(crate) fn program(&self) -> &Path {
        &self.program
    }

    pub(crate) fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub(crate) fn rebind(&mut self, cwd: PathBuf) {
        self.cwd = cwd;
    }

    pub(crate) fn command<I, S>(&self, args: I) -> ProcessBuilder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.env.iter().fold(
            ProcessBuilder::new(&self.program).args(args).cwd(&self.cwd),
            |builder, (key, value)| builder.env(*key, *value),
        )
    }

    /// Runs `args`; a spawn failure means the tool went away.
    pub(crate) fn run<I, S>(&self, args: I) -> VcsResult<ProcessOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.run_builder(&self.command(args))
    }

    pub(crate) fn run_builder(&self, builder: &ProcessBuilder) -> VcsResult<ProcessOutput> {
        self.runner.run(builder).ok_or_else(|| {
            BackendUnavailable::missing_program(
                &self.cwd,
                self.backend,
                self.program.display().to_string(),
            )
            .into()
        })
    }
}

#[cfg(test)]
mod tests;
