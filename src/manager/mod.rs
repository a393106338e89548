// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backend selection and forwarding.
//!
//! ```text
//! bind(dir)
//!   drop active backend
//!   for factory in registration order:
//!       Ready(backend)      -> active, stop
//!       NotApplicable(why)  -> next factory
//!       Failed(err)         -> return err, stop
//!   none ready              -> NoValidBackend(dir)
//!
//! manager.op(args)
//!   no active backend       -> NoActiveBackend
//!   descriptor disabled     -> Unsupported(op)
//!   otherwise               -> backend.op(args)
//! ```

use std::path::Path;

use tracing::{debug, info, warn};

use crate::auth::{CredentialFields, Credentials};
use crate::backend::{BackendContext, BackendFactory, Probe, VcsBackend};
use crate::error::{VcsError, VcsResult};
use crate::feature::{FeatureGroup, FeatureTable, GroupCheck, Operation};
use crate::model::{BranchSet, CommitRecord, FileChange, RepositoryStatus, SyncCounts};

/// Generates a manager method that checks the feature table, then delegates.
macro_rules! forward {
    ($(#[$meta:meta])* $name:ident(&self $(, $arg:ident: $ty:ty)*) -> $ret:ty = $op:expr) => {
        $(#[$meta])*
        pub fn $name(&self $(, $arg: $ty)*) -> VcsResult<$ret> {
            let backend = self.active()?;
            backend.features().ensure($op)?;
            backend.$name($($arg),*)
        }
    };
    ($(#[$meta:meta])* $name:ident(&mut self $(, $arg:ident: $ty:ty)*) -> $ret:ty = $op:expr) => {
        $(#[$meta])*
        pub fn $name(&mut self $(, $arg: $ty)*) -> VcsResult<$ret> {
            let backend = self.active_mut()?;
            backend.features().ensure($op)?;
            backend.$name($($arg),*)
        }
    };
}

/// Owns the active backend for one repository directory.
#[derive(Debug)]
pub struct BackendManager {
    factories: Vec<BackendFactory>,
    ctx: BackendContext,
    backend: Option<Box<dyn VcsBackend>>,
}

impl BackendManager {
    /// A manager with no registered backends.
    #[must_use]
    pub const fn new(ctx: BackendContext) -> Self {
        Self {
            factories: Vec::new(),
            ctx,
            backend: None,
        }
    }

    /// Git first, then Mercurial.
    #[must_use]
    pub fn with_default_backends(ctx: BackendContext) -> Self {
        let mut manager = Self::new(ctx);
        manager.register_backend(BackendFactory::git());
        manager.register_backend(BackendFactory::mercurial());
        manager
    }

    /// Registers the built-in backends named in `order`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a name that is not a built-in backend.
    pub fn from_order<S: AsRef<str>>(order: &[S], ctx: BackendContext) -> VcsResult<Self> {
        let mut manager = Self::new(ctx);
        for name in order {
            let name = name.as_ref();
            let factory = BackendFactory::by_name(name)
                .ok_or_else(|| VcsError::invalid_argument(format!("unknown backend '{name}'")))?;
            manager.register_backend(factory);
        }
        Ok(manager)
    }

    /// Appends a backend; later registrations are probed last.
    pub fn register_backend(&mut self, factory: BackendFactory) {
        debug!(backend = factory.name(), "registered backend");
        self.factories.push(factory);
    }

    /// Registered backend names in probe order.
    pub fn registered(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.iter().map(BackendFactory::name)
    }

    /// Binds to `directory`, or unbinds when it is `None` or empty.
    ///
    /// The previous backend is dropped first, so a failed bind leaves the
    /// manager unbound.
    ///
    /// # Errors
    ///
    /// Returns `NoValidBackend` when no backend recognises the directory, or
    /// the first non-recoverable construction error.
    pub fn bind(&mut self, directory: Option<&Path>) -> VcsResult<()> {
        if let Some(previous) = self.backend.take() {
            debug!(backend = previous.name(), "released backend");
        }
        let Some(directory) = directory.filter(|d| !d.as_os_str().is_empty()) else {
            return Ok(());
        };

        for factory in &self.factories {
            match factory.probe(directory, &self.ctx) {
                Probe::Ready(backend) => {
                    info!(
                        backend = backend.name(),
                        root = %backend.repo_dir().display(),
                        "backend selected"
                    );
                    self.backend = Some(backend);
                    return Ok(());
                }
                Probe::NotApplicable(reason) => {
                    debug!(backend = factory.name(), %reason, "backend not applicable");
                }
                Probe::Failed(e) => {
                    warn!(backend = factory.name(), error = %e, "backend failed");
                    return Err(e);
                }
            }
        }
        Err(VcsError::no_valid_backend(directory))
    }

    pub fn unbind(&mut self) {
        self.backend = None;
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.backend.is_some()
    }

    /// The active backend, if any.
    #[must_use]
    pub fn backend(&self) -> Option<&dyn VcsBackend> {
        self.backend.as_deref()
    }

    #[must_use]
    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend().map(VcsBackend::name)
    }

    /// Root of the bound repository; `None` when unbound.
    #[must_use]
    pub fn repo_dir(&self) -> Option<&Path> {
        self.backend().map(VcsBackend::repo_dir)
    }

    fn active(&self) -> VcsResult<&dyn VcsBackend> {
        self.backend.as_deref().ok_or(VcsError::NoActiveBackend)
    }

    fn active_mut(&mut self) -> VcsResult<&mut (dyn VcsBackend + 'static)> {
        self.backend.as_deref_mut().ok_or(VcsError::NoActiveBackend)
    }

    /// Feature table of the active backend.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveBackend` when unbound.
    pub fn features(&self) -> VcsResult<&'static FeatureTable> {
        Ok(self.active()?.features())
    }

    /// False when unbound or when the operation is disabled.
    #[must_use]
    pub fn is_enabled(&self, operation: Operation) -> bool {
        self.features().is_ok_and(|f| f.is_enabled(operation))
    }

    /// Group availability; every group is unavailable when unbound.
    #[must_use]
    pub fn check_group(&self, group: FeatureGroup, check: GroupCheck) -> bool {
        self.features().is_ok_and(|f| f.check_group(group, check))
    }

    /// Credential fields the active backend needs for remote operations.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveBackend` when unbound.
    pub fn required_credentials(&self) -> VcsResult<CredentialFields> {
        Ok(self.active()?.required_credentials())
    }

    forward!(credentials(&self) -> Credentials = Operation::CredentialsGet);
    forward!(set_credentials(&mut self, credentials: Credentials) -> () = Operation::CredentialsSet);
    forward!(clear_credentials(&mut self) -> () = Operation::CredentialsClear);

    forward!(
        /// Branch, tracking and change summary.
        status(&self) -> RepositoryStatus = Operation::Status
    );
    forward!(branch(&self) -> String = Operation::BranchGet);
    forward!(set_branch(&mut self, name: &str) -> () = Operation::BranchSet);
    forward!(branches(&self) -> Vec<String> = Operation::Branches);
    forward!(editable_branches(&self) -> Vec<String> = Operation::EditableBranches);
    forward!(tags(&self) -> Vec<String> = Operation::Tags);
    forward!(branch_set(&self) -> BranchSet = Operation::Branches);
    forward!(create_branch(&mut self, name: &str, from_current: bool) -> bool = Operation::CreateBranch);
    forward!(delete_branch(&mut self, name: &str) -> bool = Operation::DeleteBranch);

    forward!(
        /// State of one path; see [`VcsBackend::change`].
        change(&self, path: &str, prefer_unstaged: bool) -> Option<FileChange> = Operation::Change
    );
    forward!(changes(&self) -> Vec<FileChange> = Operation::Changes);
    forward!(stage(&mut self, path: &str) -> bool = Operation::Stage);
    forward!(unstage(&mut self, path: &str) -> bool = Operation::Unstage);
    forward!(stage_all(&mut self) -> bool = Operation::StageAll);
    forward!(unstage_all(&mut self) -> bool = Operation::UnstageAll);
    forward!(commit(&mut self, message: &str, is_path: Option<bool>) -> bool = Operation::Commit);

    forward!(fetch(&mut self, sync: bool) -> SyncCounts = Operation::Fetch);
    forward!(pull(&mut self) -> bool = Operation::Pull);
    forward!(push(&mut self) -> bool = Operation::Push);

    forward!(undo_commit(&mut self, commits: u32) -> Option<CommitRecord> = Operation::UndoCommit);
    forward!(undo_stage(&mut self, path: &str) -> bool = Operation::UndoStage);
    forward!(undo_change(&mut self, path: &str) -> bool = Operation::UndoChange);
    forward!(undo_change_all(&mut self) -> bool = Operation::UndoChangeAll);
    forward!(
        /// The most recent `commits` commits, newest first.
        get_last_commits(&self, commits: u32) -> Vec<CommitRecord> = Operation::GetLastCommits
    );
}
