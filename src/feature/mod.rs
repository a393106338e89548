// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Capability model: which backend operations exist and how they behave.
//!
//! ```text
//! FeatureTable::builder()              (one static table per backend)
//!   .enable(Operation::BranchGet)
//!   .enable_with(Operation::Changes, {"states": [...]})
//!   .alias(Operation::Tags, "labels")
//!   .build()
//!        |
//!        v
//!   Operation --> FeatureDescriptor { name, enabled, extra }
//!   "name"    --> Operation           (declared id or logical alias)
//!
//! FeatureGroup ("branches", "remote", ...) --> &[Operation]
//! table.check_group(group, GroupCheck::All | GroupCheck::Any)
//! ```
//!
//! Tables are consulted before dispatch: the manager refuses a disabled
//! operation with [`VcsError::Unsupported`] without calling the backend.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

use crate::error::{PropertyOp, VcsError, VcsResult};

/// Every operation a backend may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Create,
    Status,
    BranchGet,
    BranchSet,
    Branches,
    EditableBranches,
    Tags,
    CreateBranch,
    DeleteBranch,
    Change,
    Changes,
    Stage,
    Unstage,
    StageAll,
    UnstageAll,
    Commit,
    Fetch,
    Pull,
    Push,
    UndoCommit,
    UndoStage,
    UndoChange,
    UndoChangeAll,
    GetLastCommits,
    CredentialsGet,
    CredentialsSet,
    CredentialsClear,
}

impl Operation {
    pub const ALL: [Self; 27] = [
        Self::Create,
        Self::Status,
        Self::BranchGet,
        Self::BranchSet,
        Self::Branches,
        Self::EditableBranches,
        Self::Tags,
        Self::CreateBranch,
        Self::DeleteBranch,
        Self::Change,
        Self::Changes,
        Self::Stage,
        Self::Unstage,
        Self::StageAll,
        Self::UnstageAll,
        Self::Commit,
        Self::Fetch,
        Self::Pull,
        Self::Push,
        Self::UndoCommit,
        Self::UndoStage,
        Self::UndoChange,
        Self::UndoChangeAll,
        Self::GetLastCommits,
        Self::CredentialsGet,
        Self::CredentialsSet,
        Self::CredentialsClear,
    ];

    /// Declared name of the method or property.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Status => "status",
            Self::BranchGet | Self::BranchSet => "branch",
            Self::Branches => "branches",
            Self::EditableBranches => "editable_branches",
            Self::Tags => "tags",
            Self::CreateBranch => "create_branch",
            Self::DeleteBranch => "delete_branch",
            Self::Change => "change",
            Self::Changes => "changes",
            Self::Stage => "stage",
            Self::Unstage => "unstage",
            Self::StageAll => "stage_all",
            Self::UnstageAll => "unstage_all",
            Self::Commit => "commit",
            Self::Fetch => "fetch",
            Self::Pull => "pull",
            Self::Push => "push",
            Self::UndoCommit => "undo_commit",
            Self::UndoStage => "undo_stage",
            Self::UndoChange => "undo_change",
            Self::UndoChangeAll => "undo_change_all",
            Self::GetLastCommits => "get_last_commits",
            Self::CredentialsGet | Self::CredentialsSet | Self::CredentialsClear => "credentials",
        }
    }

    /// Accessor kind for property-style operations.
    #[must_use]
    pub const fn accessor(self) -> Option<PropertyOp> {
        match self {
            Self::BranchGet
            | Self::Branches
            | Self::EditableBranches
            | Self::Changes
            | Self::CredentialsGet => Some(PropertyOp::Get),
            Self::BranchSet | Self::CredentialsSet => Some(PropertyOp::Set),
            Self::CredentialsClear => Some(PropertyOp::Del),
            _ => None,
        }
    }

    /// Unique identifier: the name, suffixed with `:get`/`:set`/`:del` for accessors.
    #[must_use]
    pub fn id(self) -> String {
        match self.accessor() {
            Some(op) => format!("{}:{op}", self.name()),
            None => self.name().to_string(),
        }
    }

    /// Resolves an identifier produced by [`Operation::id`].
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.id() == id)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

/// Named bundles of operations used to gate UI affordances as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureGroup {
    Create,
    Status,
    Branches,
    Diff,
    StageUnstage,
    Commit,
    Remote,
    Undo,
    History,
    Merge,
}

impl FeatureGroup {
    pub const ALL: [Self; 10] = [
        Self::Create,
        Self::Status,
        Self::Branches,
        Self::Diff,
        Self::StageUnstage,
        Self::Commit,
        Self::Remote,
        Self::Undo,
        Self::History,
        Self::Merge,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Status => "status",
            Self::Branches => "branches",
            Self::Diff => "diff",
            Self::StageUnstage => "stage-unstage",
            Self::Commit => "commit",
            Self::Remote => "remote",
            Self::Undo => "undo",
            Self::History => "history",
            Self::Merge => "merge",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.label() == label)
    }

    /// Operations belonging to the group. `diff` and `merge` have none yet.
    #[must_use]
    pub const fn members(self) -> &'static [Operation] {
        use Operation as Op;
        match self {
            Self::Create => &[Op::Create],
            Self::Status => &[Op::BranchGet, Op::Change, Op::Changes],
            Self::Branches => &[
                Op::BranchGet,
                Op::BranchSet,
                Op::Branches,
                Op::EditableBranches,
                Op::Tags,
                Op::CreateBranch,
                Op::DeleteBranch,
            ],
            Self::Diff | Self::Merge => &[],
            Self::StageUnstage => &[
                Op::Stage,
                Op::Unstage,
                Op::StageAll,
                Op::UnstageAll,
                Op::UndoStage,
            ],
            Self::Commit => &[Op::Commit, Op::UndoCommit],
            Self::Remote => &[Op::Fetch, Op::Push, Op::Pull],
            Self::Undo => &[
                Op::UndoCommit,
                Op::UndoStage,
                Op::UndoChange,
                Op::UndoChangeAll,
            ],
            Self::History => &[Op::GetLastCommits],
        }
    }

    /// Groups that contain `operation`.
    pub fn containing(operation: Operation) -> impl Iterator<Item = Self> {
        Self::ALL
            .into_iter()
            .filter(move |group| group.members().contains(&operation))
    }
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a group's member flags are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupCheck {
    /// Every member must be enabled.
    #[default]
    All,
    /// At least one member must be enabled.
    Any,
}

/// Introspection data attached to one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDescriptor {
    operation: Operation,
    name: String,
    enabled: bool,
    extra: Map<String, Value>,
}

impl FeatureDescriptor {
    fn disabled(operation: Operation) -> Self {
        Self {
            operation,
            name: operation.id(),
            enabled: false,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Logical name; defaults to the operation's own identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Behaviour metadata (e.g. `states`, `attrs`).
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// Static capability table of one backend.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    descriptors: BTreeMap<Operation, FeatureDescriptor>,
    names: BTreeMap<String, Operation>,
}

impl FeatureTable {
    #[must_use]
    pub fn builder() -> FeatureTableBuilder {
        FeatureTableBuilder::default()
    }

    /// Descriptor of `operation` (disabled when never declared).
    #[must_use]
    pub fn descriptor(&self, operation: Operation) -> &FeatureDescriptor {
        // build() fills every operation
        &self.descriptors[&operation]
    }

    #[must_use]
    pub fn is_enabled(&self, operation: Operation) -> bool {
        self.descriptor(operation).enabled
    }

    /// Fails with [`VcsError::Unsupported`] when `operation` is disabled.
    ///
    /// # Errors
    ///
    /// Returns `VcsError::Unsupported` for a disabled operation.
    pub fn ensure(&self, operation: Operation) -> VcsResult<()> {
        if self.is_enabled(operation) {
            Ok(())
        } else {
            Err(VcsError::Unsupported(operation))
        }
    }

    /// Finds a descriptor by logical name or declared identifier.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&FeatureDescriptor> {
        self.names
            .get(name)
            .map(|operation| self.descriptor(*operation))
    }

    /// Checks a whole group. Empty groups are never available.
    #[must_use]
    pub fn check_group(&self, group: FeatureGroup, check: GroupCheck) -> bool {
        let members = group.members();
        if members.is_empty() {
            return false;
        }
        match check {
            GroupCheck::All => members.iter().all(|op| self.is_enabled(*op)),
            GroupCheck::Any => members.iter().any(|op| self.is_enabled(*op)),
        }
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FeatureDescriptor> {
        self.descriptors.values()
    }

    pub fn enabled_operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.descriptors
            .values()
            .filter(|d| d.enabled)
            .map(|d| d.operation)
    }
}

/// Declarative construction of a [`FeatureTable`].
#[derive(Debug, Default)]
pub struct FeatureTableBuilder {
    descriptors: BTreeMap<Operation, FeatureDescriptor>,
}

impl FeatureTableBuilder {
    fn entry(&mut self, operation: Operation) -> &mut FeatureDescriptor {
        self.descriptors
            .entry(operation)
            .or_insert_with(|| FeatureDescriptor::disabled(operation))
    }

    #[must_use]
    pub fn enable(mut self, operation: Operation) -> Self {
        self.entry(operation).enabled = true;
        self
    }

    #[must_use]
    pub fn enable_all(mut self, operations: &[Operation]) -> Self {
        for operation in operations {
            self.entry(*operation).enabled = true;
        }
        self
    }

    /// Enables `operation` with metadata; non-object values are ignored.
    #[must_use]
    pub fn enable_with(mut self, operation: Operation, extra: Value) -> Self {
        let descriptor = self.entry(operation);
        descriptor.enabled = true;
        if let Value::Object(map) = extra {
            descriptor.extra.extend(map);
        }
        self
    }

    /// Declares a disabled operation that still carries metadata.
    #[must_use]
    pub fn disable_with(mut self, operation: Operation, extra: Value) -> Self {
        let descriptor = self.entry(operation);
        descriptor.enabled = false;
        if let Value::Object(map) = extra {
            descriptor.extra.extend(map);
        }
        self
    }

    /// Exposes `operation` under a logical name as well as its identifier.
    #[must_use]
    pub fn alias(mut self, operation: Operation, name: impl Into<String>) -> Self {
        self.entry(operation).name = name.into();
        self
    }

    #[must_use]
    pub fn build(mut self) -> FeatureTable {
        for operation in Operation::ALL {
            self.entry(operation);
        }

        let mut names: BTreeMap<String, Operation> = Operation::ALL
            .into_iter()
            .map(|op| (op.id(), op))
            .collect();
        for descriptor in self.descriptors.values() {
            let shadowed = names
                .get(descriptor.name.as_str())
                .copied()
                .filter(|existing| *existing != descriptor.operation);
            if let Some(existing) = shadowed {
                warn!(
                    alias = %descriptor.name,
                    operation = %descriptor.operation,
                    shadowed = %existing,
                    "feature alias collides with a declared operation, alias ignored"
                );
            } else {
                names.insert(descriptor.name.clone(), descriptor.operation);
            }
        }

        FeatureTable {
            descriptors: self.descriptors,
            names,
        }
    }
}

#[cfg(test)]
mod tests;
