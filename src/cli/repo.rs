// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository command arguments.

use clap::Args;
use std::path::PathBuf;

/// A single branch name.
#[derive(Debug, Clone, Args)]
pub struct NameArgs {
    /// Branch name.
    pub name: String,
}

/// Arguments for `create-branch`.
#[derive(Debug, Clone, Args)]
pub struct CreateBranchArgs {
    /// Branch name.
    pub name: String,

    /// Starts a branch with no history instead of branching from HEAD.
    #[arg(long)]
    pub orphan: bool,
}

/// Arguments for `change`.
#[derive(Debug, Clone, Args)]
pub struct ChangeArgs {
    /// Path relative to the repository root.
    pub path: String,

    /// Reports the working-tree state when the path is both staged and modified.
    #[arg(long)]
    pub unstaged: bool,
}

/// Paths for `stage` and `unstage`.
#[derive(Debug, Clone, Args)]
#[command(group = clap::ArgGroup::new("target").required(true).args(["paths", "all"]))]
pub struct PathsArgs {
    /// Paths relative to the repository root.
    pub paths: Vec<String>,

    /// Applies to every changed file.
    #[arg(short = 'a', long)]
    pub all: bool,
}

/// Arguments for `commit`.
#[derive(Debug, Clone, Args)]
#[command(group = clap::ArgGroup::new("source").required(true).args(["message", "file"]))]
pub struct CommitArgs {
    /// Commit message; blank lines separate paragraphs.
    #[arg(short = 'm', long)]
    pub message: Option<String>,

    /// Reads the commit message from a file.
    #[arg(short = 'F', long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Arguments for `fetch`.
#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Only reads the tracking counts without contacting the remote.
    #[arg(long = "no-sync")]
    pub no_sync: bool,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

/// Credentials for remote operations.
#[derive(Debug, Clone, Default, Args)]
pub struct RemoteArgs {
    /// Username sent when the remote asks for one.
    #[arg(short = 'u', long, env = "VCSKIT_USERNAME")]
    pub username: Option<String>,

    /// Password sent when the remote asks for one.
    #[arg(long, env = "VCSKIT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for `undo-commit`.
#[derive(Debug, Clone, Args)]
pub struct UndoCommitArgs {
    /// Number of commits to undo.
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,
}

/// Arguments for `undo-change`.
#[derive(Debug, Clone, Args)]
#[command(group = clap::ArgGroup::new("target").required(true).args(["path", "all"]))]
pub struct UndoChangeArgs {
    /// Path relative to the repository root.
    pub path: Option<String>,

    /// Discards every working-tree change; untracked files are kept.
    #[arg(short = 'a', long)]
    pub all: bool,
}

/// Arguments for `log`.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Number of commits to show.
    #[arg(short = 'n', long, default_value_t = 10)]
    pub count: u32,
}

/// Arguments for `features`.
#[derive(Debug, Clone, Args)]
pub struct FeaturesArgs {
    /// Shows feature groups instead of single operations.
    #[arg(long)]
    pub groups: bool,
}
