// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for vcskit using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! vcskit [global options] <command>
//!
//! query     status | branch | branches | tags | change PATH | log
//! branches  checkout NAME | create-branch NAME | delete-branch NAME
//! index     stage | unstage | commit
//! remote    fetch | pull | push | forget-credentials
//! undo      undo-commit [N] | undo-change PATH
//! info      features | options | config-files | version
//! ```

pub mod global;
pub mod repo;


use clap::{Parser, Subcommand};

use crate::cli::global::GlobalOptions;
use crate::cli::repo::{
    ChangeArgs, CommitArgs, CreateBranchArgs, FeaturesArgs, FetchArgs, LogArgs, NameArgs,
    PathsArgs, RemoteArgs, UndoChangeArgs, UndoCommitArgs,
};

/// Uniform front end for Git and Mercurial working copies.
#[derive(Debug, Parser)]
#[command(
    name = "vcskit",
    author,
    version,
    about = "Uniform version-control front end",
    long_about = "vcskit Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Detects the version-control system of a directory and runs\n\
                  status, branch, staging, commit and remote operations through\n\
                  one interface. See `vcskit <command> --help` for details.",
    after_help = "CONFIGURATION:\n\n\
                  vcskit reads `vcskit.toml` from the current directory when it\n\
                  exists, then every --config file in order, then VCSKIT_*\n\
                  environment variables, then command-line flags. Use\n\
                  --no-default-config to skip `vcskit.toml`."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files that were loaded.
    #[command(name = "config-files")]
    ConfigFiles,

    /// Lists the operations the detected backend supports.
    Features(FeaturesArgs),

    /// Shows the branch, tracking counts and changed files.
    Status,

    /// Prints the current branch.
    Branch,

    /// Switches to an existing branch.
    Checkout(NameArgs),

    /// Lists local branches.
    Branches,

    /// Lists tags.
    Tags,

    /// Creates a branch and switches to it.
    #[command(name = "create-branch")]
    CreateBranch(CreateBranchArgs),

    /// Deletes a branch that is not checked out.
    #[command(name = "delete-branch")]
    DeleteBranch(NameArgs),

    /// Shows the state of one path.
    Change(ChangeArgs),

    /// Stages paths for the next commit.
    Stage(PathsArgs),

    /// Removes paths from the staging area.
    Unstage(PathsArgs),

    /// Records the staged changes.
    Commit(CommitArgs),

    /// Updates remote references and prints the tracking counts.
    Fetch(FetchArgs),

    /// Pulls from the remote.
    Pull(RemoteArgs),

    /// Pushes to the remote.
    Push(RemoteArgs),

    /// Forgets stored credentials for the remote.
    #[command(name = "forget-credentials")]
    ForgetCredentials,

    /// Undoes recent commits, keeping their changes staged.
    #[command(name = "undo-commit")]
    UndoCommit(UndoCommitArgs),

    /// Discards working-tree changes.
    #[command(name = "undo-change")]
    UndoChange(UndoChangeArgs),

    /// Shows recent commits.
    Log(LogArgs),
}

impl Command {
    /// Whether the command needs a repository.
    #[must_use]
    pub const fn needs_backend(&self) -> bool {
        !matches!(self, Self::Version | Self::Options | Self::ConfigFiles)
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
