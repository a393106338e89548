// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository command handlers.
//!
//! ```text
//! Command --> BackendManager (feature check) --> VcsBackend
//!                     |
//!                     v
//!                  Output (text | json)
//! ```
//!
//! Operations that report success as a boolean turn `false` into an error so
//! the process exits non-zero.

use anyhow::{Context, anyhow, bail};
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::cli::Command;
use crate::cli::repo::{
    ChangeArgs, CommitArgs, CreateBranchArgs, FetchArgs, PathsArgs, RemoteArgs, UndoChangeArgs,
};
use crate::cmd::config::run_features_command;
use crate::cmd::output::{Output, change_line, commit_line, counts_line, status_text};
use crate::error::Result;
use crate::feature::Operation;
use crate::manager::BackendManager;

/// Main handler for commands that act on a repository.
///
/// # Errors
///
/// Returns an error if the operation is unsupported, fails, or reports failure.
pub fn run_repo_command(
    command: &Command,
    manager: &mut BackendManager,
    out: &mut Output<'_>,
) -> Result<()> {
    debug!(?command, backend = manager.backend_name(), "running command");
    match command {
        Command::Status => {
            let status = manager.status()?;
            out.emit(&status, &status_text(&status))
        }
        Command::Branch => {
            let branch = manager.branch()?;
            out.emit(&branch, &branch)
        }
        Command::Checkout(args) => {
            manager
                .set_branch(&args.name)
                .with_context(|| format!("Failed to switch to '{}'", args.name))?;
            out.emit(
                &json!({ "branch": args.name }),
                &format!("Switched to branch '{}'", args.name),
            )
        }
        Command::Branches => out.list(&manager.branches()?),
        Command::Tags => out.list(&manager.tags()?),
        Command::CreateBranch(args) => run_create_branch(args, manager, out),
        Command::DeleteBranch(args) => {
            ensure(manager.delete_branch(&args.name)?, || {
                format!("Could not delete branch '{}'", args.name)
            })?;
            out.emit(
                &json!({ "deleted": args.name }),
                &format!("Deleted branch '{}'", args.name),
            )
        }
        Command::Change(args) => run_change(args, manager, out),
        Command::Stage(args) => run_staging(args, manager, out, true),
        Command::Unstage(args) => run_staging(args, manager, out, false),
        Command::Commit(args) => run_commit(args, manager, out),
        Command::Fetch(args) => run_fetch(args, manager, out),
        Command::Pull(args) => run_sync(args, manager, out, false),
        Command::Push(args) => run_sync(args, manager, out, true),
        Command::ForgetCredentials => {
            manager.clear_credentials()?;
            out.emit(&json!({ "credentials": null }), "Credentials cleared")
        }
        Command::UndoCommit(args) => {
            let record = manager.undo_commit(args.count)?;
            let text = record.as_ref().map_or_else(String::new, |r| {
                format!("Undid commits back to {}", commit_line(r))
            });
            out.emit(&record, &text)
        }
        Command::UndoChange(args) => run_undo_change(args, manager, out),
        Command::Log(args) => {
            let commits = manager.get_last_commits(args.count)?;
            let text: Vec<String> = commits.iter().map(commit_line).collect();
            out.emit(&commits, &text.join("\n"))
        }
        Command::Features(args) => run_features_command(args, manager, out),
        Command::Version | Command::Options | Command::ConfigFiles => {
            Err(anyhow!("'{command:?}' does not operate on a repository"))
        }
    }
}

fn ensure(ok: bool, message: impl FnOnce() -> String) -> Result<()> {
    if ok { Ok(()) } else { Err(anyhow!(message())) }
}

fn run_create_branch(
    args: &CreateBranchArgs,
    manager: &mut BackendManager,
    out: &mut Output<'_>,
) -> Result<()> {
    ensure(manager.create_branch(&args.name, !args.orphan)?, || {
        format!("Could not create branch '{}'", args.name)
    })?;
    let kind = if args.orphan { "orphan branch" } else { "branch" };
    out.emit(
        &json!({ "branch": args.name, "orphan": args.orphan }),
        &format!("Switched to a new {kind} '{}'", args.name),
    )
}

fn run_change(args: &ChangeArgs, manager: &BackendManager, out: &mut Output<'_>) -> Result<()> {
    let change = manager.change(&args.path, args.unstaged)?;
    let text = change
        .as_ref()
        .map_or_else(|| format!("{}: unchanged", args.path), change_line);
    out.emit(&change, &text)
}

fn run_staging(
    args: &PathsArgs,
    manager: &mut BackendManager,
    out: &mut Output<'_>,
    stage: bool,
) -> Result<()> {
    let verb = if stage { "stage" } else { "unstage" };
    if args.all {
        let ok = if stage {
            manager.stage_all()?
        } else {
            manager.unstage_all()?
        };
        ensure(ok, || format!("Could not {verb} every change"))?;
    } else {
        for path in &args.paths {
            let ok = if stage {
                manager.stage(path)?
            } else {
                manager.unstage(path)?
            };
            ensure(ok, || format!("Could not {verb} '{path}'"))?;
        }
    }
    let targets = if args.all {
        vec![".".to_string()]
    } else {
        args.paths.clone()
    };
    out.emit(
        &json!({ "action": verb, "paths": targets }),
        &format!("{verb}d {}", targets.join(", ")),
    )
}

fn run_commit(args: &CommitArgs, manager: &mut BackendManager, out: &mut Output<'_>) -> Result<()> {
    let committed = match (&args.message, &args.file) {
        (_, Some(file)) => {
            let file = file
                .to_str()
                .ok_or_else(|| anyhow!("Message file path is not valid UTF-8"))?;
            manager.commit(file, Some(true))?
        }
        (Some(message), None) => manager.commit(message, Some(false))?,
        (None, None) => bail!("A commit message is required"),
    };
    ensure(committed, || "Nothing was committed".to_string())?;
    out.emit(&json!({ "committed": true }), "Committed")
}

fn apply_credentials(args: &RemoteArgs, manager: &mut BackendManager) -> Result<()> {
    if args.username.is_none() && args.password.is_none() {
        return Ok(());
    }
    if !manager.is_enabled(Operation::CredentialsSet) {
        warn!("backend manages credentials itself, ignoring --username/--password");
        return Ok(());
    }
    let current = manager.credentials().unwrap_or_default();
    let supplied = Credentials {
        username: args.username.clone(),
        password: args.password.clone(),
        ..Credentials::default()
    };
    manager.set_credentials(supplied.or(current))?;
    Ok(())
}

fn run_fetch(args: &FetchArgs, manager: &mut BackendManager, out: &mut Output<'_>) -> Result<()> {
    apply_credentials(&args.remote, manager)?;
    let counts = manager.fetch(!args.no_sync)?;
    out.emit(&counts, &counts_line(counts))
}

fn run_sync(
    args: &RemoteArgs,
    manager: &mut BackendManager,
    out: &mut Output<'_>,
    push: bool,
) -> Result<()> {
    apply_credentials(args, manager)?;
    let verb = if push { "push" } else { "pull" };
    let ok = if push {
        manager.push()?
    } else {
        manager.pull()?
    };
    ensure(ok, || format!("Could not {verb}"))?;
    out.emit(&json!({ "action": verb }), &format!("{verb} completed"))
}

fn run_undo_change(
    args: &UndoChangeArgs,
    manager: &mut BackendManager,
    out: &mut Output<'_>,
) -> Result<()> {
    let target = match (&args.path, args.all) {
        (_, true) => {
            ensure(manager.undo_change_all()?, || {
                "Some changes could not be discarded".to_string()
            })?;
            ".".to_string()
        }
        (Some(path), false) => {
            ensure(manager.undo_change(path)?, || {
                format!("Could not discard changes to '{path}'")
            })?;
            path.clone()
        }
        (None, false) => bail!("A path or --all is required"),
    };
    out.emit(
        &json!({ "discarded": target }),
        &format!("Discarded changes to {target}"),
    )
}
