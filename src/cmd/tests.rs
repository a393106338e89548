// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::sync::{Arc, LazyLock};

use chrono::{TimeZone, Utc};
use clap::Parser;

use crate::auth::Credentials;
use crate::backend::{BackendContext, BackendFactory, BackendSettings, Probe, VcsBackend};
use crate::cli::Cli;
use crate::cmd::config::run_config_files_command;
use crate::cmd::output::Output;
use crate::cmd::repo::run_repo_command;
use crate::core::process::FixedLocator;
use crate::error::VcsResult;
use crate::feature::{FeatureTable, Operation};
use crate::manager::BackendManager;
use crate::model::{ChangeState, CommitRecord, FileChange, RepositoryStatus, SyncCounts};
use crate::testing::{ScriptedLauncher, ScriptedRunner};
use serde_json::json;

static FEATURES: LazyLock<FeatureTable> = LazyLock::new(|| {
    FeatureTable::builder()
        .enable_all(&[
            Operation::Status,
            Operation::BranchGet,
            Operation::BranchSet,
            Operation::Branches,
            Operation::CreateBranch,
            Operation::Stage,
            Operation::StageAll,
            Operation::Commit,
            Operation::Push,
            Operation::CredentialsGet,
            Operation::CredentialsSet,
            Operation::UndoCommit,
            Operation::GetLastCommits,
        ])
        .enable_with(Operation::Change, json!({ "states": ["path", "kind", "staged"] }))
        .build()
});

#[derive(Debug, Default)]
struct Memory {
    branch: String,
    staged: Vec<String>,
    commits: Vec<String>,
    credentials: Credentials,
}

impl VcsBackend for Memory {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn features(&self) -> &'static FeatureTable {
        &FEATURES
    }

    fn repo_dir(&self) -> &Path {
        Path::new("/repo")
    }

    fn credentials(&self) -> VcsResult<Credentials> {
        Ok(self.credentials.clone())
    }

    fn set_credentials(&mut self, credentials: Credentials) -> VcsResult<()> {
        self.credentials = credentials;
        Ok(())
    }

    fn status(&self) -> VcsResult<RepositoryStatus> {
        Ok(RepositoryStatus {
            local_branch: Some(self.branch.clone()),
            remote_branch: Some(format!("origin/{}", self.branch)),
            behind: 2,
            ahead: Some(1),
            changes: self
                .staged
                .iter()
                .map(|p| FileChange::new(p.clone(), ChangeState::Modified, true))
                .chain([FileChange::new("notes.txt", ChangeState::Added, false)])
                .collect(),
        })
    }

    fn branch(&self) -> VcsResult<String> {
        Ok(self.branch.clone())
    }

    fn set_branch(&mut self, name: &str) -> VcsResult<()> {
        name.clone_into(&mut self.branch);
        Ok(())
    }

    fn branches(&self) -> VcsResult<Vec<String>> {
        Ok(vec!["main".to_string(), "topic".to_string()])
    }

    fn create_branch(&mut self, name: &str, _from_current: bool) -> VcsResult<bool> {
        if name == "main" {
            return Ok(false);
        }
        self.set_branch(name)?;
        Ok(true)
    }

    fn change(&self, path: &str, _prefer_unstaged: bool) -> VcsResult<Option<FileChange>> {
        Ok(self
            .staged
            .iter()
            .find(|p| *p == path)
            .map(|p| FileChange::new(p.clone(), ChangeState::Modified, true)))
    }

    fn stage(&mut self, path: &str) -> VcsResult<bool> {
        if path == "missing.rs" {
            return Ok(false);
        }
        self.staged.push(path.to_string());
        Ok(true)
    }

    fn commit(&mut self, message: &str, _is_path: Option<bool>) -> VcsResult<bool> {
        self.commits.push(message.to_string());
        Ok(!self.staged.is_empty())
    }

    fn push(&mut self) -> VcsResult<bool> {
        Ok(self.credentials.username.is_some())
    }

    fn fetch(&mut self, _sync: bool) -> VcsResult<SyncCounts> {
        unreachable!("fetch is disabled")
    }

    fn undo_commit(&mut self, _commits: u32) -> VcsResult<Option<CommitRecord>> {
        Ok(Some(record()))
    }

    fn get_last_commits(&self, commits: u32) -> VcsResult<Vec<CommitRecord>> {
        Ok(std::iter::repeat_with(record)
            .take(commits as usize)
            .collect())
    }
}

fn record() -> CommitRecord {
    CommitRecord::new(
        "0123456789abcdef".to_string(),
        "Fix parser".to_string(),
        String::new(),
        "dev".to_string(),
        "dev@example.com".to_string(),
        Utc.timestamp_opt(1_700_000_000, 0).single(),
    )
}

fn manager() -> BackendManager {
    let ctx = BackendContext {
        runner: Arc::new(ScriptedRunner::new()),
        locator: Arc::new(FixedLocator::new()),
        launcher: Arc::new(ScriptedLauncher::new(Vec::new())),
        store: None,
        settings: BackendSettings::default(),
    };
    let mut manager = BackendManager::new(ctx);
    manager.register_backend(BackendFactory::new("memory", |_, _| {
        Probe::Ready(Box::new(Memory {
            branch: "main".to_string(),
            ..Memory::default()
        }))
    }));
    manager.bind(Some(Path::new("/repo"))).unwrap();
    manager
}

/// Runs one command line against `manager`, returning stdout or the error.
fn run(manager: &mut BackendManager, args: &[&str]) -> Result<String, String> {
    let cli = Cli::try_parse_from(std::iter::once("vcskit").chain(args.iter().copied()))
        .map_err(|e| e.to_string())?;
    let command = cli.command.ok_or("no command")?;
    let mut buffer = Vec::new();
    let mut out = Output::new(&mut buffer, cli.global.json);
    run_repo_command(&command, manager, &mut out).map_err(|e| format!("{e:#}"))?;
    Ok(String::from_utf8(buffer).unwrap())
}

#[test]
fn test_status_text() {
    let mut manager = manager();
    run(&mut manager, &["stage", "src/lib.rs"]).unwrap();
    insta::assert_snapshot!(run(&mut manager, &["status"]).unwrap(), @r"
    On branch main (tracking origin/main, ahead 1, behind 2)
    staged    modified  src/lib.rs
    unstaged  added     notes.txt
    ");
}

#[test]
fn test_status_json() {
    let mut manager = manager();
    let out = run(&mut manager, &["--json", "status"]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["local_branch"], "main");
    assert_eq!(value["ahead"], 1);
    assert_eq!(value["changes"][0]["path"], "notes.txt");
}

#[test]
fn test_branch_commands() {
    let mut manager = manager();
    assert_eq!(run(&mut manager, &["branches"]).unwrap(), "main\ntopic\n");
    insta::assert_snapshot!(run(&mut manager, &["create-branch", "feature"]).unwrap(), @"Switched to a new branch 'feature'");
    assert_eq!(run(&mut manager, &["branch"]).unwrap(), "feature\n");
    insta::assert_snapshot!(
        run(&mut manager, &["create-branch", "main"]).unwrap_err(),
        @"Could not create branch 'main'"
    );
    run(&mut manager, &["checkout", "topic"]).unwrap();
    assert_eq!(manager.branch().unwrap(), "topic");
}

#[test]
fn test_disabled_operation_reports_unsupported() {
    let mut manager = manager();
    insta::assert_snapshot!(
        run(&mut manager, &["tags"]).unwrap_err(),
        @"operation 'tags' is not supported by this backend"
    );
    assert!(run(&mut manager, &["fetch"]).is_err());
}

#[test]
fn test_stage_and_commit() {
    let mut manager = manager();
    insta::assert_snapshot!(run(&mut manager, &["commit", "-m", "empty"]).unwrap_err(), @"Nothing was committed");
    insta::assert_snapshot!(run(&mut manager, &["stage", "a.rs", "b.rs"]).unwrap(), @"staged a.rs, b.rs");
    insta::assert_snapshot!(run(&mut manager, &["stage", "missing.rs"]).unwrap_err(), @"Could not stage 'missing.rs'");
    insta::assert_snapshot!(run(&mut manager, &["commit", "-m", "Add files"]).unwrap(), @"Committed");
    insta::assert_snapshot!(run(&mut manager, &["change", "a.rs"]).unwrap(), @"staged    modified  a.rs");
    insta::assert_snapshot!(run(&mut manager, &["change", "zzz.rs"]).unwrap(), @"zzz.rs: unchanged");
}

#[test]
fn test_stage_requires_target() {
    let mut manager = manager();
    assert!(run(&mut manager, &["stage"]).is_err());
    assert!(run(&mut manager, &["stage", "--all", "a.rs"]).is_err());
}

#[test]
fn test_push_uses_supplied_credentials() {
    let mut manager = manager();
    insta::assert_snapshot!(run(&mut manager, &["push"]).unwrap_err(), @"Could not push");
    run(&mut manager, &["push", "-u", "dev", "--password", "secret"]).unwrap();
    let credentials = manager.credentials().unwrap();
    assert_eq!(credentials.username.as_deref(), Some("dev"));
    assert_eq!(credentials.password.as_deref(), Some("secret"));
}

#[test]
fn test_history_output() {
    let mut manager = manager();
    insta::assert_snapshot!(run(&mut manager, &["log", "-n", "2"]).unwrap(), @r"
    0123456789 2023-11-14 22:13 dev  Fix parser
    0123456789 2023-11-14 22:13 dev  Fix parser
    ");
    insta::assert_snapshot!(run(&mut manager, &["undo-commit"]).unwrap(), @"Undid commits back to 0123456789 2023-11-14 22:13 dev  Fix parser");
    assert!(run(&mut manager, &["undo-commit", "0"]).is_err());
}

#[test]
fn test_features_listing() {
    let mut manager = manager();
    let out = run(&mut manager, &["features"]).unwrap();
    assert!(out.contains(r#"change {"states":["path","kind","staged"]}"#));
    assert!(!out.contains("tags"));

    let groups = run(&mut manager, &["features", "--groups"]).unwrap();
    assert!(groups.lines().any(|l| l == "history       full"));
    assert!(groups.lines().any(|l| l == "remote        partial"));
    assert!(groups.lines().any(|l| l == "merge         none"));
}

#[test]
fn test_config_files_listing() {
    let mut buffer = Vec::new();
    run_config_files_command(&[], &mut Output::new(&mut buffer, false)).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "No configuration files loaded\n");
}
