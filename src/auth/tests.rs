// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;
use std::time::Duration;

use crate::testing::{ScriptedLauncher, Step};

use super::session::DEFAULT_SESSION_TIMEOUT;
use super::*;

fn request() -> SessionRequest {
    SessionRequest {
        program: PathBuf::from("git"),
        args: vec!["push".to_string()],
        cwd: PathBuf::from("/repo"),
        env: vec![("GIT_ASKPASS".to_string(), String::new())],
    }
}

fn run(launcher: &ScriptedLauncher) -> AuthOutcome {
    run_credential_session(launcher, &request(), "jane", "s3cret", DEFAULT_SESSION_TIMEOUT)
}

// =============================================================================
// Credentials
// =============================================================================

#[test]
fn test_supplied_fields_ignore_empty_values() {
    let creds = Credentials {
        username: Some("jane".to_string()),
        password: Some(String::new()),
        ..Credentials::default()
    };
    assert_eq!(creds.supplied(), CredentialFields::USERNAME);
    assert!(Credentials::default().is_empty());
    assert_eq!(
        Credentials::basic("a", "b").supplied(),
        CredentialFields::USERNAME | CredentialFields::PASSWORD
    );
}

#[test]
fn test_debug_redacts_secrets() {
    let creds = Credentials::basic("jane", "s3cret");
    let rendered = format!("{creds:?}");
    assert!(!rendered.contains("s3cret"));
    insta::assert_snapshot!(rendered, @r#"Credentials { username: Some("jane"), password: Some("***"), email: None, token: None }"#);
}

#[test]
fn test_fields_display() {
    let fields = CredentialFields::USERNAME | CredentialFields::TOKEN;
    assert_eq!(fields.to_string(), "username, token");
}

#[test]
fn test_credentials_or_fills_missing() {
    let merged = Credentials {
        username: Some("override".to_string()),
        ..Credentials::default()
    }
    .or(Credentials::basic("stored", "pw"));
    assert_eq!(merged.username.as_deref(), Some("override"));
    assert_eq!(merged.password.as_deref(), Some("pw"));
}

#[test]
fn test_memory_store_round_trip() {
    let store = MemoryCredentialStore::new();
    assert!(store.load("https://example.com/repo.git").is_none());
    store.save("https://example.com/repo.git", &Credentials::basic("jane", "pw"));
    assert_eq!(store.len(), 1);
    assert_eq!(
        store
            .load("https://example.com/repo.git")
            .and_then(|c| c.username),
        Some("jane".to_string())
    );
    store.clear("https://example.com/repo.git");
    assert!(store.is_empty());
}

// =============================================================================
// State machine
// =============================================================================

#[test]
fn test_exit_zero_without_prompt_is_success() {
    let launcher = ScriptedLauncher::new(vec![
        Step::Output("Everything up-to-date\r\n"),
        Step::Exit(SessionExit::Exited(0)),
    ]);
    assert_eq!(run(&launcher), AuthOutcome::Success);
    assert!(launcher.log().sent.is_empty());
}

#[test]
fn test_nonzero_exit_without_prompt_carries_output() {
    let launcher = ScriptedLauncher::new(vec![
        Step::Output("fatal: not a git repository\r\n"),
        Step::Exit(SessionExit::Exited(128)),
    ]);
    assert_eq!(
        run(&launcher),
        AuthOutcome::Unexpected(Some("fatal: not a git repository\r\n".to_string()))
    );
}

#[test]
fn test_signal_without_prompt_is_null_unexpected() {
    let launcher = ScriptedLauncher::new(vec![Step::Exit(SessionExit::Signaled)]);
    assert_eq!(run(&launcher), AuthOutcome::Unexpected(None));
}

#[test]
fn test_rejected_credentials_are_auth_failed() {
    let launcher = ScriptedLauncher::new(vec![
        Step::Output("Username for 'https://gitlab.example.com': "),
        Step::Output("Password for 'https://jane@gitlab.example.com': "),
        Step::Output("\r\nremote: HTTP Basic: Access denied\r\nfatal: Authentication failed\r\n"),
        Step::Exit(SessionExit::Exited(128)),
    ]);
    assert_eq!(run(&launcher), AuthOutcome::AuthFailed);
    assert_eq!(launcher.log().sent, ["jane", "s3cret"]);
}

#[test]
fn test_accepted_credentials_are_success() {
    let launcher = ScriptedLauncher::new(vec![
        Step::Output("Username for 'https://example.com': "),
        Step::Output("Password for 'https://jane@example.com': "),
        Step::Exit(SessionExit::Exited(0)),
    ]);
    assert_eq!(run(&launcher), AuthOutcome::Success);
}

#[test]
fn test_other_failure_after_credentials_carries_text() {
    let launcher = ScriptedLauncher::new(vec![
        Step::Output("Username for 'https://example.com': "),
        Step::Output("Password for 'https://jane@example.com': "),
        Step::Output("fatal: unable to access\r\n"),
        Step::Exit(SessionExit::Exited(128)),
    ]);
    assert_eq!(
        run(&launcher),
        AuthOutcome::Unexpected(Some(" fatal: unable to access\r\n".to_string()))
    );
}

#[test]
fn test_timeout_at_username_prompt_is_unexpected() {
    let launcher = ScriptedLauncher::new(vec![Step::Output("Connecting..."), Step::Hang]);
    assert_eq!(run(&launcher), AuthOutcome::Unexpected(None));
    assert!(launcher.log().killed);
}

#[test]
fn test_missing_password_prompt_is_unexpected() {
    let launcher = ScriptedLauncher::new(vec![
        Step::Output("Username for 'https://example.com': "),
        Step::Exit(SessionExit::Exited(128)),
    ]);
    assert_eq!(run(&launcher), AuthOutcome::Unexpected(None));
    assert_eq!(launcher.log().sent, ["jane"]);
}

#[test]
fn test_launch_failure_is_null_unexpected() {
    let launcher = ScriptedLauncher::failing();
    let outcome = run_credential_session(
        &launcher,
        &request(),
        "jane",
        "pw",
        Duration::from_millis(10),
    );
    assert_eq!(outcome, AuthOutcome::Unexpected(None));
    assert_eq!(launcher.log().requests.len(), 1);
}

// =============================================================================
// Pseudo-terminal transport
// =============================================================================

#[test]
fn test_pty_exit_status_mapping() {
    use portable_pty::ExitStatus;

    assert_eq!(
        pty::session_exit(&ExitStatus::with_exit_code(0)),
        SessionExit::Exited(0)
    );
    assert_eq!(
        pty::session_exit(&ExitStatus::with_exit_code(128)),
        SessionExit::Exited(128)
    );
    assert_eq!(
        pty::session_exit(&ExitStatus::with_signal("Killed")),
        SessionExit::Signaled
    );
}

#[cfg(unix)]
fn shell(script: &str) -> SessionRequest {
    SessionRequest {
        program: PathBuf::from("/bin/sh"),
        args: vec!["-c".to_string(), script.to_string()],
        cwd: std::env::temp_dir(),
        env: Vec::new(),
    }
}

#[cfg(unix)]
#[test]
fn test_pty_child_killed_by_signal_is_null_unexpected() {
    let outcome = run_credential_session(
        &PtyLauncher,
        &shell("echo dying; kill -9 $$"),
        "jane",
        "s3cret",
        Duration::from_secs(10),
    );
    assert_eq!(outcome, AuthOutcome::Unexpected(None));
}

#[cfg(unix)]
#[test]
fn test_pty_answers_prompts() {
    let outcome = run_credential_session(
        &PtyLauncher,
        &shell(
            "printf 'Username for x: '; read u; printf 'Password for x: '; read p; \
             [ \"$u:$p\" = 'jane:s3cret' ]",
        ),
        "jane",
        "s3cret",
        Duration::from_secs(10),
    );
    assert_eq!(outcome, AuthOutcome::Success);
}
