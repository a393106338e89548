// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credential state machine over an interactive terminal session.
//!
//! ```text
//!  Start ──spawn──> AwaitUsernamePrompt
//!                     | "Username for ...:"  send username
//!                     | EOF                  classify exit (no auth needed)
//!                     | timeout              kill, Unexpected
//!                     v
//!                   AwaitPasswordPrompt
//!                     | "Password for ...:"  send password
//!                     | EOF / timeout        Unexpected
//!                     v
//!                   AwaitTermination
//!                     | exit 0               Success
//!                     | "http basic: access denied"  AuthFailed
//!                     | otherwise            Unexpected(text)
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, trace, warn};

/// Session timeout used when none is configured.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(10);

const ACCESS_DENIED_MARKER: &str = "http basic: access denied";

static USERNAME_PROMPT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Username for .+:").ok());
static PASSWORD_PROMPT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"Password for .+:").ok());

/// Result of waiting for a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectOutcome {
    /// The pattern matched; `before` is the output preceding the match.
    Matched { before: String },
    /// The tool closed its terminal.
    Eof { output: String },
    /// Nothing matched within the timeout.
    Timeout { output: String },
}

/// How the session's process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    Exited(i32),
    /// Killed by a signal, including our own kill on timeout.
    Signaled,
}

/// Classified outcome of a remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    /// The remote rejected the credentials.
    AuthFailed,
    /// Any other failure; carries the tool's output when there was any.
    Unexpected(Option<String>),
}

impl AuthOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// A running interactive session.
pub trait PromptSession {
    /// Reads output until `pattern` matches, the terminal closes, or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal cannot be read.
    fn expect(&mut self, pattern: &Regex, timeout: Duration) -> io::Result<ExpectOutcome>;

    /// Writes `line` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal cannot be written.
    fn send_line(&mut self, line: &str) -> io::Result<()>;

    /// Waits for the process to exit, killing it after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the process status cannot be queried.
    fn wait(&mut self, timeout: Duration) -> io::Result<SessionExit>;

    /// Output read since the last consumed prompt.
    fn pending_output(&mut self) -> String;

    fn kill(&mut self);
}

/// What to spawn in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
}

/// Spawns processes attached to an interactive terminal.
pub trait TerminalLauncher: Send + Sync + fmt::Debug {
    /// # Errors
    ///
    /// Returns an error when the terminal or the process cannot be created.
    fn launch(&self, request: &SessionRequest) -> io::Result<Box<dyn PromptSession>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    AwaitUsernamePrompt,
    AwaitPasswordPrompt,
    AwaitTermination,
}

/// Launches `request` and drives it through the credential prompts.
///
/// A launch failure (missing tool, no terminal) is `Unexpected(None)`.
pub fn run_credential_session(
    launcher: &dyn TerminalLauncher,
    request: &SessionRequest,
    username: &str,
    password: &str,
    timeout: Duration,
) -> AuthOutcome {
    let mut session = match launcher.launch(request) {
        Ok(session) => session,
        Err(e) => {
            warn!(program = %request.program.display(), error = %e, "cannot start session");
            return AuthOutcome::Unexpected(None);
        }
    };
    debug!(program = %request.program.display(), args = ?request.args, "session started");

    match drive(session.as_mut(), username, password, timeout) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "session i/o failed");
            session.kill();
            AuthOutcome::Unexpected(None)
        }
    }
}

fn drive(
    session: &mut dyn PromptSession,
    username: &str,
    password: &str,
    timeout: Duration,
) -> io::Result<AuthOutcome> {
    let (Some(username_prompt), Some(password_prompt)) =
        (USERNAME_PROMPT.as_ref(), PASSWORD_PROMPT.as_ref())
    else {
        return Ok(AuthOutcome::Unexpected(None));
    };

    let mut state = SessionState::AwaitUsernamePrompt;
    loop {
        trace!(?state, "credential session");
        state = match state {
            SessionState::AwaitUsernamePrompt => {
                match session.expect(username_prompt, timeout)? {
                    ExpectOutcome::Matched { .. } => {
                        session.send_line(username)?;
                        SessionState::AwaitPasswordPrompt
                    }
                    ExpectOutcome::Eof { output } => {
                        let exit = session.wait(timeout)?;
                        return Ok(classify_unprompted(exit, output));
                    }
                    ExpectOutcome::Timeout { .. } => {
                        session.kill();
                        return Ok(AuthOutcome::Unexpected(None));
                    }
                }
            }
            SessionState::AwaitPasswordPrompt => {
                match session.expect(password_prompt, timeout)? {
                    ExpectOutcome::Matched { .. } => {
                        session.send_line(password)?;
                        SessionState::AwaitTermination
                    }
                    ExpectOutcome::Eof { .. } | ExpectOutcome::Timeout { .. } => {
                        session.kill();
                        return Ok(AuthOutcome::Unexpected(None));
                    }
                }
            }
            SessionState::AwaitTermination => {
                let exit = session.wait(timeout)?;
                let output = session.pending_output();
                return Ok(classify_termination(exit, output));
            }
        };
    }
}

/// The tool ended before asking for anything.
fn classify_unprompted(exit: SessionExit, output: String) -> AuthOutcome {
    match exit {
        SessionExit::Exited(0) => AuthOutcome::Success,
        SessionExit::Exited(_) => AuthOutcome::Unexpected(Some(output)),
        SessionExit::Signaled => AuthOutcome::Unexpected(None),
    }
}

/// The tool ended after credentials were sent.
fn classify_termination(exit: SessionExit, output: String) -> AuthOutcome {
    if exit == SessionExit::Exited(0) {
        return AuthOutcome::Success;
    }
    if output.to_lowercase().contains(ACCESS_DENIED_MARKER) {
        return AuthOutcome::AuthFailed;
    }
    AuthOutcome::Unexpected(Some(output))
}
