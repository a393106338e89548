// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scripted stand-ins for processes and terminal sessions, used by unit tests.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use regex::Regex;

use crate::auth::{ExpectOutcome, PromptSession, SessionExit, SessionRequest, TerminalLauncher};
use crate::core::process::{ProcessBuilder, ProcessOutput, ProcessRunner};

// =============================================================================
// Process runner
// =============================================================================

#[derive(Debug)]
struct Rule {
    prefix: Vec<String>,
    output: Option<ProcessOutput>,
    once: bool,
}

/// Answers process runs from a rule list matched on argument prefixes.
///
/// Unmatched runs exit with 127 and an "unscripted" message.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<ProcessBuilder>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, prefix: &[&str], output: Option<ProcessOutput>, once: bool) {
        self.rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Rule {
                prefix: prefix.iter().map(ToString::to_string).collect(),
                output,
                once,
            });
    }

    /// Every run whose arguments start with `prefix` exits with `code`.
    pub(crate) fn on(&self, prefix: &[&str], code: i32, stdout: &str) -> &Self {
        self.push(prefix, Some(ProcessOutput::new(code, stdout, "")), false);
        self
    }

    /// Like [`Self::on`] but consumed by the first matching run.
    pub(crate) fn once(&self, prefix: &[&str], code: i32, stdout: &str) -> &Self {
        self.push(prefix, Some(ProcessOutput::new(code, stdout, "")), true);
        self
    }

    pub(crate) fn on_stderr(&self, prefix: &[&str], code: i32, stderr: &str) -> &Self {
        self.push(prefix, Some(ProcessOutput::new(code, "", stderr)), false);
        self
    }

    /// Runs matching `prefix` fail to spawn.
    pub(crate) fn unavailable(&self, prefix: &[&str]) -> &Self {
        self.push(prefix, None, false);
        self
    }

    /// Argument lists of every run so far.
    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|b| b.args_slice().to_vec())
            .collect()
    }

    pub(crate) fn builders(&self) -> Vec<ProcessBuilder> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, builder: &ProcessBuilder) -> Option<ProcessOutput> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(builder.clone());

        let args = builder.args_slice();
        let mut rules = self.rules.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(index) = rules
            .iter()
            .position(|rule| args.starts_with(&rule.prefix))
        else {
            return Some(ProcessOutput::new(
                127,
                "",
                format!("unscripted: {}", args.join(" ")),
            ));
        };
        if rules[index].once {
            rules.remove(index).output
        } else {
            rules[index].output.clone()
        }
    }
}

// =============================================================================
// Terminal sessions
// =============================================================================

/// One step of a scripted terminal conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Output(&'static str),
    Exit(SessionExit),
    /// The tool stops producing output and never exits.
    Hang,
}

/// What happened during a scripted session.
#[derive(Debug, Default, Clone)]
pub(crate) struct SessionLog {
    pub(crate) requests: Vec<SessionRequest>,
    pub(crate) sent: Vec<String>,
    pub(crate) killed: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct ScriptedLauncher {
    script: Vec<Step>,
    fail: bool,
    log: Arc<Mutex<SessionLog>>,
}

impl ScriptedLauncher {
    pub(crate) fn new(script: Vec<Step>) -> Self {
        Self {
            script,
            fail: false,
            log: Arc::default(),
        }
    }

    /// A launcher whose sessions never start.
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn log(&self) -> SessionLog {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TerminalLauncher for ScriptedLauncher {
    fn launch(&self, request: &SessionRequest) -> io::Result<Box<dyn PromptSession>> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .push(request.clone());
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such program"));
        }
        Ok(Box::new(ScriptedSession {
            steps: self.script.iter().cloned().collect(),
            buffer: String::new(),
            exit: None,
            log: Arc::clone(&self.log),
        }))
    }
}

struct ScriptedSession {
    steps: VecDeque<Step>,
    buffer: String,
    exit: Option<SessionExit>,
    log: Arc<Mutex<SessionLog>>,
}

impl PromptSession for ScriptedSession {
    fn expect(&mut self, pattern: &Regex, _timeout: Duration) -> io::Result<ExpectOutcome> {
        loop {
            if let Some(found) = pattern.find(&self.buffer) {
                let (start, end) = (found.start(), found.end());
                let before = self.buffer[..start].to_string();
                self.buffer.drain(..end);
                return Ok(ExpectOutcome::Matched { before });
            }
            match self.steps.front().cloned() {
                Some(Step::Output(text)) => {
                    self.steps.pop_front();
                    self.buffer.push_str(text);
                }
                Some(Step::Exit(exit)) => {
                    self.steps.pop_front();
                    self.exit = Some(exit);
                    return Ok(ExpectOutcome::Eof {
                        output: std::mem::take(&mut self.buffer),
                    });
                }
                Some(Step::Hang) | None => {
                    return Ok(ExpectOutcome::Timeout {
                        output: std::mem::take(&mut self.buffer),
                    });
                }
            }
        }
    }

    fn send_line(&mut self, line: &str) -> io::Result<()> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sent
            .push(line.to_string());
        Ok(())
    }

    fn wait(&mut self, _timeout: Duration) -> io::Result<SessionExit> {
        while self.exit.is_none() {
            match self.steps.pop_front() {
                Some(Step::Output(text)) => self.buffer.push_str(text),
                Some(Step::Exit(exit)) => self.exit = Some(exit),
                Some(Step::Hang) | None => {
                    self.kill();
                    self.exit = Some(SessionExit::Signaled);
                }
            }
        }
        Ok(self.exit.unwrap_or(SessionExit::Signaled))
    }

    fn pending_output(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    fn kill(&mut self) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .killed = true;
    }
}
