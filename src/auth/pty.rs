// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pseudo-terminal transport for [`PromptSession`].
//!
//! ```text
//! openpty ──> slave.spawn_command ──> drop slave
//!   master.try_clone_reader ──> reader thread ──flume──> PtySession.buffer
//!   master.take_writer      <── send_line
//! ```

use std::io::{self, Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use flume::{Receiver, RecvTimeoutError};
use portable_pty::{
    Child, ChildKiller, CommandBuilder, ExitStatus, MasterPty, PtySize, native_pty_system,
};
use regex::Regex;
use tracing::{debug, trace};

use super::session::{ExpectOutcome, PromptSession, SessionExit, SessionRequest, TerminalLauncher};

const READ_BUFFER_SIZE: usize = 4096;
const POLL_INTERVAL: Duration = Duration::from_millis(20);
const DRAIN_GRACE: Duration = Duration::from_millis(100);

/// Launches sessions on the platform's native pseudo-terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PtyLauncher;

impl TerminalLauncher for PtyLauncher {
    fn launch(&self, request: &SessionRequest) -> io::Result<Box<dyn PromptSession>> {
        let pair = native_pty_system()
            .openpty(PtySize {
                rows: 24,
                cols: 200,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(io::Error::other)?;

        let mut command = CommandBuilder::new(&request.program);
        command.args(&request.args);
        command.cwd(&request.cwd);
        for (key, value) in &request.env {
            command.env(key, value);
        }

        let child = pair.slave.spawn_command(command).map_err(io::Error::other)?;
        drop(pair.slave);

        let mut reader = pair.master.try_clone_reader().map_err(io::Error::other)?;
        let writer = pair.master.take_writer().map_err(io::Error::other)?;

        let (tx, rx) = flume::unbounded();
        thread::spawn(move || {
            let mut buf = [0u8; READ_BUFFER_SIZE];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        trace!(bytes = n, "pty read");
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        debug!(program = %request.program.display(), "pty session spawned");
        Ok(Box::new(PtySession {
            _master: pair.master,
            child,
            writer,
            output: rx,
            buffer: String::new(),
            killed: false,
        }))
    }
}

/// Maps a child's status, reporting death by signal as [`SessionExit::Signaled`].
///
/// portable-pty keeps the signal name private and only shows it through
/// `Display`, with a fallback exit code of 1.
pub(super) fn session_exit(status: &ExitStatus) -> SessionExit {
    if !status.success() && status.to_string().starts_with("Terminated by") {
        return SessionExit::Signaled;
    }
    SessionExit::Exited(i32::try_from(status.exit_code()).unwrap_or(i32::MAX))
}

struct PtySession {
    _master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
    writer: Box<dyn Write + Send>,
    output: Receiver<Vec<u8>>,
    buffer: String,
    killed: bool,
}

impl PtySession {
    fn push(&mut self, chunk: &[u8]) {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
    }

    fn drain(&mut self) {
        while let Ok(chunk) = self.output.recv_timeout(DRAIN_GRACE) {
            self.push(&chunk);
        }
    }
}

impl PromptSession for PtySession {
    fn expect(&mut self, pattern: &Regex, timeout: Duration) -> io::Result<ExpectOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(found) = pattern.find(&self.buffer) {
                let (start, end) = (found.start(), found.end());
                let before = self.buffer[..start].to_string();
                self.buffer.drain(..end);
                return Ok(ExpectOutcome::Matched { before });
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(ExpectOutcome::Timeout {
                    output: std::mem::take(&mut self.buffer),
                });
            }

            match self.output.recv_timeout(remaining) {
                Ok(chunk) => self.push(&chunk),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Ok(ExpectOutcome::Eof {
                        output: std::mem::take(&mut self.buffer),
                    });
                }
            }
        }
    }

    fn send_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    fn wait(&mut self, timeout: Duration) -> io::Result<SessionExit> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = self.child.try_wait()? {
                if self.killed {
                    return Ok(SessionExit::Signaled);
                }
                return Ok(session_exit(&status));
            }
            if Instant::now() >= deadline {
                self.kill();
                return Ok(SessionExit::Signaled);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn pending_output(&mut self) -> String {
        self.drain();
        std::mem::take(&mut self.buffer)
    }

    fn kill(&mut self) {
        if self.killed {
            return;
        }
        if let Err(e) = self.child.kill() {
            debug!(error = %e, "kill failed");
        }
        let _ = self.child.wait();
        self.killed = true;
    }
}

impl Drop for PtySession {
    fn drop(&mut self) {
        if matches!(self.child.try_wait(), Ok(None)) {
            self.kill();
        }
    }
}
