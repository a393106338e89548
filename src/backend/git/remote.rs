// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote synchronisation and credentials.
//!
//! With a native credential manager git runs non-interactively and the exit
//! code decides. Otherwise git runs on a pseudo-terminal and the credential
//! session answers its username and password prompts.

use tracing::{debug, info, warn};

use crate::auth::{
    AuthOutcome, CredentialFields, Credentials, SessionRequest, run_credential_session,
};
use crate::error::{AuthError, OperationError, VcsResult};
use crate::feature::Operation;
use crate::model::SyncCounts;

use super::{GitBackend, VcsBackend};

impl GitBackend {
    /// Key under which credentials are stored: the origin URL.
    fn credential_context(&self) -> Option<String> {
        let output = self
            .git
            .run(["config", "--get", "remote.origin.url"])
            .ok()?;
        let url = output.stdout_text().trim().to_string();
        (output.success() && !url.is_empty()).then_some(url)
    }

    fn config_user_name(&self) -> Option<String> {
        let output = self.git.run(["config", "--get", "user.name"]).ok()?;
        let name = output.stdout_text().trim().to_string();
        (output.success() && !name.is_empty()).then_some(name)
    }

    /// Adopts stored credentials whose username matches the configured user.
    pub(super) fn load_stored_credentials(&mut self) {
        let Some(store) = self.store.clone() else {
            return;
        };
        let Some(context) = self.credential_context() else {
            return;
        };
        let Some(stored) = store.load(&context) else {
            return;
        };
        if stored.username.is_none() || stored.username == self.config_user_name() {
            debug!(context, "using stored credentials");
            self.credentials = stored;
        }
    }

    pub(super) fn store_credentials(&mut self, credentials: Credentials) {
        if let Some(store) = &self.store {
            match self.credential_context() {
                Some(context) => store.save(&context, &credentials),
                None => warn!("no remote origin, credentials kept for this session only"),
            }
        }
        self.credentials = credentials;
    }

    pub(super) fn forget_credentials(&mut self) {
        if let Some(store) = &self.store {
            match self.credential_context() {
                Some(context) => store.clear(&context),
                None => warn!("no remote origin, nothing stored to clear"),
            }
        }
        self.credentials = Credentials::default();
    }

    pub(super) fn fetch_counts(&mut self, sync: bool) -> VcsResult<SyncCounts> {
        if sync {
            self.remote_operation(Operation::Fetch)?;
        }
        Ok(self.repository_status()?.counts())
    }

    /// Runs `git fetch|pull|push` against the configured remote.
    pub(super) fn remote_operation(&mut self, operation: Operation) -> VcsResult<bool> {
        let verb = operation.name();

        if self.settings.credential_manager {
            let builder = self
                .git
                .command([verb])
                .env("GIT_TERMINAL_PROMPT", "0")
                .env("GIT_ASKPASS", "");
            let output = self.git.run_builder(&builder)?;
            if !output.success() {
                debug!(verb, stderr = %output.stderr_text().trim(), "remote operation failed");
            }
            return Ok(output.success());
        }

        let username = self
            .credentials
            .username
            .clone()
            .or_else(|| self.config_user_name())
            .unwrap_or_default();
        let password = self.credentials.password.clone().unwrap_or_default();

        let request = SessionRequest {
            program: self.git.program().to_path_buf(),
            args: vec![verb.to_string()],
            cwd: self.git.cwd().to_path_buf(),
            env: vec![
                ("GIT_ASKPASS".to_string(), String::new()),
                ("GCM_INTERACTIVE".to_string(), "never".to_string()),
                ("LC_ALL".to_string(), "C".to_string()),
            ],
        };
        let outcome = run_credential_session(
            self.launcher.as_ref(),
            &request,
            &username,
            &password,
            self.settings.remote_timeout,
        );

        match outcome {
            AuthOutcome::Success => self.remember_user_name(verb),
            AuthOutcome::AuthFailed => Err(AuthError {
                supplied: self.credentials.supplied(),
                required: self.required_credentials(),
                username: (!username.is_empty()).then_some(username),
                error: "wrong credentials".to_string(),
            }
            .into()),
            AuthOutcome::Unexpected(raw) => {
                let error =
                    OperationError::new(verb).with_error(format!("failed to {verb} from remote"));
                Err(match raw {
                    Some(raw) => error.with_raw(raw),
                    None => error,
                }
                .into())
            }
        }
    }

    /// A username given without a password becomes the local `user.name`.
    ///
    /// The remote operation already succeeded, but a failed update still
    /// decides the result.
    fn remember_user_name(&self, verb: &'static str) -> VcsResult<bool> {
        let Some(username) = self.credentials.username.as_deref() else {
            return Ok(true);
        };
        if self
            .credentials
            .supplied()
            .contains(CredentialFields::PASSWORD)
            || self.config_user_name().as_deref() == Some(username)
        {
            return Ok(true);
        }
        let output = self
            .git
            .run(["config", "--local", "user.name", username])?;
        if !output.success() {
            warn!(username, "cannot update local user.name");
            return Err(OperationError::new(verb)
                .with_error("cannot update local user.name")
                .with_raw(output.stderr_text())
                .into());
        }
        info!(username, "updated local user.name");
        Ok(true)
    }
}
