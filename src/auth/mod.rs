// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credentials and the interactive credential session.
//!
//! ```text
//!   Credentials { username, password, email, token }
//!        |  supplied() -> CredentialFields
//!        v
//!   remote op ---- native credential manager? ----> non-interactive run
//!        |                                          exit 0 => Success
//!        v
//!   TerminalLauncher::launch()  --> PromptSession (pty)
//!        |
//!        v
//!   session::run_credential_session()
//!     Start -> AwaitUsernamePrompt -> AwaitPasswordPrompt -> AwaitTermination
//!        |
//!        v
//!   AuthOutcome { Success | AuthFailed | Unexpected(text?) }
//!
//!   CredentialStore   optional; keyed by a backend-specific context
//! ```

pub mod pty;
pub mod session;
pub mod store;

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use pty::PtyLauncher;
pub use session::{
    AuthOutcome, ExpectOutcome, PromptSession, SessionExit, SessionRequest, TerminalLauncher,
    run_credential_session,
};
pub use store::{CredentialStore, MemoryCredentialStore};

bitflags! {
    /// Credential fields, used to report what was supplied and what is required.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CredentialFields: u8 {
        const USERNAME = 0x01;
        const PASSWORD = 0x02;
        const EMAIL = 0x04;
        const TOKEN = 0x08;
    }
}

impl CredentialFields {
    /// Field names in declaration order.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl fmt::Display for CredentialFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.names().iter().map(|n| n.to_lowercase()).collect();
        f.write_str(&names.join(", "))
    }
}

/// A set of credentials. Every field is optional.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Credentials {
    /// Username and password pair.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Fields that carry a non-empty value.
    #[must_use]
    pub fn supplied(&self) -> CredentialFields {
        let mut fields = CredentialFields::empty();
        for (flag, value) in [
            (CredentialFields::USERNAME, &self.username),
            (CredentialFields::PASSWORD, &self.password),
            (CredentialFields::EMAIL, &self.email),
            (CredentialFields::TOKEN, &self.token),
        ] {
            if value.as_deref().is_some_and(|v| !v.is_empty()) {
                fields |= flag;
            }
        }
        fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.supplied().is_empty()
    }

    /// Fills fields missing here from `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            username: self.username.or(other.username),
            password: self.password.or(other.password),
            email: self.email.or(other.email),
            token: self.token.or(other.token),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const fn redact(value: Option<&String>) -> Option<&'static str> {
            match value {
                Some(_) => Some("***"),
                None => None,
            }
        }
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &redact(self.password.as_ref()))
            .field("email", &self.email)
            .field("token", &redact(self.token.as_ref()))
            .finish()
    }
}

#[cfg(test)]
mod tests;
