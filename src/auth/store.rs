// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pluggable credential storage.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;

use super::Credentials;

/// Storage for credentials keyed by a backend-specific context string
/// (for git, the URL of the `origin` remote).
pub trait CredentialStore: Send + Sync + fmt::Debug {
    fn load(&self, context: &str) -> Option<Credentials>;

    fn save(&self, context: &str, credentials: &Credentials);

    fn clear(&self, context: &str);
}

/// Process-local store. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<BTreeMap<String, Credentials>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self, context: &str) -> Option<Credentials> {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(context)
            .cloned()
    }

    fn save(&self, context: &str, credentials: &Credentials) {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(context.to_string(), credentials.clone());
    }

    fn clear(&self, context: &str) {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(context);
    }
}
