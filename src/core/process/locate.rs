// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Executable lookup.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{OnceLock, RwLock};

/// Static cache for executable paths resolved via `which`.
static EXECUTABLE_CACHE: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

/// Get the executable cache, initializing if needed.
fn exe_cache() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    EXECUTABLE_CACHE.get_or_init(|| RwLock::new(BTreeMap::new()))
}

/// Resolves a program name to an executable path.
pub trait ExecutableLocator: Send + Sync + fmt::Debug {
    fn find(&self, program: &str) -> Option<PathBuf>;
}

/// Looks programs up on `PATH`, caching hits for the process lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhichLocator;

impl ExecutableLocator for WhichLocator {
    fn find(&self, program: &str) -> Option<PathBuf> {
        // Check cache first (read lock)
        {
            let cache = exe_cache()
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(path) = cache.get(program) {
                return Some(path.clone());
            }
        }

        let path = which::which(program).ok()?;
        exe_cache()
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(program.to_string(), path.clone());
        Some(path)
    }
}

/// Fixed program table; names not in the table are not found.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    programs: BTreeMap<String, PathBuf>,
}

impl FixedLocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, program: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.programs.insert(program.into(), path.into());
        self
    }
}

impl ExecutableLocator for FixedLocator {
    fn find(&self, program: &str) -> Option<PathBuf> {
        self.programs.get(program).cloned()
    }
}
