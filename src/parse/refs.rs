// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reference listings (`git branch --format`, `git tag -l`, `hg branches`).

/// Splits a one-name-per-line listing.
///
/// Blank lines and detached-head placeholders such as `(HEAD detached at
/// 1a2b3c)` are dropped.
#[must_use]
pub fn parse_ref_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('('))
        .map(str::to_string)
        .collect()
}
