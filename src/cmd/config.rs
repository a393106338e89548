// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config and introspection commands for vcskit.

use serde_json::{Value, json};

use crate::cli::repo::FeaturesArgs;
use crate::cmd::output::Output;
use crate::config::Config;
use crate::error::Result;
use crate::feature::{FeatureGroup, GroupCheck};
use crate::manager::BackendManager;

/// Display current configuration options.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn run_options_command(config: &Config, out: &mut Output<'_>) -> Result<()> {
    let lines = config.format_options();
    if out.is_json() {
        out.emit(config, "")
    } else {
        out.list(&lines)
    }
}

/// Display loaded configuration files.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn run_config_files_command(config_files: &[String], out: &mut Output<'_>) -> Result<()> {
    if config_files.is_empty() && !out.is_json() {
        out.emit(&(), "No configuration files loaded")
    } else {
        out.list(config_files)
    }
}

/// Lists enabled operations with their extras, or every feature group.
///
/// # Errors
///
/// Returns an error if no backend is bound or the output cannot be written.
pub fn run_features_command(
    args: &FeaturesArgs,
    manager: &BackendManager,
    out: &mut Output<'_>,
) -> Result<()> {
    let features = manager.features()?;

    if args.groups {
        let groups: Vec<Value> = FeatureGroup::ALL
            .into_iter()
            .map(|group| {
                json!({
                    "group": group.label(),
                    "all": features.check_group(group, GroupCheck::All),
                    "any": features.check_group(group, GroupCheck::Any),
                })
            })
            .collect();
        let text: Vec<String> = FeatureGroup::ALL
            .into_iter()
            .map(|group| {
                let state = if features.check_group(group, GroupCheck::All) {
                    "full"
                } else if features.check_group(group, GroupCheck::Any) {
                    "partial"
                } else {
                    "none"
                };
                format!("{:<14}{state}", group.label())
            })
            .collect();
        return out.emit(&groups, &text.join("\n"));
    }

    let enabled: Vec<_> = features.descriptors().filter(|d| d.enabled()).collect();
    let rendered: Vec<Value> = enabled
        .iter()
        .map(|d| json!({ "name": d.name(), "extra": d.extra() }))
        .collect();
    let text: Vec<String> = enabled
        .iter()
        .map(|d| {
            if d.extra().is_empty() {
                d.name().to_string()
            } else {
                format!("{} {}", d.name(), Value::Object(d.extra().clone()))
            }
        })
        .collect();
    out.emit(&rendered, &text.join("\n"))
}
