// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde_json::json;

use super::{FeatureGroup, FeatureTable, GroupCheck, Operation};

fn sample_table() -> FeatureTable {
    FeatureTable::builder()
        .enable(Operation::BranchGet)
        .enable(Operation::Fetch)
        .enable_with(Operation::Changes, json!({"states": ["path", "kind", "staged"]}))
        .alias(Operation::Tags, "labels")
        .build()
}

#[test]
fn test_undeclared_operations_are_disabled() {
    let table = sample_table();
    assert!(table.is_enabled(Operation::BranchGet));
    assert!(!table.is_enabled(Operation::Push));
    assert!(!table.is_enabled(Operation::Tags), "alias alone does not enable");
    assert_eq!(table.descriptor(Operation::Push).name(), "push");
    assert!(table.ensure(Operation::Push).unwrap_err().is_unsupported());
    assert!(table.ensure(Operation::Fetch).is_ok());
}

#[test]
fn test_descriptor_extra_metadata() {
    let table = sample_table();
    let extra = table.descriptor(Operation::Changes).extra();
    insta::assert_snapshot!(serde_json::to_string(extra).unwrap(), @r#"{"states":["path","kind","staged"]}"#);
    assert!(table.descriptor(Operation::BranchGet).extra().is_empty());
}

#[test]
fn test_lookup_by_logical_and_declared_name() {
    let table = sample_table();
    assert_eq!(
        table.lookup("labels").map(|d| d.operation()),
        Some(Operation::Tags)
    );
    assert_eq!(
        table.lookup("tags").map(|d| d.operation()),
        Some(Operation::Tags)
    );
    assert_eq!(
        table.lookup("branch:get").map(|d| d.operation()),
        Some(Operation::BranchGet)
    );
    assert!(table.lookup("rebase").is_none());
}

#[test]
fn test_alias_cannot_shadow_another_operation() {
    let table = FeatureTable::builder()
        .enable(Operation::Push)
        .alias(Operation::Pull, "push")
        .build();
    assert_eq!(
        table.lookup("push").map(|d| d.operation()),
        Some(Operation::Push)
    );
}

#[test]
fn test_group_check_all_and_any() {
    let table = sample_table();
    assert!(table.check_group(FeatureGroup::Remote, GroupCheck::Any));
    assert!(!table.check_group(FeatureGroup::Remote, GroupCheck::All));

    let full = FeatureTable::builder()
        .enable_all(FeatureGroup::Remote.members())
        .build();
    assert!(full.check_group(FeatureGroup::Remote, GroupCheck::All));
}

#[test]
fn test_empty_groups_never_available() {
    let table = FeatureTable::builder().enable_all(&Operation::ALL).build();
    assert!(!table.check_group(FeatureGroup::Diff, GroupCheck::All));
    assert!(!table.check_group(FeatureGroup::Merge, GroupCheck::Any));
}

#[test]
fn test_operation_ids_round_trip() {
    for op in Operation::ALL {
        assert_eq!(Operation::from_id(&op.id()), Some(op));
    }
    let ids: Vec<_> = [
        Operation::BranchGet,
        Operation::BranchSet,
        Operation::CredentialsClear,
        Operation::UndoChangeAll,
    ]
    .iter()
    .map(|op| op.id())
    .collect();
    insta::assert_snapshot!(ids.join(","), @"branch:get,branch:set,credentials:del,undo_change_all");
}

#[test]
fn test_group_labels_and_membership() {
    for group in FeatureGroup::ALL {
        assert_eq!(FeatureGroup::from_label(group.label()), Some(group));
    }
    let groups: Vec<_> = FeatureGroup::containing(Operation::UndoCommit)
        .map(FeatureGroup::label)
        .collect();
    assert_eq!(groups, ["commit", "undo"]);
}
