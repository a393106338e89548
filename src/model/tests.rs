// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ChangeState, CommitRecord, FileChange};
use crate::error::ChangeStateError;

#[test]
fn test_change_state_name_code_bijection() {
    for state in ChangeState::ALL {
        assert_eq!(ChangeState::from_name(state.name()), Ok(state));
        assert_eq!(ChangeState::from_code(state.code()), Ok(state));
        assert_eq!(
            ChangeState::from_name(state.name()).map(ChangeState::name),
            Ok(state.name())
        );
    }
}

#[test]
fn test_change_state_codes_are_stable() {
    let codes: Vec<_> = ChangeState::ALL
        .iter()
        .map(|s| format!("{s}={}", s.code()))
        .collect();
    insta::assert_snapshot!(codes.join(" "), @"unchanged=0 added=1 removed=2 modified=3 renamed=10 copied=11 ignored=98 unknown=99");
}

#[test]
fn test_change_state_edited_alias() {
    assert_eq!(ChangeState::from_name("edited"), Ok(ChangeState::Modified));
    assert_eq!(ChangeState::from_name("MODIFIED"), Ok(ChangeState::Modified));
}

#[test]
fn test_change_state_invalid_inputs() {
    assert_eq!(
        ChangeState::from_name("merged"),
        Err(ChangeStateError::UnknownName("merged".to_string()))
    );
    assert_eq!(
        ChangeState::from_code(4),
        Err(ChangeStateError::UnknownCode(4))
    );
    let err = "conflicted".parse::<ChangeState>().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"given state 'conflicted' does not exist");
}

#[test]
fn test_change_state_serde_uses_names() {
    let change = FileChange::new("src/lib.rs", ChangeState::Modified, true);
    let json = serde_json::to_string(&change).unwrap();
    insta::assert_snapshot!(json, @r#"{"path":"src/lib.rs","kind":"modified","staged":true}"#);
    let back: FileChange = serde_json::from_str(&json).unwrap();
    assert_eq!(back, change);
}

#[test]
fn test_commit_content_derived_even_when_empty() {
    let empty = CommitRecord::new(
        "abc123".into(),
        String::new(),
        String::new(),
        "alice".into(),
        "alice@example.com".into(),
        None,
    );
    assert_eq!(empty.content, "\n");

    let full = CommitRecord::new(
        "abc123".into(),
        "Fix parser".into(),
        "Handles quoted paths.\n".into(),
        "alice".into(),
        "alice@example.com".into(),
        None,
    );
    assert_eq!(full.content, "Fix parser\nHandles quoted paths.\n");
}
