// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::{
    AuthError, BackendUnavailable, ConfigError, OperationError, PropertyError, PropertyOp,
    VcsError, VcsResult,
};
use crate::auth::CredentialFields;
use crate::feature::Operation;

#[test]
fn test_config_error_display() {
    let err = ConfigError::InvalidValue {
        section: "backends".to_string(),
        key: "order".to_string(),
        message: "unknown backend 'svn'".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"invalid value for 'order' in section '[backends]': unknown backend 'svn'");
}

#[test]
fn test_vcs_error_size() {
    // Box<str> variants are 16 bytes (fat pointer) + discriminant
    let size = std::mem::size_of::<VcsError>();
    assert!(size <= 24, "VcsError is {size} bytes, expected <= 24");
}

#[test]
fn test_vcs_result_size() {
    let size = std::mem::size_of::<VcsResult<()>>();
    assert!(size <= 24, "VcsResult<()> is {size} bytes, expected <= 24");
}

#[test]
fn test_no_valid_backend_message() {
    let err = VcsError::no_valid_backend(Path::new("/work/project"));
    insta::assert_snapshot!(err.to_string(), @"no valid backend for directory: /work/project");
}

#[test]
fn test_backend_unavailable_is_recoverable() {
    let err: VcsError =
        BackendUnavailable::missing_program(Path::new("/work"), "git", "git").into();
    assert!(err.is_backend_unavailable());
    assert!(!err.is_authentication());
    insta::assert_snapshot!(err.to_string(), @"git backend unavailable for /work: missing git");

    let err: VcsError = BackendUnavailable::not_a_repository(Path::new("/work"), "mercurial").into();
    insta::assert_snapshot!(err.to_string(), @"mercurial backend unavailable for /work: not a repository");
}

#[test]
fn test_property_error_display() {
    let err = PropertyError::new("branch", PropertyOp::Set)
        .with_raw("error: pathspec 'nope' did not match\n");
    insta::assert_snapshot!(err.to_string(), @"failed to set property 'branch': error: pathspec 'nope' did not match");

    let bare = PropertyError::new("tags", PropertyOp::Get).with_raw("   ");
    assert_eq!(bare.raw_error, None, "blank raw output is dropped");
    insta::assert_snapshot!(bare.to_string(), @"failed to get property 'tags'");
}

#[test]
fn test_operation_error_display() {
    let err = OperationError::new("push")
        .with_error("Failed to push from remote")
        .with_raw("fatal: unable to access");
    insta::assert_snapshot!(err.to_string(), @"push failed: Failed to push from remote (fatal: unable to access)");
}

#[test]
fn test_unsupported_is_distinct() {
    let err = VcsError::Unsupported(Operation::Push);
    assert!(err.is_unsupported());
    insta::assert_snapshot!(err.to_string(), @"operation 'push' is not supported by this backend");
}

#[test]
fn test_auth_error_missing_fields() {
    let err = AuthError {
        supplied: CredentialFields::USERNAME,
        required: CredentialFields::USERNAME | CredentialFields::PASSWORD,
        username: Some("alice".to_string()),
        error: "Wrong credentials".to_string(),
    };
    assert_eq!(err.missing(), CredentialFields::PASSWORD);
    assert!(!err.are_credentials_inserted());
    let err: VcsError = err.into();
    assert!(err.is_authentication());
    insta::assert_snapshot!(err.to_string(), @"authentication failed: Wrong credentials");
}
