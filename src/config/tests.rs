// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;
use std::time::Duration;

use super::{Config, ConfigLoader};
use crate::logging::LogLevel;

#[test]
fn test_default_config() {
    let config = Config::default();
    insta::assert_yaml_snapshot!(config, @r"
    global:
      log_level: 2
      file_log_level: 5
    backends:
      order:
        - git
        - mercurial
      remote_timeout_secs: 10
    ");
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_full_file() {
    let config = Config::parse(
        r#"
        [global]
        log_level = 4
        log_file = "logs/vcskit.log"

        [backends]
        order = ["mercurial", "git"]
        credential_manager = true
        remote_timeout_secs = 30
        git_program = "/opt/git/bin/git"
        "#,
    )
    .unwrap();

    assert_eq!(config.global.log_level, LogLevel::DEBUG);
    assert_eq!(config.global.log_file, Some(PathBuf::from("logs/vcskit.log")));
    assert_eq!(config.backends.order, ["mercurial", "git"]);

    let settings = config.backends.settings();
    assert!(settings.credential_manager);
    assert_eq!(settings.remote_timeout, Duration::from_secs(30));
    assert_eq!(settings.git_program, Some(PathBuf::from("/opt/git/bin/git")));
    assert_eq!(settings.hg_program, None);
}

#[test]
fn test_credential_manager_platform_default() {
    let settings = Config::default().backends.settings();
    assert_eq!(settings.credential_manager, cfg!(windows));
}

#[test]
fn test_rejects_unknown_backend() {
    let err = Config::parse("[backends]\norder = [\"git\", \"svn\"]").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid value for 'order' in section '[backends]': unknown backend 'svn', expected one of: git, mercurial");
}

#[test]
fn test_rejects_duplicate_and_empty_order() {
    let err = Config::parse("[backends]\norder = [\"git\", \"git\"]").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid value for 'order' in section '[backends]': backend 'git' listed twice");

    let err = Config::parse("[backends]\norder = []").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid value for 'order' in section '[backends]': at least one backend is required");
}

#[test]
fn test_rejects_zero_timeout() {
    let err = Config::parse("[backends]\nremote_timeout_secs = 0").unwrap_err();
    assert!(err.to_string().contains("remote_timeout_secs"));
}

#[test]
fn test_rejects_unknown_keys_and_levels() {
    assert!(Config::parse("[backends]\ncredentials = true").is_err());
    assert!(Config::parse("[global]\nlog_level = 9").is_err());
}

#[test]
fn test_overrides_win_over_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vcskit.toml");
    std::fs::write(&path, "[global]\nlog_level = 1\n").unwrap();

    let config = ConfigLoader::new()
        .add_toml_file(&path)
        .set("global.log_level", 5)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.global.log_level, LogLevel::TRACE);
}

#[test]
fn test_missing_required_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::from_file(dir.path().join("absent.toml")).is_err());

    let loader = ConfigLoader::new().add_toml_file_optional(dir.path().join("absent.toml"));
    assert!(loader.loaded_files().is_empty());
    assert!(loader.build().is_ok());
}

#[test]
fn test_loaded_files_listing() {
    let loader = ConfigLoader::new().add_toml_str("[global]\nlog_level = 3");
    insta::assert_snapshot!(loader.format_loaded_files().join("\n"), @"1. [string] <string>");
}

#[test]
fn test_format_options() {
    let config = Config::parse("[backends]\ngit_program = \"/usr/bin/git\"").unwrap();
    insta::assert_snapshot!(config.format_options().join("\n"), @r"
    backends.credential_manager  = auto
    backends.git_program         = /usr/bin/git
    backends.hg_program          =
    backends.order               = git, mercurial
    backends.remote_timeout_secs = 10
    global.file_log_level        = 5
    global.log_file              =
    global.log_level             = 2
    ");
}

#[test]
fn test_log_config_from_global() {
    let config = Config::parse("[global]\nlog_level = 0\nlog_file = \"out.log\"").unwrap();
    let log = config.global.log_config();
    assert_eq!(log.console_level(), LogLevel::SILENT);
    assert_eq!(log.log_file(), Some(std::path::Path::new("out.log")));
    assert!(!log.show_timestamps());
}
