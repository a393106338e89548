// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::core::process::FixedLocator;
use crate::testing::{ScriptedLauncher, ScriptedRunner};

use super::*;

fn context(runner: Arc<ScriptedRunner>) -> BackendContext {
    BackendContext {
        runner,
        locator: Arc::new(
            FixedLocator::new()
                .with("git", "/usr/bin/git")
                .with("hg", "/usr/bin/hg"),
        ),
        launcher: Arc::new(ScriptedLauncher::new(Vec::new())),
        store: None,
        settings: BackendSettings::default(),
    }
}

#[test]
fn test_settings_defaults() {
    let settings = BackendSettings::default();
    assert_eq!(settings.credential_manager, cfg!(windows));
    assert_eq!(settings.remote_timeout, Duration::from_secs(10));
    assert!(settings.git_program.is_none());

    let custom = BackendSettings::builder()
        .with_credential_manager(true)
        .with_remote_timeout(Duration::from_secs(3))
        .build();
    assert!(custom.credential_manager);
    assert_eq!(custom.remote_timeout, Duration::from_secs(3));
}

#[test]
fn test_find_program_prefers_override() {
    let ctx = context(Arc::new(ScriptedRunner::new()));
    assert_eq!(
        ctx.find_program("git", Some(Path::new("/opt/git"))),
        Some(PathBuf::from("/opt/git"))
    );
    assert_eq!(ctx.find_program("git", None), Some(PathBuf::from("/usr/bin/git")));
    assert_eq!(ctx.find_program("svn", None), None);
}

#[test]
fn test_probe_classifies_results() {
    let unavailable: VcsResult<Box<dyn VcsBackend>> =
        Err(BackendUnavailable::not_a_repository(Path::new("/tmp"), "git").into());
    assert!(matches!(Probe::from(unavailable), Probe::NotApplicable(_)));

    let failed: VcsResult<Box<dyn VcsBackend>> = Err(VcsError::NoActiveBackend);
    assert!(matches!(Probe::from(failed), Probe::Failed(_)));
}

#[test]
fn test_factories_by_name() {
    assert_eq!(BackendFactory::by_name("git").map(|f| f.name()), Some("git"));
    assert_eq!(
        BackendFactory::by_name("mercurial").map(|f| f.name()),
        Some("mercurial")
    );
    assert!(BackendFactory::by_name("svn").is_none());
    assert_eq!(BUILTIN_BACKENDS, ["git", "mercurial"]);
}

#[test]
fn test_git_factory_probe() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(ScriptedRunner::new());
    runner.on(&["rev-parse"], 128, "");
    let ctx = context(runner.clone());

    let probe = BackendFactory::git().probe(dir.path(), &ctx);
    assert!(matches!(probe, Probe::NotApplicable(ref r) if !r.is_valid_repository));

    runner.unavailable(&["root"]);
    let probe = BackendFactory::mercurial().probe(dir.path(), &ctx);
    let Probe::NotApplicable(reason) = probe else {
        panic!("expected NotApplicable, got {probe:?}");
    };
    assert_eq!(reason.programs, vec!["/usr/bin/hg".to_string()]);
}

#[test]
fn test_default_methods_are_unsupported() {
    #[derive(Debug)]
    struct Minimal;

    impl VcsBackend for Minimal {
        fn name(&self) -> &'static str {
            "minimal"
        }

        fn features(&self) -> &'static FeatureTable {
            static TABLE: std::sync::LazyLock<FeatureTable> =
                std::sync::LazyLock::new(|| FeatureTable::builder().build());
            &TABLE
        }

        fn repo_dir(&self) -> &Path {
            Path::new("/")
        }
    }

    let mut backend = Minimal;
    assert!(matches!(
        backend.push(),
        Err(VcsError::Unsupported(Operation::Push))
    ));
    assert!(matches!(
        backend.set_branch("main"),
        Err(VcsError::Unsupported(Operation::BranchSet))
    ));
    assert!(backend.required_credentials().is_empty());
}

#[test]
fn test_tool_applies_environment() {
    let runner = Arc::new(ScriptedRunner::new());
    let tool = Tool::new(
        "git",
        PathBuf::from("/usr/bin/git"),
        PathBuf::from("/repo"),
        &[("LC_ALL", "C")],
        runner.clone(),
    );
    let builder = tool.command(["status", "-b"]);
    insta::assert_snapshot!(builder.command_line(), @"/usr/bin/git status -b");
    assert_eq!(builder.working_dir(), Some(Path::new("/repo")));
    assert_eq!(builder.env_vars(), [("LC_ALL".to_string(), "C".to_string())]);

    runner.unavailable(&["status"]);
    let err = tool.run(["status"]).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"git backend unavailable for /repo: missing /usr/bin/git");
}
