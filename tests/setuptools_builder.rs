// tests/setuptools_builder.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use wst::builder::setuptools::{FALLBACK_SITE_PACKAGES, site_packages_dir};
use wst::builder::{Builder, SetuptoolsBuilder};
use wst::env::Environment;
use wst::errors::WstError;
use wst::shell::RealShell;
use wst::types::{BuildTargets, BuildType, Project, ProjectPaths};
use wst_test_utils::fake_shell::RecordingShell;
use wst_test_utils::init_tracing;

const SITE: &str = "lib/python3.12/site-packages";

fn project(name: &str, root: &Path) -> Project {
    Project {
        name: name.to_string(),
        builder: "setuptools".to_string(),
        source_dir: root.join("src").join(name),
        build_dir: root.join("build").join(name),
        args: vec![],
        after: vec![],
    }
}

fn paths_for(project: &Project, prefix: &str) -> ProjectPaths {
    ProjectPaths::for_project(project, Path::new(prefix))
}

fn recording_builder() -> (Arc<RecordingShell>, SetuptoolsBuilder) {
    let shell = Arc::new(RecordingShell::new());
    let builder = SetuptoolsBuilder::with_site_packages(shell.clone(), SITE);
    (shell, builder)
}

#[test]
fn env_adds_prefix_site_packages_to_pythonpath() {
    let (_shell, builder) = recording_builder();
    let proj = project("pkg", Path::new("/ws"));
    let mut env = Environment::new();

    builder.env(&proj, &paths_for(&proj, "/ws/install"), &mut env);

    let expected = PathBuf::from("/ws/install").join(SITE);
    assert_eq!(
        env.path_entries("PYTHONPATH"),
        vec![expected.to_string_lossy().into_owned()]
    );
}

#[test]
fn env_twice_with_same_prefix_adds_entry_once() {
    let (_shell, builder) = recording_builder();
    let proj = project("pkg", Path::new("/ws"));
    let paths = paths_for(&proj, "/ws/install");
    let mut env = Environment::new();

    builder.env(&proj, &paths, &mut env);
    builder.env(&proj, &paths, &mut env);

    assert_eq!(env.path_entries("PYTHONPATH").len(), 1);
}

#[test]
fn env_contributions_of_earlier_projects_survive() {
    let (_shell, builder) = recording_builder();
    let mut env: Environment = [("PYTHONPATH", "/caller/lib")].into_iter().collect();

    let prefixes = ["/stage/a", "/stage/b", "/stage/c"];
    for (i, prefix) in prefixes.iter().enumerate() {
        let proj = project(&format!("p{i}"), Path::new("/ws"));
        builder.env(&proj, &paths_for(&proj, prefix), &mut env);
    }

    let entries = env.path_entries("PYTHONPATH");
    assert_eq!(entries[0], "/caller/lib");
    for prefix in prefixes {
        let expected = Path::new(prefix).join(SITE).to_string_lossy().into_owned();
        assert!(entries.contains(&expected), "missing {expected} in {entries:?}");
    }
    assert_eq!(entries.len(), 4);
}

#[tokio::test]
async fn configure_is_a_successful_no_op() {
    let (shell, builder) = recording_builder();
    let proj = project("pkg", Path::new("/ws"));
    let paths = paths_for(&proj, "/ws/install");

    let ok = builder
        .configure(&proj, &paths, &Environment::new(), BuildType::Release, &[])
        .await
        .unwrap();

    assert!(ok);
    assert!(shell.calls().is_empty());
}

#[tokio::test]
async fn build_with_named_targets_is_rejected_without_running_anything() {
    init_tracing();
    let (shell, builder) = recording_builder();
    let proj = project("pkg", Path::new("/ws"));
    let paths = paths_for(&proj, "/ws/install");
    let targets = BuildTargets::from(vec!["docs".to_string()]);

    let result = builder
        .build(&proj, &paths, &Environment::new(), &targets, &[])
        .await;

    match result {
        Err(WstError::Unsupported(msg)) => {
            assert!(msg.contains("pip3 does not support alternate build targets"));
            assert!(msg.contains("\"docs\""));
        }
        other => panic!("Expected Unsupported error, got: {:?}", other),
    }
    assert!(shell.calls().is_empty());
}

#[tokio::test]
async fn build_with_default_targets_runs_pip_install() {
    let (shell, builder) = recording_builder();
    let proj = project("pkg", Path::new("/ws"));
    let paths = paths_for(&proj, "/ws/install");
    let mut env = Environment::new();
    builder.env(&proj, &paths, &mut env);
    let args = vec!["--no-deps".to_string(), "--quiet".to_string()];

    let ok = builder
        .build(&proj, &paths, &env, &BuildTargets::Default, &args)
        .await
        .unwrap();
    assert!(ok);

    let invocations = shell.invocations();
    assert_eq!(invocations.len(), 1);
    let inv = &invocations[0];
    assert_eq!(
        inv.argv,
        vec![
            "pip3".to_string(),
            "install".to_string(),
            "--prefix=/ws/install".to_string(),
            "--build=/ws/build/pkg".to_string(),
            "--no-deps".to_string(),
            "--quiet".to_string(),
            "/ws/src/pkg".to_string(),
        ]
    );
    assert_eq!(inv.cwd, PathBuf::from("/ws/src/pkg"));
    assert_eq!(inv.env, env);
}

#[tokio::test]
async fn build_treats_all_target_as_default() {
    let (shell, builder) = recording_builder();
    let proj = project("pkg", Path::new("/ws"));
    let paths = paths_for(&proj, "/ws/install");
    let targets = BuildTargets::from(Some(vec!["all".to_string()]));

    let ok = builder
        .build(&proj, &paths, &Environment::new(), &targets, &[])
        .await
        .unwrap();

    assert!(ok);
    assert_eq!(shell.invocations().len(), 1);
}

#[tokio::test]
async fn build_reports_tool_failure_as_false() {
    let shell = Arc::new(RecordingShell::new().fail_when("pip3"));
    let builder = SetuptoolsBuilder::with_site_packages(shell.clone(), SITE);
    let proj = project("pkg", Path::new("/ws"));
    let paths = paths_for(&proj, "/ws/install");

    let ok = builder
        .build(&proj, &paths, &Environment::new(), &BuildTargets::Default, &[])
        .await
        .unwrap();

    assert!(!ok);
    assert_eq!(shell.invocations().len(), 1);
}

#[tokio::test]
async fn clean_removes_build_dir_tree() {
    let dir = tempfile::tempdir().unwrap();
    let proj = project("pkg", dir.path());
    let paths = ProjectPaths::for_project(&proj, &dir.path().join("install"));
    std::fs::create_dir_all(proj.build_dir.join("nested")).unwrap();
    std::fs::write(proj.build_dir.join("nested").join("obj"), b"x").unwrap();

    let builder = SetuptoolsBuilder::with_site_packages(Arc::new(RealShell::new()), SITE);
    builder.clean(&proj, &paths, &Environment::new()).await.unwrap();

    assert!(!proj.build_dir.exists());
}

#[tokio::test]
async fn clean_without_build_dir_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let proj = project("pkg", dir.path());
    let paths = ProjectPaths::for_project(&proj, &dir.path().join("install"));
    assert!(!proj.build_dir.exists());

    let builder = SetuptoolsBuilder::with_site_packages(Arc::new(RealShell::new()), SITE);
    builder.clean(&proj, &paths, &Environment::new()).await.unwrap();

    assert!(!proj.build_dir.exists());
}

#[tokio::test]
async fn clean_then_build_from_absent_build_dir_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let proj = project("pkg", dir.path());
    let paths = ProjectPaths::for_project(&proj, &dir.path().join("install"));

    let cleaner = SetuptoolsBuilder::with_site_packages(Arc::new(RealShell::new()), SITE);
    cleaner.clean(&proj, &paths, &Environment::new()).await.unwrap();

    let (shell, builder) = recording_builder();
    let ok = builder
        .build(&proj, &paths, &Environment::new(), &BuildTargets::Default, &[])
        .await
        .unwrap();

    assert!(ok);
    assert_eq!(shell.invocations().len(), 1);
}

#[test]
fn site_packages_dir_is_relative_and_cached() {
    let first = site_packages_dir();
    let second = site_packages_dir();

    assert!(std::ptr::eq(first, second));
    assert!(first.is_relative(), "{first:?} should be relative");
    assert!(!first.as_os_str().is_empty());
    if first == Path::new(FALLBACK_SITE_PACKAGES) {
        eprintln!("python3 not available; using fallback site-packages layout");
    }
}

#[test]
fn new_uses_process_wide_site_packages() {
    let builder = SetuptoolsBuilder::new(Arc::new(RecordingShell::new()));
    assert_eq!(
        builder.python_path(Path::new("/p")),
        Path::new("/p").join(site_packages_dir())
    );
    assert_eq!(builder.name(), "setuptools");
}
