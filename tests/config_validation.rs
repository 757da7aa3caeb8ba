// tests/config_validation.rs

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use wst::config::load_and_validate;
use wst::errors::WstError;
use wst::types::BuildType;
use wst_test_utils::builders::{ConfigFileBuilder, ProjectConfigBuilder};

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn full_config_loads_with_defaults_applied() {
    let file = config_file(
        r#"
[project.core]
builder = "cmake"
args = ["-DFOO=ON"]

[project.pytool]
path = "tools/py"
builder = "setuptools"
after = ["core"]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    let root = file.path().parent().unwrap().to_path_buf();

    assert_eq!(cfg.root, root);
    assert_eq!(cfg.workspace.prefix, PathBuf::from(".wst/install"));
    assert_eq!(cfg.workspace.build_root, PathBuf::from(".wst/build"));
    assert_eq!(cfg.workspace.build_type, BuildType::Debug);
    assert_eq!(cfg.prefix(), root.join(".wst/install"));

    let core = cfg.resolve_project("core").unwrap();
    assert_eq!(core.source_dir, root.join("core"));
    assert_eq!(core.build_dir, root.join(".wst/build").join("core"));
    assert_eq!(core.args, vec!["-DFOO=ON".to_string()]);

    let pytool = cfg.resolve_project("pytool").unwrap();
    assert_eq!(pytool.source_dir, root.join("tools/py"));
    assert_eq!(pytool.after, vec!["core".to_string()]);
    assert_eq!(pytool.builder, "setuptools");
}

#[test]
fn workspace_section_overrides_defaults() {
    let file = config_file(
        r#"
[workspace]
prefix = "/opt/stage"
build_root = "out"
build_type = "rel-with-deb-info"

[project.a]
builder = "setuptools"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.prefix(), PathBuf::from("/opt/stage"));
    assert_eq!(cfg.build_root(), cfg.root.join("out"));
    assert_eq!(cfg.workspace.build_type, BuildType::RelWithDebInfo);
}

#[test]
fn dag_cycle_returns_structured_error() {
    let file = config_file(
        r#"
[project.A]
builder = "cmake"
after = ["B"]

[project.B]
builder = "cmake"
after = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(WstError::DagCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains("A") || msg.contains("B"));
        }
        Err(e) => panic!("Expected DagCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_dependency_returns_config_error() {
    let file = config_file(
        r#"
[project.A]
builder = "cmake"
after = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(WstError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("NonExistent"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_builder_returns_config_error() {
    let file = config_file(
        r#"
[project.A]
builder = "autotools"
"#,
    );

    match load_and_validate(file.path()) {
        Err(WstError::ConfigError(msg)) => {
            assert!(msg.contains("unknown builder 'autotools'"));
            assert!(msg.contains("setuptools"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn missing_builder_field_is_a_toml_error() {
    let file = config_file(
        r#"
[project.A]
path = "a"
"#,
    );

    assert!(matches!(
        load_and_validate(file.path()),
        Err(WstError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_and_validate(dir.path().join("Wst.toml")),
        Err(WstError::IoError(_))
    ));
}

#[test]
fn empty_config_is_rejected() {
    let file = config_file("[workspace]\n");
    match load_and_validate(file.path()) {
        Err(WstError::ConfigError(msg)) => assert!(msg.contains("at least one")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn self_dependency_is_rejected() {
    let result = ConfigFileBuilder::new()
        .with_project("a", ProjectConfigBuilder::cmake().after("a").build())
        .try_build();

    match result {
        Err(WstError::ConfigError(msg)) => assert!(msg.contains("cannot depend on itself")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn project_names_must_be_plain_directory_names() {
    for bad in ["", "..", "a/b"] {
        let result = ConfigFileBuilder::new()
            .with_project(bad, ProjectConfigBuilder::setuptools().build())
            .try_build();
        assert!(
            matches!(result, Err(WstError::ConfigError(_))),
            "name {bad:?} should be rejected"
        );
    }
}
