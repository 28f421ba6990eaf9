//! Integration tests for layered Settings loading.
//!
//! These pass an explicit (temporary) global path so the user's real config
//! never leaks into the results.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use treeflow::application::ApplicationError;
use treeflow::config::{config_template, local_config_path, Settings};

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_no_config_files_when_loading_then_uses_defaults() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load_from(None, Some(project.path())).expect("load settings");

    assert_eq!(settings.layout.horizontal_spacing, 200.0);
    assert_eq!(settings.layout.vertical_spacing, 120.0);
}

#[test]
fn given_local_config_when_loading_then_overrides_defaults() {
    let project = TempDir::new().unwrap();
    write(
        &project,
        ".treeflow.toml",
        r#"
[layout]
horizontal_spacing = 150.0

[style]
edge_kind = "straight"
"#,
    );

    let settings = Settings::load_from(None, Some(project.path())).expect("load settings");

    assert_eq!(settings.layout.horizontal_spacing, 150.0);
    assert_eq!(settings.layout.vertical_spacing, 120.0);
    assert_eq!(settings.style.edge_kind, "straight");
}

#[test]
fn given_global_and_local_config_when_loading_then_local_wins() {
    let global_dir = TempDir::new().unwrap();
    let global = write(
        &global_dir,
        "treeflow.toml",
        r#"
[layout]
horizontal_spacing = 300.0
vertical_spacing = 90.0
"#,
    );
    let project = TempDir::new().unwrap();
    write(
        &project,
        ".treeflow.toml",
        r#"
[layout]
vertical_spacing = 60.0
"#,
    );

    let settings =
        Settings::load_from(Some(&global), Some(project.path())).expect("load settings");

    assert_eq!(settings.layout.horizontal_spacing, 300.0);
    assert_eq!(settings.layout.vertical_spacing, 60.0);
}

#[test]
fn given_negative_spacing_in_file_when_loading_then_config_error() {
    let project = TempDir::new().unwrap();
    write(
        &project,
        ".treeflow.toml",
        "[layout]\nvertical_spacing = -5.0\n",
    );

    let err = Settings::load_from(None, Some(project.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("vertical_spacing"));
}

#[test]
fn given_invalid_toml_when_loading_then_config_error_names_file() {
    let project = TempDir::new().unwrap();
    write(&project, ".treeflow.toml", "[layout\nhorizontal_spacing = ");

    let err = Settings::load_from(None, Some(project.path())).unwrap_err();

    assert!(err.to_string().contains(".treeflow.toml"));
}

#[test]
fn given_tilde_tree_file_when_loading_then_expands_home() {
    let project = TempDir::new().unwrap();
    write(
        &project,
        ".treeflow.toml",
        "tree_file = \"~/trees/org.json\"\n",
    );

    let settings = Settings::load_from(None, Some(project.path())).expect("load settings");

    let tree_file = settings.tree_file.expect("tree_file set");
    assert!(!tree_file.to_string_lossy().starts_with('~'));
    assert!(tree_file.ends_with("trees/org.json"));
}

#[test]
fn given_template_written_as_local_config_when_loading_then_equals_defaults() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), config_template()).unwrap();

    let settings = Settings::load_from(None, Some(project.path())).expect("load settings");

    assert_eq!(settings, Settings::default());
}
