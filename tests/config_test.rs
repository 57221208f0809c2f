//! Integration tests for Settings loading with layered merge semantics.
//!
//! Note: These tests run without a global config (temp directories only),
//! so the explicit file is merged over compiled defaults.

use std::fs;

use tempfile::TempDir;

use smart2mapeo::application::ApplicationError;
use smart2mapeo::config::Settings;

// ============================================================
// Settings::load() with an explicit config file
// ============================================================

#[test]
fn given_config_file_when_load_then_overrides_only_specified_values() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("smart2mapeo.toml");
    fs::write(
        &path,
        r#"
fallback_language = "fr"
dataset_id = "ranger-patrol"

[icons]
sizes = ["48px"]
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.fallback_language, "fr");
    assert_eq!(settings.dataset_id, "ranger-patrol");
    assert_eq!(settings.icons.sizes, vec!["48px"], "arrays are replaced");
    assert_eq!(settings.icons.extension, "svg");
    assert_eq!(settings.model_file, "cm_model.xml");
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();

    let result = Settings::load(Some(&dir.path().join("absent.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "dump_model = [not valid").unwrap();

    let result = Settings::load(Some(&path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_tilde_work_dir_when_load_then_expanded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("smart2mapeo.toml");
    fs::write(&path, r#"work_dir = "~/smart-work""#).unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    let work_dir = settings.work_dir.expect("work_dir set");
    assert!(!work_dir.to_string_lossy().starts_with('~'));
    assert!(work_dir.ends_with("smart-work"));
}

#[test]
fn given_effective_settings_when_to_toml_then_round_trips() {
    let settings = Settings::default();

    let rendered = settings.to_toml().expect("to_toml");
    let parsed: Settings = toml::from_str(&rendered).expect("parse rendered");

    assert_eq!(parsed, settings);
}
