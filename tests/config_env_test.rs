//! Environment overrides live in their own test binary: env vars are process-global.

use std::env;
use std::fs;

use tempfile::TempDir;

use smart2mapeo::config::Settings;

#[test]
fn given_env_vars_when_load_then_env_wins_over_config_file() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("smart2mapeo.toml");
    fs::write(&path, "dataset_id = \"from-file\"\ndump_model = false\n").unwrap();
    env::set_var("SMART2MAPEO_DATASET_ID", "from-env");
    env::set_var("SMART2MAPEO_DUMP_MODEL", "true");
    env::set_var("SMART2MAPEO_ICONS__SIZES", "64px,32px");

    // Act
    let result = Settings::load(Some(&path));

    env::remove_var("SMART2MAPEO_DATASET_ID");
    env::remove_var("SMART2MAPEO_DUMP_MODEL");
    env::remove_var("SMART2MAPEO_ICONS__SIZES");

    // Assert
    let settings = result.expect("load settings");
    assert_eq!(settings.dataset_id, "from-env");
    assert!(settings.dump_model);
    assert_eq!(settings.icons.sizes, vec!["64px", "32px"]);
}
