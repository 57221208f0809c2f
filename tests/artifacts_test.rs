//! Integration tests for ArtifactWriter output layout and JSON shapes.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use smart2mapeo::application::services::{ArtifactWriter, Metadata};
use smart2mapeo::application::{transform, TransformOutput};
use smart2mapeo::config::Settings;
use smart2mapeo::domain::FALLBACK_LANGUAGE;
use smart2mapeo::infrastructure::traits::RealFileSystem;
use smart2mapeo::infrastructure::xml::parse_document;
use smart2mapeo::util::testing::{init_test_setup, SAMPLE_ICON, SAMPLE_MODEL};

fn sample_output() -> TransformOutput {
    transformed(SAMPLE_MODEL)
}

fn transformed(xml: &str) -> TransformOutput {
    init_test_setup();
    let document = parse_document(xml).expect("parse model");
    transform(document, FALLBACK_LANGUAGE).expect("transform model")
}

fn writer(settings: Settings) -> ArtifactWriter {
    ArtifactWriter::new(Arc::new(RealFileSystem), Arc::new(settings))
}

fn metadata() -> Metadata {
    Metadata {
        dataset_id: "smart".into(),
        name: "sample".into(),
        project_key: "abc123".into(),
    }
}

fn read_json(path: &Path) -> Value {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("read {}: {}", path.display(), e));
    serde_json::from_str(&content).expect("valid JSON")
}

/// Package directory holding both sample icons.
fn package_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("icons")).unwrap();
    fs::write(dir.path().join("icons/deer.svg"), SAMPLE_ICON).unwrap();
    fs::write(dir.path().join("boar.svg"), SAMPLE_ICON).unwrap();
    dir
}

// ============================================================
// write_all
// ============================================================

#[test]
fn given_sample_output_when_write_all_then_directory_layout_is_complete() {
    // Arrange
    let package = package_dir();
    let dest = TempDir::new().unwrap();
    let output = sample_output();

    // Act
    let summary = writer(Settings::default())
        .write_all(&output, package.path(), dest.path(), &metadata())
        .expect("write_all");

    // Assert
    assert_eq!(summary.presets, 3);
    assert_eq!(summary.fields, 5);
    assert_eq!(summary.icons.copied, vec!["deer", "boar"]);
    assert_eq!(summary.icons.skipped, vec!["Ciervo rojo"]);
    assert!(summary.raw_model.is_none());

    let root = dest.path();
    for file in [
        "defaults.json",
        "metadata.json",
        "presets/animals-deer.json",
        "presets/animals-deer-reddeer.json",
        "presets/animals-boar.json",
        "fields/count.json",
        "fields/habitat.json",
        "fields/sign.json",
        "fields/alive.json",
        "fields/notes.json",
        "icons/deer-100px.svg",
        "icons/deer-24px.svg",
        "icons/boar-100px.svg",
        "icons/boar-24px.svg",
    ] {
        assert!(root.join(file).is_file(), "missing {file}");
    }
    assert!(!root.join("fields/weather.json").exists());
    assert!(!root.join("cm_model.json").exists());
}

#[test]
fn given_dump_model_setting_when_write_all_then_raw_model_written() {
    let package = package_dir();
    let dest = TempDir::new().unwrap();
    let settings = Settings {
        dump_model: true,
        ..Settings::default()
    };

    let summary = writer(settings)
        .write_all(&sample_output(), package.path(), dest.path(), &metadata())
        .expect("write_all");

    let raw = read_json(&summary.raw_model.expect("raw model path"));
    assert_eq!(raw["name"], "ConfigurableModel");
}

// ============================================================
// JSON shapes
// ============================================================

#[test]
fn given_preset_when_written_then_json_has_expected_shape() {
    let dest = TempDir::new().unwrap();
    let output = sample_output();

    writer(Settings::default())
        .write_presets(dest.path(), &output.presets)
        .expect("write presets");

    let deer = read_json(&dest.path().join("presets/animals-deer.json"));
    assert_eq!(
        deer,
        json!({
            "name": "Ciervo",
            "icon": "deer",
            "geometry": ["point"],
            "tags": {
                "smart:id": "n2",
                "smart:dmuuid": "dm-2",
                "smart:configid": "cfg-1",
                "smart:categorykey": "deer",
                "smart:categoryhkey": "animals.deer."
            },
            "terms": [],
            "fields": ["count", "habitat", "sign"]
        })
    );

    let red_deer = read_json(&dest.path().join("presets/animals-deer-reddeer.json"));
    assert!(red_deer.get("icon").is_none(), "absent icon is omitted");
    assert!(red_deer["tags"].get("smart:dmuuid").is_none());
}

#[test]
fn given_fields_when_written_then_json_has_type_specific_payload() {
    let dest = TempDir::new().unwrap();
    let output = sample_output();

    writer(Settings::default())
        .write_fields(dest.path(), &output.fields)
        .expect("write fields");

    let fields = dest.path().join("fields");
    assert_eq!(
        read_json(&fields.join("count.json")),
        json!({"key": "count", "label": "Cantidad", "type": "number", "min_value": 0})
    );
    assert_eq!(
        read_json(&fields.join("alive.json")),
        json!({
            "key": "alive",
            "label": "Vivo",
            "type": "select_one",
            "options": [{"label": "Yes", "value": true}, {"label": "No", "value": false}]
        })
    );
    assert_eq!(
        read_json(&fields.join("habitat.json"))["options"],
        json!([{"label": "Bosque", "value": "forest"}, {"label": "Río", "value": "river"}])
    );
    assert_eq!(
        read_json(&fields.join("notes.json")),
        json!({"key": "notes", "label": "Notas", "type": "text"})
    );
}

#[test]
fn given_presets_when_writing_defaults_then_point_list_is_seeded() {
    let dest = TempDir::new().unwrap();
    let output = sample_output();

    writer(Settings::default())
        .write_defaults(dest.path(), &output.presets)
        .expect("write defaults");

    assert_eq!(
        read_json(&dest.path().join("defaults.json")),
        json!({
            "area": [],
            "line": [],
            "point": ["point", "animals-deer", "animals-deer-reddeer", "animals-boar"],
            "vertex": [],
            "relation": []
        })
    );
}

#[test]
fn given_metadata_when_written_then_project_key_is_camel_case() {
    let dest = TempDir::new().unwrap();

    writer(Settings::default())
        .write_metadata(dest.path(), &metadata())
        .expect("write metadata");

    assert_eq!(
        read_json(&dest.path().join("metadata.json")),
        json!({"dataset_id": "smart", "name": "sample", "projectKey": "abc123"})
    );
}

#[test]
fn given_duplicate_preset_ids_when_write_presets_then_counted_once() {
    let dest = TempDir::new().unwrap();
    let output = transformed(
        r#"<ConfigurableModel><nodes>
             <node categoryKey="k" categoryHkey="a.k."><name value="One"/></node>
             <node categoryKey="k" categoryHkey="a.k."><name value="Two"/></node>
           </nodes></ConfigurableModel>"#,
    );

    let written = writer(Settings::default())
        .write_presets(dest.path(), &output.presets)
        .expect("write presets");

    assert_eq!(written, 1);
    assert_eq!(fs::read_dir(dest.path().join("presets")).unwrap().count(), 1);
    assert_eq!(read_json(&dest.path().join("presets/a-k.json"))["name"], "Two");
}

// ============================================================
// Output confinement
// ============================================================

#[test]
fn given_field_key_with_parent_segments_when_write_fields_then_skipped() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out");
    let output = transformed(
        r#"<ConfigurableModel><nodes>
             <node categoryKey="k"><name value="N"/>
               <attribute attributeKey="../../escaped_field" type="TEXT"><name value="Bad"/></attribute>
               <attribute attributeKey="good" type="TEXT"><name value="Good"/></attribute>
             </node>
           </nodes></ConfigurableModel>"#,
    );

    // Act
    let written = writer(Settings::default())
        .write_fields(&dest, &output.fields)
        .expect("write fields");

    // Assert
    assert_eq!(written, 1);
    assert!(dest.join("fields/good.json").is_file());
    assert!(!temp.path().join("escaped_field.json").exists());
    assert!(!dest.join("escaped_field.json").exists());
}

#[test]
fn given_preset_hkey_with_separator_when_write_presets_then_skipped() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out");
    let output = transformed(
        r#"<ConfigurableModel><nodes>
             <node categoryKey="x" categoryHkey="../escape"><name value="Bad"/></node>
             <node categoryKey="ok"><name value="Good"/></node>
           </nodes></ConfigurableModel>"#,
    );

    let written = writer(Settings::default())
        .write_presets(&dest, &output.presets)
        .expect("write presets");

    assert_eq!(written, 1);
    assert!(dest.join("presets/ok.json").is_file());
    assert_eq!(fs::read_dir(&dest).unwrap().count(), 1, "only presets/ was created");
}

// ============================================================
// Icons
// ============================================================

#[test]
fn given_missing_icon_files_when_write_icons_then_skips_without_failing() {
    let empty_package = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let output = sample_output();

    let report = writer(Settings::default())
        .write_icons(empty_package.path(), dest.path(), &output.presets)
        .expect("write icons");

    assert!(report.copied.is_empty());
    assert_eq!(report.skipped.len(), 3);
    assert!(dest.path().join("icons").is_dir());
}

#[test]
fn given_custom_sizes_when_write_icons_then_one_copy_per_size() {
    let package = package_dir();
    let dest = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.icons.sizes = vec!["48px".into()];

    writer(settings)
        .write_icons(package.path(), dest.path(), &sample_output().presets)
        .expect("write icons");

    assert!(dest.path().join("icons/deer-48px.svg").is_file());
    assert!(!dest.path().join("icons/deer-100px.svg").exists());
}

#[test]
fn given_icon_only_at_package_root_when_write_icons_then_found_by_name() {
    let package = TempDir::new().unwrap();
    // deer's declared path icons\deer.svg is absent, deer.svg at the root is used
    fs::write(package.path().join("deer.svg"), SAMPLE_ICON).unwrap();
    let dest = TempDir::new().unwrap();

    let report = writer(Settings::default())
        .write_icons(package.path(), dest.path(), &sample_output().presets)
        .expect("write icons");

    assert_eq!(report.copied, vec!["deer"]);
    assert_eq!(
        fs::read_to_string(dest.path().join("icons/deer-24px.svg")).unwrap(),
        SAMPLE_ICON
    );
}
