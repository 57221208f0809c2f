//! Artifact writer service
//!
//! Serializes presets, fields, the defaults index and project metadata into
//! the directory layout expected by mapeo-settings-builder, and copies icons
//! into their size-suffixed variants:
//!
//! ```text
//! <dest>/
//!   defaults.json
//!   metadata.json
//!   presets/<preset-id>.json
//!   fields/<field-key>.json
//!   icons/<icon>-100px.svg, icons/<icon>-24px.svg
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::error_ext::{IoResultExt, JsonResultExt};
use crate::application::transform::TransformOutput;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{DefaultsIndex, Field, Preset, XmlElement};
use crate::infrastructure::traits::FileSystem;

pub const PRESETS_DIR: &str = "presets";
pub const FIELDS_DIR: &str = "fields";
pub const ICONS_DIR: &str = "icons";
pub const DEFAULTS_FILE: &str = "defaults.json";
pub const METADATA_FILE: &str = "metadata.json";
pub const RAW_MODEL_FILE: &str = "cm_model.json";

/// Contents of `metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub dataset_id: String,
    pub name: String,
    #[serde(rename = "projectKey")]
    pub project_key: String,
}

/// Outcome of copying icons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconReport {
    /// Icon names copied (once per icon, all sizes)
    pub copied: Vec<String>,
    /// Preset names whose icon was undefined or missing in the package
    pub skipped: Vec<String>,
}

/// Counts of everything written for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub presets: usize,
    pub fields: usize,
    pub icons: IconReport,
    pub raw_model: Option<PathBuf>,
}

/// Writes conversion artifacts through the `FileSystem` boundary.
pub struct ArtifactWriter {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ArtifactWriter {
    /// Create a new artifact writer.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Write every artifact for a transformed model.
    ///
    /// `source_dir` is where the package was extracted; icons are read from it.
    pub fn write_all(
        &self,
        output: &TransformOutput,
        source_dir: &Path,
        dest: &Path,
        metadata: &Metadata,
    ) -> ApplicationResult<WriteSummary> {
        self.fs
            .create_dir_all(dest)
            .with_path_context("create destination directory", dest)?;

        self.write_defaults(dest, &output.presets)?;
        let presets = self.write_presets(dest, &output.presets)?;
        let fields = self.write_fields(dest, &output.fields)?;
        let icons = self.write_icons(source_dir, dest, &output.presets)?;
        self.write_metadata(dest, metadata)?;

        let raw_model = if self.settings.dump_model {
            Some(self.write_raw_model(dest, &output.raw_tree)?)
        } else {
            None
        };

        Ok(WriteSummary {
            presets,
            fields,
            icons,
            raw_model,
        })
    }

    /// Write `defaults.json` from the presets in extraction order.
    pub fn write_defaults(&self, dest: &Path, presets: &[Preset]) -> ApplicationResult<DefaultsIndex> {
        info!("Writing {}", DEFAULTS_FILE);
        let index = DefaultsIndex::from_presets(presets);
        self.write_json(&dest.join(DEFAULTS_FILE), &index, DEFAULTS_FILE)?;
        Ok(index)
    }

    /// Write one `presets/<id>.json` per preset.
    ///
    /// Returns the number of files on disk: an id produced twice is written
    /// twice but counted once.
    pub fn write_presets(&self, dest: &Path, presets: &[Preset]) -> ApplicationResult<usize> {
        info!("Writing presets ...");
        let dir = dest.join(PRESETS_DIR);
        self.fs
            .create_dir_all(&dir)
            .with_path_context("create presets directory", &dir)?;

        let mut seen = HashSet::new();
        for preset in presets {
            let Some(id) = preset.id() else {
                warn!("Preset '{}' has no category key, skipping", preset.name);
                continue;
            };
            if !is_plain_file_stem(&id) {
                warn!("Preset id '{}' is not a plain file name, skipping", id);
                continue;
            }
            if !seen.insert(id.clone()) {
                warn!("Preset id '{}' produced more than once, later one wins", id);
            }
            self.write_json(&dir.join(format!("{id}.json")), preset, "preset")?;
            debug!("Wrote preset '{}'", id);
        }
        info!("Finished writing presets");
        Ok(seen.len())
    }

    /// Write one `fields/<key>.json` per field. Returns the number written.
    pub fn write_fields(&self, dest: &Path, fields: &[Field]) -> ApplicationResult<usize> {
        info!("Converting fields ...");
        let dir = dest.join(FIELDS_DIR);
        self.fs
            .create_dir_all(&dir)
            .with_path_context("create fields directory", &dir)?;

        let mut written = 0;
        for field in fields {
            if !is_plain_file_stem(&field.key) {
                warn!("Field key '{}' is not a plain file name, skipping", field.key);
                continue;
            }
            self.write_json(&dir.join(format!("{}.json", field.key)), field, "field")?;
            debug!("Wrote field '{}'", field.key);
            written += 1;
        }
        info!("Converted fields");
        Ok(written)
    }

    /// Copy each preset icon once per configured size.
    ///
    /// A preset without an icon, whose image is not in the package, or whose
    /// copy fails is reported and skipped; it never fails the conversion.
    pub fn write_icons(
        &self,
        source_dir: &Path,
        dest: &Path,
        presets: &[Preset],
    ) -> ApplicationResult<IconReport> {
        info!("Exporting icons ...");
        let dir = dest.join(ICONS_DIR);
        self.fs
            .create_dir_all(&dir)
            .with_path_context("create icons directory", &dir)?;

        let mut report = IconReport::default();
        for preset in presets {
            let Some(icon) = &preset.icon else {
                warn!("No icon is defined for preset '{}' (skipping)", preset.name);
                report.skipped.push(preset.name.clone());
                continue;
            };
            if report.copied.contains(icon) {
                continue;
            }
            let Some(source) = self.locate_icon(source_dir, preset, icon) else {
                warn!(
                    "Icon '{}' for preset '{}' not found in package (skipping)",
                    icon, preset.name
                );
                report.skipped.push(preset.name.clone());
                continue;
            };

            let extension = source
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.settings.icons.extension.clone());
            let copied = self.settings.icons.sizes.iter().try_for_each(|size| {
                let target = dir.join(format!("{icon}-{size}.{extension}"));
                self.fs.copy(&source, &target)?;
                debug!("Copied {}", target.display());
                Ok::<_, std::io::Error>(())
            });
            match copied {
                Ok(()) => report.copied.push(icon.clone()),
                Err(e) => {
                    warn!("Cannot copy icon '{}' for preset '{}': {}", icon, preset.name, e);
                    report.skipped.push(preset.name.clone());
                }
            }
        }
        info!("Exported icons");
        Ok(report)
    }

    /// The preset's image path inside the package, else `<icon>.<ext>` at its root.
    fn locate_icon(&self, source_dir: &Path, preset: &Preset, icon: &str) -> Option<PathBuf> {
        let declared = preset
            .image_file
            .as_deref()
            .map(|image| source_dir.join(image.replace('\\', "/")));
        let by_name = source_dir.join(format!("{}.{}", icon, self.settings.icons.extension));

        declared
            .into_iter()
            .chain(std::iter::once(by_name))
            .find(|candidate| self.fs.is_file(candidate))
    }

    /// Write `metadata.json`.
    pub fn write_metadata(&self, dest: &Path, metadata: &Metadata) -> ApplicationResult<()> {
        info!("Writing {}", METADATA_FILE);
        self.write_json(&dest.join(METADATA_FILE), metadata, METADATA_FILE)
    }

    /// Write the parsed model as `cm_model.json` for inspection.
    pub fn write_raw_model(&self, dest: &Path, raw_tree: &XmlElement) -> ApplicationResult<PathBuf> {
        let file = dest.join(RAW_MODEL_FILE);
        self.write_json(&file, raw_tree, RAW_MODEL_FILE)?;
        debug!("Exported {}", RAW_MODEL_FILE);
        Ok(file)
    }

    /// Pretty-printed JSON, two-space indent.
    fn write_json<T: Serialize + ?Sized>(&self, file: &Path, value: &T, what: &str) -> ApplicationResult<()> {
        let json = serde_json::to_string_pretty(value).with_json_context(what)?;
        self.fs
            .ensure_parent(file)
            .with_path_context("create parent directory", file)?;
        self.fs
            .write(file, &json)
            .with_path_context(&format!("write {what}"), file)
    }
}

/// True when `name` stays inside the directory it is joined onto.
fn is_plain_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', ':', '\0'])
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("animals-deer", true)]
    #[case("a..b", true)]
    #[case("", false)]
    #[case("..", false)]
    #[case("../x", false)]
    #[case("a/b", false)]
    #[case("a\\b", false)]
    #[case("c:x", false)]
    fn given_name_when_checking_file_stem_then_rejects_path_syntax(
        #[case] name: &str,
        #[case] plain: bool,
    ) {
        assert_eq!(is_plain_file_stem(name), plain);
    }
}
