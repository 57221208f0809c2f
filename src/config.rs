//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/smart2mapeo/smart2mapeo.toml`
//! 3. Explicit config file: `--config <file>`
//! 4. Environment variables: `SMART2MAPEO_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, FALLBACK_LANGUAGE};

/// Icon export configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IconConfig {
    /// Size suffixes; one copy `<icon>-<size>.<ext>` is written per entry
    pub sizes: Vec<String>,
    /// Extension assumed when an icon has to be located by name only
    pub extension: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sizes: vec!["100px".into(), "24px".into()],
            extension: "svg".into(),
        }
    }
}

/// Raw icon config for intermediate parsing (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawIconConfig {
    pub sizes: Option<Vec<String>>,
    pub extension: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub fallback_language: Option<String>,
    pub model_file: Option<String>,
    pub dataset_id: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub dump_model: Option<bool>,
    #[serde(default)]
    pub icons: RawIconConfig,
}

impl IconConfig {
    /// Overlay wins where it specifies a value; arrays are replaced, not merged.
    pub fn merge(&self, overlay: &RawIconConfig) -> Self {
        Self {
            sizes: overlay.sizes.clone().unwrap_or_else(|| self.sizes.clone()),
            extension: overlay
                .extension
                .clone()
                .unwrap_or_else(|| self.extension.clone()),
        }
    }
}

/// Unified configuration for smart2mapeo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Language used when the model flags no single default (default: "en")
    pub fallback_language: String,
    /// Name of the model document inside a package (default: "cm_model.xml")
    pub model_file: String,
    /// Dataset id written to metadata.json
    pub dataset_id: String,
    /// Fixed extraction directory; a temporary one is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
    /// Also write the parsed raw model as cm_model.json
    pub dump_model: bool,
    /// Icon export settings
    pub icons: IconConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fallback_language: FALLBACK_LANGUAGE.into(),
            model_file: "cm_model.xml".into(),
            dataset_id: "smart".into(),
            work_dir: None,
            dump_model: false,
            icons: IconConfig::default(),
        }
    }
}

/// Get the XDG config directory for smart2mapeo.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "smart2mapeo").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("smart2mapeo.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(work_dir) = &self.work_dir {
            let expanded = expand_env_vars(work_dir.to_string_lossy().as_ref());
            self.work_dir = Some(PathBuf::from(expanded));
        }
    }

    /// Apply an overlay config onto self; overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            fallback_language: overlay
                .fallback_language
                .clone()
                .unwrap_or_else(|| self.fallback_language.clone()),
            model_file: overlay
                .model_file
                .clone()
                .unwrap_or_else(|| self.model_file.clone()),
            dataset_id: overlay
                .dataset_id
                .clone()
                .unwrap_or_else(|| self.dataset_id.clone()),
            work_dir: overlay.work_dir.clone().or_else(|| self.work_dir.clone()),
            dump_model: overlay.dump_model.unwrap_or(self.dump_model),
            icons: self.icons.merge(&overlay.icons),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist if given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply SMART2MAPEO_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("SMART2MAPEO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("icons.sizes"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("fallback_language") {
            settings.fallback_language = val;
        }
        if let Ok(val) = config.get_string("model_file") {
            settings.model_file = val;
        }
        if let Ok(val) = config.get_string("dataset_id") {
            settings.dataset_id = val;
        }
        if let Ok(val) = config.get_string("work_dir") {
            settings.work_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("dump_model") {
            settings.dump_model = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("icons.sizes") {
            settings.icons.sizes = val;
        }
        if let Ok(val) = config.get_string("icons.extension") {
            settings.icons.extension = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# smart2mapeo configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/smart2mapeo/smart2mapeo.toml
#   File:   --config <file>
#   Env:    SMART2MAPEO_* environment variables (e.g. SMART2MAPEO_ICONS__SIZES=100px,24px)

# Language used when the model does not flag exactly one default language
# fallback_language = "en"

# Model document inside a SMART package
# model_file = "cm_model.xml"

# Dataset id written to metadata.json
# dataset_id = "smart"

# Extract packages here instead of a temporary directory
# work_dir = "~/.cache/smart2mapeo"

# Also write the parsed model as cm_model.json next to the output
# dump_model = false

[icons]
# One copy per size: <icon>-<size>.<extension>
# sizes = ["100px", "24px"]
# extension = "svg"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
