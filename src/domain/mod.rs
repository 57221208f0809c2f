//! Domain layer: entities and the model-to-artifact engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod attributes;
pub mod defaults;
pub mod display;
pub mod document;
pub mod entities;
pub mod error;
pub mod fields;
pub mod language;
pub mod model;
pub mod presets;

pub use attributes::{collect_attributes, AttributeIndex};
pub use defaults::DefaultsIndex;
pub use display::{model_tree, CategoryTreeConvert};
pub use document::XmlElement;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use fields::{flatten, materialize_fields, FieldSet, UnresolvedReference};
pub use language::{resolve_language, FALLBACK_LANGUAGE};
pub use presets::{extract_presets, icon_name, preset_id_from_hkey};

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~` for the home directory.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
