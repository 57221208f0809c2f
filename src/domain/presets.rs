//! Preset extraction from the category tree

use std::path::Path;

use tracing::debug;

use crate::domain::entities::{CategoryNode, Geometry, Preset, PresetTags};

/// Every preset is a point: the model carries no geometry information.
pub const PRESET_GEOMETRY: Geometry = Geometry::Point;

/// Extract one preset per classification node, in depth-first pre-order.
///
/// Recursion is unconditional: children of grouping nodes and of
/// classification nodes are both visited. Presets sharing a category key are
/// kept as they are.
pub fn extract_presets(roots: &[CategoryNode]) -> Vec<Preset> {
    let presets = roots.iter().fold(Vec::new(), extract_into);
    debug!("extract_presets: {} presets", presets.len());
    presets
}

fn extract_into(mut presets: Vec<Preset>, node: &CategoryNode) -> Vec<Preset> {
    if node.is_classification() {
        presets.push(preset_from_node(node));
    } else {
        debug!("Grouping node '{}' exports only its children", node.name);
    }
    node.children.iter().fold(presets, extract_into)
}

fn preset_from_node(node: &CategoryNode) -> Preset {
    Preset {
        name: node.name.clone(),
        icon: node.image_file.as_deref().and_then(icon_name),
        geometry: vec![PRESET_GEOMETRY],
        tags: PresetTags {
            id: node.id.clone(),
            dm_uuid: node.dm_uuid.clone(),
            config_id: node.config_id.clone(),
            category_key: node.category_key.clone(),
            category_hkey: node.category_hkey.clone(),
        },
        terms: Vec::new(),
        fields: node.attributes.iter().map(|a| a.key.clone()).collect(),
        image_file: node.image_file.clone(),
    }
}

/// Icon name from an image path: directory and extension removed.
pub fn icon_name(image_file: &str) -> Option<String> {
    let normalized = image_file.replace('\\', "/");
    Path::new(&normalized)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

/// Normalize a hierarchical category key into a preset id.
///
/// Lowercase, periods become dashes, one trailing dash removed:
/// `Animals.Mammals.` → `animals-mammals`.
pub fn preset_id_from_hkey(hkey: &str) -> String {
    let id = hkey.to_lowercase().replace('.', "-");
    match id.strip_suffix('-') {
        Some(trimmed) => trimmed.to_string(),
        None => id,
    }
}

impl Preset {
    /// File-system id of this preset, from the hierarchical key or, failing
    /// that, the plain category key.
    pub fn id(&self) -> Option<String> {
        self.tags
            .category_hkey
            .as_deref()
            .or(self.tags.category_key.as_deref())
            .map(preset_id_from_hkey)
    }
}
