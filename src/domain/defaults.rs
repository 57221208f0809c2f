//! Geometry defaults index (`defaults.json`)

use serde::Serialize;

use crate::domain::entities::{Geometry, Preset};

/// Generic entry the presets consumer expects at the head of the point list.
pub const DEFAULT_POINT_ENTRY: &str = "point";

/// Geometry category → ordered preset ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultsIndex {
    pub area: Vec<String>,
    pub line: Vec<String>,
    pub point: Vec<String>,
    pub vertex: Vec<String>,
    pub relation: Vec<String>,
}

impl Default for DefaultsIndex {
    fn default() -> Self {
        Self {
            area: vec![],
            line: vec![],
            point: vec![DEFAULT_POINT_ENTRY.to_string()],
            vertex: vec![],
            relation: vec![],
        }
    }
}

impl DefaultsIndex {
    /// Build the index from presets in extraction order.
    ///
    /// Presets without an id (no category keys at all) cannot be referenced
    /// and are left out.
    pub fn from_presets(presets: &[Preset]) -> Self {
        let mut index = Self::default();
        for preset in presets {
            let Some(id) = preset.id() else {
                continue;
            };
            for geometry in &preset.geometry {
                index.entries_mut(*geometry).push(id.clone());
            }
        }
        index
    }

    fn entries_mut(&mut self, geometry: Geometry) -> &mut Vec<String> {
        match geometry {
            Geometry::Area => &mut self.area,
            Geometry::Line => &mut self.line,
            Geometry::Point => &mut self.point,
            Geometry::Vertex => &mut self.vertex,
            Geometry::Relation => &mut self.relation,
        }
    }
}
