//! Domain entities: core data structures
//!
//! Source-side types (`CategoryNode`, `AttributeDecl`, `AttributeConfig`, ...)
//! describe the Configurable Model. Output-side types (`Preset`, `Field`,
//! `SelectOption`) serialize directly into the JSON artifacts.

use std::collections::HashMap;

use serde::Serialize;

/// A locale declared by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub code: String,
    pub is_default: bool,
}

/// One node of the classification tree.
///
/// A node carrying a `category_key` is a leaf classification and becomes a
/// preset; a node without one only groups its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryNode {
    pub id: Option<String>,
    pub config_id: Option<String>,
    pub dm_uuid: Option<String>,
    pub category_key: Option<String>,
    pub category_hkey: Option<String>,
    /// Display name in the resolved language
    pub name: String,
    pub image_file: Option<String>,
    pub attributes: Vec<AttributeDecl>,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn is_classification(&self) -> bool {
        self.category_key.is_some()
    }
}

/// Declared attribute type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeType {
    Numeric,
    Text,
    Boolean,
    List,
    Tree,
    /// Anything else; materialized like `Text` but kept distinct for reporting
    Unknown(String),
}

impl AttributeType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "NUMERIC" => Self::Numeric,
            "TEXT" => Self::Text,
            "BOOLEAN" => Self::Boolean,
            "LIST" => Self::List,
            "TREE" => Self::Tree,
            _ => Self::Unknown(raw.to_string()),
        }
    }
}

/// An attribute declared on a category node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDecl {
    pub key: String,
    /// Display label in the resolved language
    pub name: String,
    pub kind: AttributeType,
    /// Raw bound strings, parsed only when the field is materialized
    pub min_value: Option<String>,
    pub max_value: Option<String>,
}

/// Flat selection entry of a LIST attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub name: String,
    pub key_ref: String,
}

/// Nested selection entry of a TREE attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub name: String,
    pub key_ref: String,
    /// `None` when the source had no children; `Some(vec![])` when it had an empty set
    pub children: Option<Vec<TreeItem>>,
}

impl TreeItem {
    pub fn leaf(name: &str, key_ref: &str) -> Self {
        Self {
            name: name.to_string(),
            key_ref: key_ref.to_string(),
            children: None,
        }
    }

    pub fn branch(name: &str, key_ref: &str, children: Vec<TreeItem>) -> Self {
        Self {
            name: name.to_string(),
            key_ref: key_ref.to_string(),
            children: Some(children),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.as_ref().map_or(true, Vec::is_empty)
    }
}

/// Full description of a selection-type attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeConfig {
    pub key: String,
    pub list_items: Vec<ListItem>,
    pub tree_nodes: Vec<TreeItem>,
}

/// Attribute configurations keyed by attribute key.
pub type AttributeConfigTable = HashMap<String, AttributeConfig>;

/// Typed projection of a whole Configurable Model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurableModel {
    /// Resolved default language code
    pub language: String,
    pub locales: Vec<Locale>,
    pub nodes: Vec<CategoryNode>,
    pub attribute_configs: AttributeConfigTable,
}

// ============================================================
// OUTPUT ARTIFACTS
// ============================================================

/// Geometry categories understood by the presets consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    Area,
    Line,
    Point,
    Vertex,
    Relation,
}

/// Identity tags mapping a preset back to its source node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresetTags {
    #[serde(rename = "smart:id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "smart:dmuuid", skip_serializing_if = "Option::is_none")]
    pub dm_uuid: Option<String>,
    #[serde(rename = "smart:configid", skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
    #[serde(rename = "smart:categorykey", skip_serializing_if = "Option::is_none")]
    pub category_key: Option<String>,
    #[serde(rename = "smart:categoryhkey", skip_serializing_if = "Option::is_none")]
    pub category_hkey: Option<String>,
}

/// A classification entry derived from one category node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub geometry: Vec<Geometry>,
    pub tags: PresetTags,
    pub terms: Vec<String>,
    pub fields: Vec<String>,
    /// Source image path inside the package, used when copying icons
    #[serde(skip)]
    pub image_file: Option<String>,
}

/// Value of a selectable option: booleans stay booleans in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: OptionValue,
}

impl SelectOption {
    pub fn text(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: OptionValue::Text(value.to_string()),
        }
    }

    pub fn boolean(label: &str, value: bool) -> Self {
        Self {
            label: label.to_string(),
            value: OptionValue::Bool(value),
        }
    }
}

/// Type-specific payload of a field, serialized under the `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min_value: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_value: Option<i64>,
    },
    SelectOne {
        options: Vec<SelectOption>,
    },
    Text,
}

/// Input definition for one attribute key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl Field {
    pub fn options(&self) -> &[SelectOption] {
        match &self.kind {
            FieldKind::SelectOne { options } => options,
            _ => &[],
        }
    }
}
