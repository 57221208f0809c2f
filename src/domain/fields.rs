//! Field materialization: one field per attribute key
//!
//! Collected attributes are resolved against the attribute-configuration
//! table in a second step. Keys that need a configuration (LIST, TREE) but
//! have none are skipped and reported in `FieldSet::unresolved`.

use std::fmt;

use tracing::{debug, warn};

use crate::domain::attributes::AttributeIndex;
use crate::domain::entities::{
    AttributeConfigTable, AttributeDecl, AttributeType, Field, FieldKind, SelectOption, TreeItem,
};

/// A selection attribute without a matching configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub key: String,
    pub kind: AttributeType,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.key, self.kind)
    }
}

/// Result of materializing all attribute keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    pub fields: Vec<Field>,
    pub unresolved: Vec<UnresolvedReference>,
}

/// Build one field per unique attribute key, in first-seen order.
///
/// The first declaration of a key supplies label, type and bounds; later
/// declarations are not consulted.
pub fn materialize_fields(attributes: &AttributeIndex, configs: &AttributeConfigTable) -> FieldSet {
    let mut set = FieldSet::default();

    for key in attributes.keys() {
        let Some(attr) = attributes.first(key) else {
            continue;
        };
        let declared = attributes.instances(key).len();
        if declared > 1 {
            debug!("Attribute '{}' declared {} times, using the first", key, declared);
        }

        match materialize_kind(attr, configs) {
            Some(kind) => set.fields.push(Field {
                key: key.to_string(),
                label: attr.name.clone(),
                kind,
            }),
            None => {
                warn!(
                    "Field '{}' references a missing {:?} configuration, skipping",
                    key, attr.kind
                );
                set.unresolved.push(UnresolvedReference {
                    key: key.to_string(),
                    kind: attr.kind.clone(),
                });
            }
        }
    }

    debug!(
        "materialize_fields: {} fields, {} unresolved",
        set.fields.len(),
        set.unresolved.len()
    );
    set
}

/// Type-specific payload, or `None` for an unresolvable selection reference.
fn materialize_kind(attr: &AttributeDecl, configs: &AttributeConfigTable) -> Option<FieldKind> {
    let kind = match &attr.kind {
        AttributeType::Numeric => FieldKind::Number {
            min_value: parse_bound(attr.min_value.as_deref()),
            max_value: parse_bound(attr.max_value.as_deref()),
        },
        AttributeType::Boolean => FieldKind::SelectOne {
            options: vec![
                SelectOption::boolean("Yes", true),
                SelectOption::boolean("No", false),
            ],
        },
        AttributeType::List => {
            let config = configs.get(&attr.key)?;
            FieldKind::SelectOne {
                options: config
                    .list_items
                    .iter()
                    .map(|item| SelectOption::text(&item.name, &item.key_ref))
                    .collect(),
            }
        }
        AttributeType::Tree => {
            let config = configs.get(&attr.key)?;
            FieldKind::SelectOne {
                options: flatten(&config.tree_nodes),
            }
        }
        AttributeType::Text => FieldKind::Text,
        AttributeType::Unknown(raw) => {
            warn!("Attribute '{}' has unknown type '{}', treating as text", attr.key, raw);
            FieldKind::Text
        }
    };
    Some(kind)
}

/// Integer bound, or `None` when absent or unparseable.
///
/// Leading digits are honoured (`"10.5"` → 10), trailing garbage is not.
/// Digits beyond the `i64` range also yield `None`, where a JavaScript
/// `parseInt` would still return an (imprecise) number.
fn parse_bound(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    let sign_len = usize::from(raw.starts_with(['-', '+']));
    let digits_end = raw[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(raw.len(), |i| i + sign_len);
    match raw[..digits_end].parse() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("Ignoring unparseable bound '{}'", raw);
            None
        }
    }
}

/// Flatten a selection tree into its leaves, in pre-order.
///
/// Nodes with children are authoring structure only and never become options.
pub fn flatten(nodes: &[TreeItem]) -> Vec<SelectOption> {
    nodes.iter().fold(Vec::new(), flatten_into)
}

fn flatten_into(mut options: Vec<SelectOption>, node: &TreeItem) -> Vec<SelectOption> {
    match &node.children {
        Some(children) if !children.is_empty() => children.iter().fold(options, flatten_into),
        _ => {
            options.push(SelectOption::text(&node.name, &node.key_ref));
            options
        }
    }
}
