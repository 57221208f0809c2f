//! Projection of the raw element tree into a typed `ConfigurableModel`
//!
//! Only what extraction needs is checked. A missing `nodes` container, or a
//! node/attribute without a name, makes the whole document unusable.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::document::XmlElement;
use crate::domain::entities::{
    AttributeConfig, AttributeConfigTable, AttributeDecl, AttributeType, CategoryNode,
    ConfigurableModel, ListItem, Locale, TreeItem,
};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::language::resolve_language;

pub const ROOT_ELEMENT: &str = "ConfigurableModel";

impl ConfigurableModel {
    /// Build the typed model from a parsed document.
    ///
    /// The default language is resolved first so that every display name can
    /// be picked in that language.
    pub fn from_document(doc: &XmlElement, fallback_language: &str) -> DomainResult<Self> {
        if doc.name != ROOT_ELEMENT {
            return Err(DomainError::UnexpectedRoot(doc.name.clone()));
        }

        let locales = read_locales(doc);
        let language = resolve_language(&locales, fallback_language);

        let container = doc
            .child("nodes")
            .ok_or_else(|| DomainError::missing_element("nodes", ROOT_ELEMENT))?;
        let nodes = container
            .children_named("node")
            .map(|el| read_node(el, &language))
            .collect::<DomainResult<Vec<_>>>()?;

        let attribute_configs = read_attribute_configs(doc, &language)?;
        debug!(
            "from_document: {} top-level nodes, {} attribute configs",
            nodes.len(),
            attribute_configs.len()
        );

        Ok(Self {
            language,
            locales,
            nodes,
            attribute_configs,
        })
    }
}

/// Collect every `<language>` below every `<languages>` container.
pub fn read_locales(doc: &XmlElement) -> Vec<Locale> {
    doc.children_named("languages")
        .flat_map(|langs| langs.children_named("language"))
        .filter_map(|el| {
            let code = el.non_empty_attr("code")?;
            Some(Locale {
                code: code.to_string(),
                is_default: el
                    .attr("is_default")
                    .is_some_and(|v| v.eq_ignore_ascii_case("true")),
            })
        })
        .collect()
}

/// Pick the `<name>` in `language`, otherwise the first one.
fn localized_name(el: &XmlElement, language: &str) -> Option<String> {
    let mut names = el.children_named("name").peekable();
    let first = *names.peek()?;
    let chosen = names
        .find(|n| n.attr("language_code") == Some(language))
        .unwrap_or(first);
    chosen
        .attr("value")
        .map(str::to_string)
        .or_else(|| chosen.text.clone())
}

fn describe_node(el: &XmlElement) -> String {
    let id = el
        .non_empty_attr("categoryHkey")
        .or_else(|| el.non_empty_attr("id"))
        .unwrap_or("?");
    format!("node '{}'", id)
}

fn read_node(el: &XmlElement, language: &str) -> DomainResult<CategoryNode> {
    let context = describe_node(el);
    let name = localized_name(el, language)
        .ok_or_else(|| DomainError::missing_element("name", context.clone()))?;

    let attributes = el
        .children_named("attribute")
        .map(|attr| read_attribute(attr, language, &context))
        .collect::<DomainResult<Vec<_>>>()?;

    let children = el
        .children_named("node")
        .map(|child| read_node(child, language))
        .collect::<DomainResult<Vec<_>>>()?;

    let owned = |key: &str| el.non_empty_attr(key).map(str::to_string);
    Ok(CategoryNode {
        id: owned("id"),
        config_id: owned("configId"),
        dm_uuid: owned("dmUuid"),
        category_key: owned("categoryKey"),
        category_hkey: owned("categoryHkey"),
        name,
        image_file: owned("imageFile"),
        attributes,
        children,
    })
}

fn read_attribute(el: &XmlElement, language: &str, context: &str) -> DomainResult<AttributeDecl> {
    let key = el
        .non_empty_attr("attributeKey")
        .ok_or_else(|| DomainError::missing_attribute("attribute", "attributeKey", context))?;
    let name = localized_name(el, language).ok_or_else(|| {
        DomainError::missing_element("name", format!("attribute '{}' of {}", key, context))
    })?;

    Ok(AttributeDecl {
        key: key.to_string(),
        name,
        kind: AttributeType::parse(el.attr("type").unwrap_or_default()),
        min_value: el.non_empty_attr("minValue").map(str::to_string),
        max_value: el.non_empty_attr("maxValue").map(str::to_string),
    })
}

/// Read the top-level attribute configuration table.
///
/// A key configured twice keeps the last declaration.
fn read_attribute_configs(doc: &XmlElement, language: &str) -> DomainResult<AttributeConfigTable> {
    let mut table = HashMap::new();
    for el in doc.children_named("attributeConfig") {
        let key = el.non_empty_attr("attributeKey").ok_or_else(|| {
            DomainError::missing_attribute("attributeConfig", "attributeKey", ROOT_ELEMENT)
        })?;

        let list_items = el
            .children_named("listItem")
            .map(|item| {
                let (name, key_ref) = read_selectable(item, language, key);
                ListItem { name, key_ref }
            })
            .collect();
        let tree_nodes = el
            .children_named("treeNode")
            .map(|node| read_tree_item(node, language, key))
            .collect();

        let config = AttributeConfig {
            key: key.to_string(),
            list_items,
            tree_nodes,
        };
        if table.insert(key.to_string(), config).is_some() {
            warn!("Attribute config '{}' declared more than once, keeping the last", key);
        }
    }
    Ok(table)
}

fn read_tree_item(el: &XmlElement, language: &str, attribute_key: &str) -> TreeItem {
    let (name, key_ref) = read_selectable(el, language, attribute_key);
    let children = el.has_child("treeNode").then(|| {
        el.children_named("treeNode")
            .map(|child| read_tree_item(child, language, attribute_key))
            .collect()
    });
    TreeItem {
        name,
        key_ref,
        children,
    }
}

/// Display name and reference key of a list item or tree node.
///
/// Selection entries are advisory data: a missing name falls back to the
/// reference key rather than failing the document.
fn read_selectable(el: &XmlElement, language: &str, attribute_key: &str) -> (String, String) {
    let key_ref = el.attr("keyRef").unwrap_or_default().to_string();
    if key_ref.is_empty() {
        warn!("Option of attribute '{}' has no keyRef", attribute_key);
    }
    let name = localized_name(el, language).unwrap_or_else(|| {
        warn!(
            "Option '{}' of attribute '{}' has no name, using its key",
            key_ref, attribute_key
        );
        key_ref.clone()
    });
    (name, key_ref)
}
