//! Attribute collection across the category tree

use std::collections::HashMap;

use crate::domain::entities::{AttributeDecl, CategoryNode};

/// Every attribute declaration found in the tree, grouped by key.
///
/// Keys keep first-seen order; each key keeps all of its declarations in
/// traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeIndex {
    order: Vec<String>,
    instances: HashMap<String, Vec<AttributeDecl>>,
}

impl AttributeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, decl: AttributeDecl) {
        match self.instances.get_mut(&decl.key) {
            Some(existing) => existing.push(decl),
            None => {
                self.order.push(decl.key.clone());
                self.instances.insert(decl.key.clone(), vec![decl]);
            }
        }
    }

    /// Attribute keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// All declarations of `key`, in traversal order.
    pub fn instances(&self, key: &str) -> &[AttributeDecl] {
        self.instances.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First declaration of `key`; the one trusted for label and type.
    pub fn first(&self, key: &str) -> Option<&AttributeDecl> {
        self.instances(key).first()
    }
}

/// Walk every node depth-first and gather its attribute declarations.
pub fn collect_attributes(roots: &[CategoryNode]) -> AttributeIndex {
    roots.iter().fold(AttributeIndex::new(), collect_into)
}

fn collect_into(mut index: AttributeIndex, node: &CategoryNode) -> AttributeIndex {
    for decl in &node.attributes {
        index.push(decl.clone());
    }
    node.children.iter().fold(index, collect_into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AttributeType;

    fn decl(key: &str, name: &str, kind: AttributeType) -> AttributeDecl {
        AttributeDecl {
            key: key.to_string(),
            name: name.to_string(),
            kind,
            min_value: None,
            max_value: None,
        }
    }

    fn node(attributes: Vec<AttributeDecl>, children: Vec<CategoryNode>) -> CategoryNode {
        CategoryNode {
            attributes,
            children,
            ..CategoryNode::default()
        }
    }

    #[test]
    fn given_shared_key_on_two_nodes_when_collecting_then_every_declaration_is_kept() {
        let tree = vec![
            node(
                vec![decl("k", "Parent", AttributeType::Numeric)],
                vec![node(vec![decl("other", "Other", AttributeType::Text)], vec![])],
            ),
            node(vec![decl("k", "Sibling", AttributeType::Text)], vec![]),
        ];

        let index = collect_attributes(&tree);

        let names: Vec<_> = index.instances("k").iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Parent", "Sibling"]);
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["k", "other"]);
        assert_eq!(index.first("k").map(|d| &d.kind), Some(&AttributeType::Numeric));
    }

    #[test]
    fn given_unknown_key_when_looking_up_then_nothing_found() {
        let index = collect_attributes(&[node(vec![], vec![])]);

        assert!(index.instances("missing").is_empty());
        assert!(index.first("missing").is_none());
        assert_eq!(index.keys().count(), 0);
    }
}
