//! Tree rendering of the category hierarchy (similar to `npm ls` output)

use termtree::Tree;

use crate::domain::entities::{CategoryNode, ConfigurableModel};

pub trait CategoryTreeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl CategoryTreeConvert for CategoryNode {
    fn to_tree_string(&self) -> Tree<String> {
        let mut label = match &self.category_key {
            Some(key) => format!("{} [{}]", self.name, key),
            None => self.name.clone(),
        };
        if !self.attributes.is_empty() {
            label.push_str(" - has attributes");
        }

        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(label).with_leaves(leaves)
    }
}

/// Whole model as a single tree under a descriptive root label.
pub fn model_tree(model: &ConfigurableModel) -> Tree<String> {
    let root = format!("Configurable Model ({})", model.language);
    Tree::new(root).with_leaves(model.nodes.iter().map(|n| n.to_tree_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AttributeDecl, AttributeType};

    #[test]
    fn given_nested_nodes_when_rendering_then_labels_mark_keys_and_attributes() {
        let model = ConfigurableModel {
            language: "en".into(),
            nodes: vec![CategoryNode {
                name: "Animals".into(),
                children: vec![CategoryNode {
                    name: "Deer".into(),
                    category_key: Some("deer".into()),
                    attributes: vec![AttributeDecl {
                        key: "count".into(),
                        name: "Count".into(),
                        kind: AttributeType::Numeric,
                        min_value: None,
                        max_value: None,
                    }],
                    ..CategoryNode::default()
                }],
                ..CategoryNode::default()
            }],
            ..ConfigurableModel::default()
        };

        let rendered = model_tree(&model).to_string();

        assert!(rendered.starts_with("Configurable Model (en)"));
        assert!(rendered.contains("Animals\n"));
        assert!(rendered.contains("Deer [deer] - has attributes"));
    }
}
