//! Generic element tree produced by the XML reader.
//!
//! This is the "raw tree": a lossless-enough view of the source document that
//! the engine projects into typed entities and that can be dumped as JSON for
//! inspection.

use std::collections::BTreeMap;

use serde::Serialize;

/// One XML element with its attributes, child elements and text content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XmlElement {
    /// Local element name (namespace prefix removed)
    pub name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<XmlElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter, mostly for tests and fixtures.
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Attribute value, treating an empty string as absent.
    pub fn non_empty_attr(&self, key: &str) -> Option<&str> {
        self.attr(key).filter(|v| !v.is_empty())
    }

    /// Direct children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_borrowed_name_when_child_then_result_outlives_the_name() {
        let root = XmlElement::new("root")
            .with_child(XmlElement::new("a").with_attr("n", "1"))
            .with_child(XmlElement::new("a").with_attr("n", "2"));

        let found = {
            let name = String::from("a");
            root.child(&name)
        };

        assert_eq!(found.and_then(|el| el.attr("n")), Some("1"));
        assert_eq!(root.children_named("a").count(), 2);
        assert!(!root.has_child("b"));
    }
}
