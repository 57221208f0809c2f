//! XML reader producing the generic element tree
//!
//! Namespace prefixes are dropped (`cm:node` → `node`) and `xmlns`
//! declarations are not kept as attributes.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use tracing::trace;

use crate::domain::XmlElement;
use crate::infrastructure::traits::DocumentParser;

/// `DocumentParser` backed by quick-xml.
#[derive(Debug, Default)]
pub struct QuickXmlParser;

impl DocumentParser for QuickXmlParser {
    fn parse(&self, content: &str) -> Result<XmlElement, String> {
        parse_document(content)
    }
}

/// Parse an XML document into its root element.
pub fn parse_document(content: &str) -> Result<XmlElement, String> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("{} at position {}", e, reader.error_position()))?;
        match event {
            XmlEvent::Start(e) => stack.push(element_from(&e)?),
            XmlEvent::Empty(e) => {
                let element = element_from(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            XmlEvent::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| "unbalanced closing tag".to_string())?;
                attach(&mut stack, &mut root, element)?;
            }
            XmlEvent::Text(t) => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                append_text(&mut stack, &text);
            }
            XmlEvent::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                append_text(&mut stack, &text);
            }
            XmlEvent::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => (),
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.name));
    }
    let root = root.ok_or_else(|| "document has no root element".to_string())?;
    trace!("parse_document: root <{}>", root.name);
    Ok(root)
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement, String> {
    let mut element = XmlElement::new(utf8(start.local_name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        element
            .attributes
            .insert(utf8(attr.key.local_name().as_ref()).into_owned(), value.into_owned());
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(format!("unexpected second root element <{}>", element.name)),
    }
}

fn append_text(stack: &mut [XmlElement], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(current) = stack.last_mut() {
        current
            .text
            .get_or_insert_with(String::new)
            .push_str(text);
    }
}

fn utf8(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}
