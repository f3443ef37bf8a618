//! Owned XML element tree.
//!
//! HL7 v3 documents live in a single default namespace, so elements are kept
//! by local name. The only foreign attributes the mappers care about are
//! `xsi:type`, stored under that prefixed name.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::common::{HL7_NS, XSI_NS};
use crate::error::Result;

/// A node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set an attribute, replacing any previous value.
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(name, _)| name == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn maybe_child(mut self, child: Option<Element>) -> Self {
        if let Some(child) = child {
            self.push(child);
        }
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn extend(&mut self, children: impl IntoIterator<Item = Element>) {
        self.children.extend(children.into_iter().map(Node::Element));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text content, `None` when empty.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect();
        (!text.is_empty()).then_some(text)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |element| element.name == name)
    }

    pub fn first(&self, name: &str) -> Option<&Element> {
        self.all(name).next()
    }

    pub fn first_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    /// Follow a slash-separated path of first matches.
    pub fn find(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .try_fold(self, |element, name| element.first(name))
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut Element> {
        path.split('/')
            .try_fold(self, |element, name| element.first_mut(name))
    }

    /// Remove and return every child element with the given name.
    pub fn take_all(&mut self, name: &str) -> Vec<Element> {
        let (taken, kept): (Vec<Node>, Vec<Node>) = std::mem::take(&mut self.children)
            .into_iter()
            .partition(|node| matches!(node, Node::Element(element) if element.name == name));
        self.children = kept;
        taken
            .into_iter()
            .filter_map(|node| match node {
                Node::Element(element) => Some(element),
                Node::Text(_) => None,
            })
            .collect()
    }

    /// Whether the element carries anything beyond its name.
    pub fn has_content(&self) -> bool {
        !self.attributes.is_empty() || !self.children.is_empty()
    }
}

/// Parse a document into its root element.
pub fn parse(xml: &str) -> Result<Element> {
    let document = roxmltree::Document::parse(xml)?;
    Ok(convert(document.root_element()))
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());
    for attribute in node.attributes() {
        let name = match attribute.namespace() {
            Some(XSI_NS) => format!("xsi:{}", attribute.name()),
            _ => attribute.name().to_string(),
        };
        element.attributes.push((name, attribute.value().to_string()));
    }
    for child in node.children() {
        if child.is_element() {
            element.push(convert(child));
        } else if child.is_text()
            && let Some(text) = child.text()
            && !text.trim().is_empty()
        {
            element.children.push(Node::Text(text.to_string()));
        }
    }
    element
}

/// Serialize a root element as a UTF-8 document with an XML declaration.
///
/// `indent` of zero writes everything on one line.
pub fn write(root: &Element, indent: usize) -> Result<String> {
    let mut writer = if indent == 0 {
        Writer::new(Cursor::new(Vec::new()))
    } else {
        Writer::new_with_indent(Cursor::new(Vec::new()), b' ', indent)
    };
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root, true)?;
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, element: &Element, root: bool) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    if root {
        start.push_attribute(("xmlns", HL7_NS));
        start.push_attribute(("xmlns:xsi", XSI_NS));
    }
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(writer, child, false)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_xsi_type() {
        let root = parse(&format!(
            r#"<a xmlns="{HL7_NS}" xmlns:xsi="{XSI_NS}"><value xsi:type="BL" value="true"/>
                 <text>hello</text></a>"#
        ))
        .unwrap();
        let value = root.first("value").unwrap();
        assert_eq!(value.get("xsi:type"), Some("BL"));
        assert_eq!(value.get("value"), Some("true"));
        assert_eq!(root.find("text").and_then(Element::text).as_deref(), Some("hello"));
    }

    #[test]
    fn test_write_round_trips() {
        let root = Element::new("root")
            .child(Element::new("id").attr("extension", "a&b"))
            .child(Element::new("text").with_text("x < y"));
        let xml = write(&root, 2).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(parse(&xml).unwrap(), root);
    }

    #[test]
    fn test_take_all() {
        let mut root = Element::new("root")
            .child(Element::new("a"))
            .child(Element::new("b"))
            .child(Element::new("a"));
        let taken = root.take_all("a");
        assert_eq!(taken.len(), 2);
        assert_eq!(root.elements().count(), 1);
    }

    #[test]
    fn test_find_path() {
        let root = Element::new("a").child(Element::new("b").child(Element::new("c").attr("k", "v")));
        assert_eq!(root.find("b/c").and_then(|c| c.get("k")), Some("v"));
        assert!(root.find("b/d").is_none());
    }
}
