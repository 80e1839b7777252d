//! # Owned XML Tree
//!
//! A minimal owned-tree XML representation tailored to resource dictionary
//! merging. Parsing is built on `quick-xml` events; serialization is done by
//! hand with stable two-space indentation.
//!
//! Two representation choices matter for the merge:
//!
//! - Qualified names are kept as literal `prefix:local` strings. Namespace
//!   reconciliation rewrites prefixes textually (in names and inside markup
//!   extension values), so the prefix spelling must survive the parse.
//! - Whitespace-only text is dropped during parsing and regenerated by the
//!   serializer. Combining the tool's own output therefore reproduces it
//!   byte for byte.
//!
//! Each node owns its children exclusively; parsed documents contain no
//! back-references or cycles, so plain recursion suffices everywhere.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// A single attribute with its literal qualified name and unescaped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    /// The namespace prefix portion of the attribute name, if any.
    pub fn prefix(&self) -> Option<&str> {
        split_qualified(&self.name).0
    }

    /// The attribute name without its prefix.
    pub fn local_name(&self) -> &str {
        split_qualified(&self.name).1
    }
}

/// A child node of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An element with its attributes (in document order) and owned children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The namespace prefix portion of the element name, if any.
    pub fn prefix(&self) -> Option<&str> {
        split_qualified(&self.name).0
    }

    /// The element name without its prefix.
    pub fn local_name(&self) -> &str {
        split_qualified(&self.name).1
    }

    /// Look up an attribute value by its exact qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    /// Whether an attribute with the exact qualified name is present.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Append an attribute, preserving document order.
    pub fn push_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Iterate the element children, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Mutable variant of [`Element::child_elements`].
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }
}

/// Split a qualified name into its optional prefix and local part.
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Errors produced while parsing a source document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error("invalid attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid UTF-8 in a name")]
    InvalidName,

    #[error("closing tag without a matching opening tag")]
    UnbalancedTags,

    #[error("document contains no root element")]
    NoRootElement,

    #[error("document contains more than one root element")]
    MultipleRoots,
}

/// Parse a well-formed XML document into its root element.
///
/// The XML declaration, processing instructions and the doctype are
/// discarded. Whitespace-only text is dropped; other text and CDATA become
/// [`Node::Text`], comments become [`Node::Comment`].
pub fn parse_document(text: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.trim_text_start = true;
    config.trim_text_end = true;

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(ParseError::UnbalancedTags)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let value = text.unescape()?;
                if !value.is_empty() {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(value.into_owned()));
                    }
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Text(String::from_utf8_lossy(&data).into_owned()));
                }
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    root.ok_or(ParseError::NoRootElement)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, ParseError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|_| ParseError::InvalidName)?
        .to_string();
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute?;
        let name = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|_| ParseError::InvalidName)?
            .to_string();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push(Attribute { name, value });
    }
    Ok(element)
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    } else if root.is_some() {
        return Err(ParseError::MultipleRoots);
    } else {
        *root = Some(element);
    }
    Ok(())
}

/// Serialize a document to indented XML, ending with a trailing newline.
///
/// Attributes stay on the element line; empty elements self-close; elements
/// with only text children keep the text inline so value-typed resources
/// like `<sys:Double x:Key="Height">22</sys:Double>` stay on one line.
pub fn serialize_document(root: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, root, 0);
    out.push('\n');
    out
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.name);
    for attribute in &element.attributes {
        out.push(' ');
        out.push_str(&attribute.name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&attribute.value));
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str(" />");
        return;
    }
    out.push('>');

    let text_only = element
        .children
        .iter()
        .all(|child| matches!(child, Node::Text(_)));
    if text_only {
        for child in &element.children {
            if let Node::Text(text) = child {
                out.push_str(&escape_text(text));
            }
        }
    } else {
        for child in &element.children {
            out.push('\n');
            match child {
                Node::Element(child) => write_element(out, child, depth + 1),
                Node::Text(text) => {
                    out.push_str(&"  ".repeat(depth + 1));
                    out.push_str(&escape_text(text));
                }
                Node::Comment(comment) => {
                    out.push_str(&"  ".repeat(depth + 1));
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
            }
        }
        out.push('\n');
        out.push_str(&indent);
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_element_tree() {
        let root = parse_document(
            r#"<Root a="1" b="2">
                 <Child />
                 <Other><Inner /></Other>
               </Root>"#,
        )
        .unwrap();
        assert_eq!(root.name, "Root");
        assert_eq!(root.attributes.len(), 2);
        assert_eq!(root.attr("a"), Some("1"));
        assert_eq!(root.attr("b"), Some("2"));
        assert_eq!(root.child_elements().count(), 2);
        let other = root.child_elements().nth(1).unwrap();
        assert_eq!(other.child_elements().next().unwrap().name, "Inner");
    }

    #[test]
    fn test_parse_preserves_attribute_order() {
        let root = parse_document(r#"<R z="1" a="2" m="3" />"#).unwrap();
        let names: Vec<&str> = root
            .attributes
            .iter()
            .map(|attribute| attribute.name.as_str())
            .collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_keeps_literal_prefixes() {
        let root = parse_document(
            r#"<ns:Root xmlns:ns="http://example.com"><ns:Child ns:attr="v" /></ns:Root>"#,
        )
        .unwrap();
        assert_eq!(root.prefix(), Some("ns"));
        assert_eq!(root.local_name(), "Root");
        let child = root.child_elements().next().unwrap();
        assert_eq!(child.name, "ns:Child");
        assert_eq!(child.attributes[0].prefix(), Some("ns"));
        assert_eq!(child.attributes[0].local_name(), "attr");
    }

    #[test]
    fn test_parse_unescapes_values_and_text() {
        let root = parse_document(r#"<R a="x &amp; y">1 &lt; 2</R>"#).unwrap();
        assert_eq!(root.attr("a"), Some("x & y"));
        assert_eq!(root.children, vec![Node::Text("1 < 2".to_string())]);
    }

    #[test]
    fn test_parse_drops_whitespace_only_text() {
        let root = parse_document("<R>\n  <A />\n  <B />\n</R>").unwrap();
        assert_eq!(root.children.len(), 2);
        assert!(root
            .children
            .iter()
            .all(|child| matches!(child, Node::Element(_))));
    }

    #[test]
    fn test_parse_keeps_comments() {
        let root = parse_document("<R><!-- note --><A /></R>").unwrap();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0], Node::Comment(" note ".to_string()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_document("<R><unclosed></R>").is_err());
        assert!(matches!(parse_document(""), Err(ParseError::NoRootElement)));
        assert!(matches!(
            parse_document("<A /><B />"),
            Err(ParseError::MultipleRoots)
        ));
    }

    #[test]
    fn test_serialize_self_closing_and_indentation() {
        let mut root = Element::new("Root");
        root.push_attr("xmlns:x", "http://example.com/x");
        let mut child = Element::new("Child");
        child.push_attr("x:Key", "K1");
        root.children.push(Node::Element(child));
        root.children.push(Node::Element(Element::new("Empty")));

        let serialized = serialize_document(&root);
        assert_eq!(
            serialized,
            "<Root xmlns:x=\"http://example.com/x\">\n  <Child x:Key=\"K1\" />\n  <Empty />\n</Root>\n"
        );
    }

    #[test]
    fn test_serialize_inline_text_child() {
        let mut height = Element::new("sys:Double");
        height.push_attr("x:Key", "Height");
        height.children.push(Node::Text("22".to_string()));
        let mut root = Element::new("Root");
        root.children.push(Node::Element(height));

        let serialized = serialize_document(&root);
        assert!(serialized.contains("<sys:Double x:Key=\"Height\">22</sys:Double>"));
    }

    #[test]
    fn test_serialize_escapes_attribute_values() {
        let mut root = Element::new("R");
        root.push_attr("a", "x < \"y\" & z");
        let serialized = serialize_document(&root);
        assert_eq!(serialized, "<R a=\"x &lt; &quot;y&quot; &amp; z\" />\n");
    }

    #[test]
    fn test_serialize_parse_round_trip_is_stable() {
        let root = parse_document(
            r#"<Root xmlns="http://example.com" xmlns:x="http://example.com/x">
                 <!-- palette -->
                 <Color x:Key="Accent">#FF0000</Color>
                 <Style x:Key="Base" TargetType="{x:Type Button}">
                   <Setter Property="Height" Value="22" />
                 </Style>
               </Root>"#,
        )
        .unwrap();
        let first = serialize_document(&root);
        let reparsed = parse_document(&first).unwrap();
        let second = serialize_document(&reparsed);
        assert_eq!(first, second);
    }
}
