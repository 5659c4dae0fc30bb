//! XML content types for tree nodes.
//!
//! This module provides `XmlContent`, the payload of a node: the document
//! marker, an element (tag with attributes), text, a comment or a
//! processing instruction.

use rustc_hash::FxHashMap;

use crate::engine::NodeType;
use crate::variant::Variant;

/// Represents the content of an XML node.
#[derive(Debug, Clone)]
pub enum XmlContent {
    /// The document node.
    Document,
    /// An XML element with a qualified name and attributes.
    Element(XmlElement),
    /// XML text content.
    Text(XmlText),
    /// XML comment.
    Comment(XmlComment),
    /// XML processing instruction.
    ProcessingInstruction(XmlProcessingInstruction),
}

impl XmlContent {
    /// Returns the node type for this content.
    pub fn node_type(&self) -> NodeType {
        match self {
            XmlContent::Document => NodeType::Document,
            XmlContent::Element(_) => NodeType::Element,
            XmlContent::Text(_) => NodeType::Text,
            XmlContent::Comment(_) => NodeType::Comment,
            XmlContent::ProcessingInstruction(_) => NodeType::ProcessingInstruction,
        }
    }

    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, XmlContent::Element(_))
    }

    /// Returns a reference to the element, if this is an element node.
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a mutable reference to the element, if this is an element node.
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlContent::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// An XML element with a qualified name and attributes.
#[derive(Debug, Clone)]
pub struct XmlElement {
    /// The qualified name of the element (e.g., "div", "ns:element").
    name: String,
    /// Attribute values keyed by qualified attribute name.
    attributes: FxHashMap<String, Variant>,
}

impl XmlElement {
    /// Creates an element without attributes.
    pub fn new(name: String) -> Self {
        Self::with_attributes(name, FxHashMap::default())
    }

    /// Creates an element with the given attributes.
    pub fn with_attributes(name: String, attributes: FxHashMap<String, Variant>) -> Self {
        XmlElement { name, attributes }
    }

    /// Returns the qualified name of the element.
    pub fn qname(&self) -> &str {
        &self.name
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &FxHashMap<String, Variant> {
        &self.attributes
    }

    /// Returns the value of one attribute.
    pub fn attribute(&self, name: &str) -> Option<&Variant> {
        self.attributes.get(name)
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: String, value: Variant) {
        self.attributes.insert(name, value);
    }

    /// Returns attribute names in sorted order.
    pub fn sorted_attribute_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.attributes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Display for XmlElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {{", self.name)?;
        for name in self.sorted_attribute_names() {
            write!(f, " {}={}", name, self.attributes[name])?;
        }
        write!(f, " }}")
    }
}

/// XML text content.
#[derive(Debug, Clone)]
pub struct XmlText {
    text: String,
}

impl XmlText {
    /// Creates a new text node from a string.
    pub fn new(text: &str) -> Self {
        XmlText {
            text: text.to_string(),
        }
    }

    /// Returns the text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for XmlText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// XML comment content.
#[derive(Debug, Clone)]
pub struct XmlComment {
    /// The comment text (without the <!-- and --> markers).
    text: String,
}

impl XmlComment {
    /// Creates a new comment node from a string.
    pub fn new(text: &str) -> Self {
        XmlComment {
            text: text.to_string(),
        }
    }

    /// Returns the comment text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for XmlComment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<!--{}-->", self.text)
    }
}

/// XML processing instruction content.
#[derive(Debug, Clone)]
pub struct XmlProcessingInstruction {
    /// The target of the PI (e.g., "xml-stylesheet").
    target: String,
    /// The content/data of the PI (everything after the target).
    content: String,
}

impl XmlProcessingInstruction {
    /// Creates a new PI from target and content strings.
    pub fn new(target: &str, content: &str) -> Self {
        XmlProcessingInstruction {
            target: target.to_string(),
            content: content.to_string(),
        }
    }

    /// Returns the PI target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the PI content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for XmlProcessingInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.content.is_empty() {
            write!(f, "<?{}?>", self.target)
        } else {
            write!(f, "<?{} {}?>", self.target, self.content)
        }
    }
}

/// Returns true if `name` is usable as an element or attribute name.
///
/// Follows the shape of the XML `Name` production: a letter, `_` or `:`
/// first, then letters, digits, `-`, `.`, `_` or `:`. Non-ASCII characters
/// are accepted anywhere except as whitespace.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let start_ok = |c: char| c.is_alphabetic() || c == '_' || c == ':';
    let rest_ok = |c: char| {
        start_ok(c) || c.is_alphanumeric() || c == '-' || c == '.' || (!c.is_ascii() && !c.is_whitespace())
    };
    (start_ok(first) || (!first.is_ascii() && !first.is_whitespace())) && chars.all(rest_ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("Name"));
        assert!(is_valid_name("_private"));
        assert!(is_valid_name("ns:item-2.x"));
        assert!(is_valid_name("größe"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1st"));
        assert!(!is_valid_name("-x"));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("a<b"));
        assert!(!is_valid_name("a\"b"));
    }

    #[test]
    fn test_xml_content_enum() {
        let elem = XmlContent::Element(XmlElement::new("div".to_string()));
        let text = XmlContent::Text(XmlText::new("hello"));

        assert!(elem.is_element());
        assert_eq!(elem.node_type(), NodeType::Element);
        assert_eq!(text.node_type(), NodeType::Text);
        assert_eq!(XmlContent::Document.node_type(), NodeType::Document);

        assert!(elem.as_element().is_some());
        assert!(text.as_element().is_none());
    }

    #[test]
    fn test_element_display_sorts_attributes() {
        let mut element = XmlElement::new("item".to_string());
        element.set_attribute("z".to_string(), Variant::Int(1));
        element.set_attribute("a".to_string(), Variant::from("x"));
        assert_eq!(element.to_string(), "item { a=x z=1 }");
    }
}
