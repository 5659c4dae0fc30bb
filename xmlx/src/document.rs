//! The bundled document type.

use std::fmt;
use std::path::Path;

use tracing::{debug, instrument};

use crate::engine::DomDocument;
use crate::error::{Error, Result};
use crate::node::{
    is_valid_name, new_node_ref, ChildNodes, Element, Node, NodeInner, NodeRef, XmlComment,
    XmlContent, XmlElement, XmlText,
};
use crate::xml::{ParserOptions, XmlParser};

/// An XML document: the owner of a node tree.
///
/// Nodes created through a document start out detached. They stay alive as
/// long as a handle or a parent refers to them.
pub struct Document {
    root: NodeRef,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Document {
            root: new_node_ref(XmlContent::Document),
        }
    }

    pub(crate) fn from_root(root: NodeRef) -> Self {
        Document { root }
    }

    /// Parses a document from a string with default options.
    pub fn parse_str(xml: &str) -> Result<Self> {
        Self::parse_str_with(xml, &ParserOptions::default())
    }

    /// Parses a document from a string.
    #[instrument(level = "debug", skip(xml), fields(len = xml.len()))]
    pub fn parse_str_with(xml: &str, options: &ParserOptions) -> Result<Self> {
        let doc = XmlParser::new(options.clone()).parse_str(xml)?;
        debug!("document parsed");
        Ok(doc)
    }

    /// Parses a document from a file with default options.
    #[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = XmlParser::new(ParserOptions::default()).parse_file(path)?;
        debug!("document parsed");
        Ok(doc)
    }

    /// Returns the document node.
    pub fn as_node(&self) -> Node {
        Node::from_ref(self.root.clone())
    }

    /// Returns the top-level element, if there is one.
    pub fn document_element(&self) -> Option<Element> {
        self.child_nodes().find_map(|n| n.to_element())
    }

    /// Returns a live iterator over the document's top-level nodes.
    pub fn child_nodes(&self) -> ChildNodes {
        self.as_node().child_nodes()
    }

    /// Appends a top-level node.
    ///
    /// # Errors
    /// Returns [`Error::HierarchyRequest`] for text, for a second element,
    /// or for a node that is already attached.
    pub fn append_child(&self, child: &Node) -> Result<()> {
        NodeInner::append_child_to_ref(&self.root, child.node_ref())
    }

    /// Creates a detached element.
    ///
    /// # Errors
    /// Returns [`Error::InvalidName`] if `tag_name` is not a legal XML name.
    pub fn create_element(&self, tag_name: &str) -> Result<Element> {
        if !is_valid_name(tag_name) {
            return Err(Error::InvalidName(tag_name.to_string()));
        }
        let node = Node::from_ref(new_node_ref(XmlContent::Element(XmlElement::new(
            tag_name.to_string(),
        ))));
        node.to_element()
            .ok_or_else(|| Error::InvalidName(tag_name.to_string()))
    }

    /// Creates a detached text node.
    pub fn create_text_node(&self, data: &str) -> Node {
        Node::from_ref(new_node_ref(XmlContent::Text(XmlText::new(data))))
    }

    /// Creates a detached comment node.
    pub fn create_comment(&self, data: &str) -> Node {
        Node::from_ref(new_node_ref(XmlContent::Comment(XmlComment::new(data))))
    }

    /// Serializes the document, including the XML declaration.
    pub fn to_xml_string(&self) -> std::io::Result<String> {
        crate::xml::print_to_string(&self.root)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("document_element", &self.document_element())
            .finish()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let xml = self.to_xml_string().map_err(|_| fmt::Error)?;
        f.write_str(&xml)
    }
}

impl DomDocument for Document {
    type Node = Node;
    type Element = Element;

    fn create_element(&self, tag_name: &str) -> Result<Element> {
        Document::create_element(self, tag_name)
    }

    fn create_text_node(&self, data: &str) -> Result<Node> {
        Ok(Document::create_text_node(self, data))
    }

    fn append_child(&self, parent: &Element, child: &Node) -> Result<()> {
        parent.append_child(child)
    }
}
