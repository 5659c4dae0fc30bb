//! The surface an XML engine exposes to the helper layer.
//!
//! Accessors, traversal and the construction helper are written only against
//! these traits. The crate ships one full engine ([`crate::Document`] and its
//! handles) and, behind the `roxmltree` feature, a read-only adapter for
//! `roxmltree` documents.

use std::borrow::Cow;

use bitflags::bitflags;

use crate::error::Result;
use crate::variant::Variant;

/// The kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// The document node at the top of a tree.
    Document,
    /// An element with a tag name, attributes and children.
    Element,
    /// Character data.
    Text,
    /// A comment.
    Comment,
    /// A processing instruction.
    ProcessingInstruction,
}

bitflags! {
    /// A set of node types, used to select which nodes a traversal visits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeMask: u8 {
        const DOCUMENT = 1;
        const ELEMENT = 1 << 1;
        const TEXT = 1 << 2;
        const COMMENT = 1 << 3;
        const PROCESSING_INSTRUCTION = 1 << 4;
    }
}

impl NodeMask {
    /// Returns true if nodes of type `node_type` belong to this set.
    pub fn matches(self, node_type: NodeType) -> bool {
        self.contains(NodeMask::from(node_type))
    }
}

impl From<NodeType> for NodeMask {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Document => NodeMask::DOCUMENT,
            NodeType::Element => NodeMask::ELEMENT,
            NodeType::Text => NodeMask::TEXT,
            NodeType::Comment => NodeMask::COMMENT,
            NodeType::ProcessingInstruction => NodeMask::PROCESSING_INSTRUCTION,
        }
    }
}

/// Something that maps names to typed values.
///
/// Elements (by attribute name), detached attribute collections and
/// [`crate::SubElements`] (by child tag name) implement this.
pub trait ValueSource {
    /// Returns the raw value stored under `name`, or `None` if absent.
    fn value_of(&self, name: &str) -> Option<Variant>;
}

/// A handle to a node of some engine's tree.
pub trait DomNode: Clone {
    /// The element handle type of the same engine.
    type Element: DomElement<Node = Self>;
    /// Sequential iterator over a node's children.
    type Children: Iterator<Item = Self>;

    /// Returns the node's kind.
    fn node_type(&self) -> NodeType;

    /// Returns the node's raw value. Text nodes have one; elements do not.
    fn node_value(&self) -> Option<Variant>;

    /// Returns the children in document order.
    fn child_nodes(&self) -> Self::Children;

    /// Returns the element view of this node, if it is an element.
    fn to_element(&self) -> Option<Self::Element>;

    /// Returns true if this node is an element.
    fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }
}

/// A handle to an element of some engine's tree.
///
/// The [`ValueSource`] impl of an element looks up attributes.
pub trait DomElement: ValueSource + Clone {
    /// The node handle type of the same engine.
    type Node: DomNode<Element = Self>;
    /// A detached attribute collection.
    type Attributes: ValueSource;

    /// Returns the tag name exactly as written.
    fn tag_name(&self) -> Cow<'_, str>;

    /// Returns the attribute collection, detached from the element handle.
    fn attributes(&self) -> Self::Attributes;

    /// Returns the plain node view of this element.
    fn as_node(&self) -> Self::Node;
}

/// Node creation for engines whose trees can grow.
pub trait DomDocument {
    /// Node handle type.
    type Node: DomNode<Element = Self::Element>;
    /// Element handle type.
    type Element: DomElement<Node = Self::Node>;

    /// Creates a detached element owned by this document.
    fn create_element(&self, tag_name: &str) -> Result<Self::Element>;

    /// Creates a detached text node owned by this document.
    fn create_text_node(&self, data: &str) -> Result<Self::Node>;

    /// Appends `child` as the last child of `parent`.
    fn append_child(&self, parent: &Self::Element, child: &Self::Node) -> Result<()>;
}
