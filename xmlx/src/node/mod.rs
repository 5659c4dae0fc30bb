//! Node structures for the bundled XML tree.
//!
//! Nodes live behind `Rc<RefCell<NodeInner>>`. Callers work with the typed
//! handles [`Node`], [`Element`] and [`Attributes`], which are cheap to clone
//! and never own more of the tree than a reference count.

mod xml_content;

pub use xml_content::{
    is_valid_name, XmlComment, XmlContent, XmlElement, XmlProcessingInstruction, XmlText,
};

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::{DomElement, DomNode, NodeType, ValueSource};
use crate::error::{Error, Result};
use crate::variant::Variant;

/// Global counter for generating unique node IDs.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generates a unique node ID.
fn next_node_id() -> u64 {
    NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A reference-counted pointer to a node.
pub type NodeRef = Rc<RefCell<NodeInner>>;

/// A weak reference to a node, used for parent links.
pub type WeakNodeRef = Weak<RefCell<NodeInner>>;

/// Creates a new, detached node reference.
pub fn new_node_ref(content: XmlContent) -> NodeRef {
    Rc::new(RefCell::new(NodeInner::new(content)))
}

/// The inner data of a node in the tree.
#[derive(Debug)]
pub struct NodeInner {
    /// Unique identifier for this node.
    id: u64,
    /// Child nodes.
    children: Vec<NodeRef>,
    /// XML content of this node.
    content: XmlContent,
    /// Weak reference to parent node.
    parent: WeakNodeRef,
}

impl NodeInner {
    /// Creates a new node with the given content.
    pub fn new(content: XmlContent) -> Self {
        NodeInner {
            id: next_node_id(),
            children: Vec::new(),
            content,
            parent: Weak::new(),
        }
    }

    /// Returns the unique ID of this node.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the content of this node.
    pub fn content(&self) -> &XmlContent {
        &self.content
    }

    /// Returns a mutable reference to the content.
    pub fn content_mut(&mut self) -> &mut XmlContent {
        &mut self.content
    }

    /// Returns a reference to the child at the given index.
    pub fn child(&self, index: usize) -> Option<&NodeRef> {
        self.children.get(index)
    }

    /// Returns the children as a slice.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Returns a weak reference to the parent.
    pub fn parent(&self) -> &WeakNodeRef {
        &self.parent
    }
}

/// Helper functions that work with NodeRef.
impl NodeInner {
    /// Adds a child node without validating the resulting tree.
    ///
    /// Used by the parser, which only ever builds well-formed trees.
    pub(crate) fn add_child_to_ref(parent_ref: &NodeRef, child_ref: NodeRef) {
        child_ref.borrow_mut().parent = Rc::downgrade(parent_ref);
        parent_ref.borrow_mut().children.push(child_ref);
    }

    /// Appends a child after checking that the result is still a tree.
    ///
    /// Rejects documents as children, children that already have a parent,
    /// children of leaf nodes, and inserting a node below itself. Under a
    /// document node only a single element plus comments and processing
    /// instructions are allowed.
    pub fn append_child_to_ref(parent_ref: &NodeRef, child_ref: &NodeRef) -> Result<()> {
        if Self::is_inclusive_ancestor(child_ref, parent_ref) {
            return Err(Error::HierarchyRequest(
                "cannot insert a node into its own subtree".to_string(),
            ));
        }

        let child_type = {
            let child = child_ref.borrow();
            if child.parent.upgrade().is_some() {
                return Err(Error::HierarchyRequest(
                    "node already has a parent".to_string(),
                ));
            }
            child.content.node_type()
        };

        {
            let parent = parent_ref.borrow();
            match (parent.content.node_type(), child_type) {
                (_, NodeType::Document) => {
                    return Err(Error::HierarchyRequest(
                        "a document cannot be a child".to_string(),
                    ));
                }
                (NodeType::Element, _) => {}
                (NodeType::Document, NodeType::Element) => {
                    if parent.children.iter().any(|c| c.borrow().content.is_element()) {
                        return Err(Error::HierarchyRequest(
                            "document already has a document element".to_string(),
                        ));
                    }
                }
                (NodeType::Document, NodeType::Comment | NodeType::ProcessingInstruction) => {}
                (NodeType::Document, NodeType::Text) => {
                    return Err(Error::HierarchyRequest(
                        "text cannot be a child of the document".to_string(),
                    ));
                }
                (parent_type, _) => {
                    return Err(Error::HierarchyRequest(format!(
                        "{:?} nodes cannot have children",
                        parent_type
                    )));
                }
            }
        }

        Self::add_child_to_ref(parent_ref, Rc::clone(child_ref));
        Ok(())
    }

    /// Returns true if `ancestor` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(ancestor: &NodeRef, node: &NodeRef) -> bool {
        let mut current = Some(Rc::clone(node));
        while let Some(n) = current {
            if Rc::ptr_eq(&n, ancestor) {
                return true;
            }
            current = n.borrow().parent.upgrade();
        }
        false
    }
}

/// A handle to any node in the tree.
#[derive(Clone)]
pub struct Node(NodeRef);

impl Node {
    pub(crate) fn from_ref(node_ref: NodeRef) -> Self {
        Node(node_ref)
    }

    /// Returns the underlying node reference.
    pub fn node_ref(&self) -> &NodeRef {
        &self.0
    }

    /// Returns the unique ID of this node.
    pub fn id(&self) -> u64 {
        self.0.borrow().id()
    }

    /// Returns the node's kind.
    pub fn node_type(&self) -> NodeType {
        self.0.borrow().content().node_type()
    }

    /// Returns true if this node is an element.
    pub fn is_element(&self) -> bool {
        self.0.borrow().content().is_element()
    }

    /// Returns the node's value: the text of text nodes, comments and
    /// processing instructions, `None` for elements and documents.
    pub fn node_value(&self) -> Option<Variant> {
        match self.0.borrow().content() {
            XmlContent::Text(t) => Some(Variant::from(t.text())),
            XmlContent::Comment(c) => Some(Variant::from(c.text())),
            XmlContent::ProcessingInstruction(pi) => Some(Variant::from(pi.content())),
            XmlContent::Document | XmlContent::Element(_) => None,
        }
    }

    /// Returns a live iterator over the node's children.
    pub fn child_nodes(&self) -> ChildNodes {
        ChildNodes::new(Rc::clone(&self.0))
    }

    /// Returns the parent node, if attached.
    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent().upgrade().map(Node)
    }

    /// Returns the element view of this node, if it is an element.
    pub fn to_element(&self) -> Option<Element> {
        self.is_element().then(|| Element(Rc::clone(&self.0)))
    }

    /// Returns true if both handles refer to the same node.
    pub fn same_node(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Node")
            .field("id", &inner.id())
            .field("type", &inner.content().node_type())
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let xml = crate::xml::print_to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&xml)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node(element.0)
    }
}

/// A handle to an element node.
///
/// The wrapped node always holds [`XmlContent::Element`].
#[derive(Clone)]
pub struct Element(NodeRef);

impl Element {
    /// Runs `f` on the element payload.
    fn with_element<R>(&self, f: impl FnOnce(&XmlElement) -> R) -> Option<R> {
        self.0.borrow().content().as_element().map(f)
    }

    /// Returns the underlying node reference.
    pub fn node_ref(&self) -> &NodeRef {
        &self.0
    }

    /// Returns the tag name.
    pub fn tag_name(&self) -> String {
        self.with_element(|e| e.qname().to_string())
            .unwrap_or_default()
    }

    /// Returns the value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<Variant> {
        self.with_element(|e| e.attribute(name).cloned()).flatten()
    }

    /// Sets an attribute to a typed value.
    ///
    /// # Errors
    /// Returns [`Error::InvalidName`] if `name` is not a legal XML name.
    pub fn set_attribute(&self, name: &str, value: impl Into<Variant>) -> Result<()> {
        if !is_valid_name(name) {
            return Err(Error::InvalidName(name.to_string()));
        }
        if let Some(element) = self.0.borrow_mut().content_mut().as_element_mut() {
            element.set_attribute(name.to_string(), value.into());
        }
        Ok(())
    }

    /// Returns a live view of this element's attributes.
    pub fn attributes(&self) -> Attributes {
        Attributes(Rc::clone(&self.0))
    }

    /// Returns a live iterator over the element's children.
    pub fn child_nodes(&self) -> ChildNodes {
        ChildNodes::new(Rc::clone(&self.0))
    }

    /// Appends `child` as the last child of this element.
    ///
    /// # Errors
    /// Returns [`Error::HierarchyRequest`] if `child` is attached elsewhere,
    /// is a document, or is this element or one of its ancestors.
    pub fn append_child(&self, child: &Node) -> Result<()> {
        NodeInner::append_child_to_ref(&self.0, &child.0)
    }

    /// Returns the plain node view of this element.
    pub fn as_node(&self) -> Node {
        Node(Rc::clone(&self.0))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.0.borrow().id())
            .field("tag_name", &self.tag_name())
            .finish()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_node(), f)
    }
}

/// A live, detached view of one element's attributes.
#[derive(Clone)]
pub struct Attributes(NodeRef);

impl Attributes {
    /// Returns the value stored under `name`.
    pub fn named_item(&self, name: &str) -> Option<Variant> {
        self.0
            .borrow()
            .content()
            .as_element()
            .and_then(|e| e.attribute(name).cloned())
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0
            .borrow()
            .content()
            .as_element()
            .map_or(0, |e| e.attributes().len())
    }

    /// Returns true if the element has no attributes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the attribute names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.0
            .borrow()
            .content()
            .as_element()
            .map(|e| {
                e.sorted_attribute_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// A live iterator over a node's children.
///
/// Each step reads the parent's current child list, so children appended
/// during iteration are visited. The iterator is single-pass; fetch a new
/// one to start over.
#[derive(Debug)]
pub struct ChildNodes {
    parent: NodeRef,
    next: usize,
}

impl ChildNodes {
    fn new(parent: NodeRef) -> Self {
        ChildNodes { parent, next: 0 }
    }
}

impl Iterator for ChildNodes {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let child = self.parent.borrow().child(self.next).cloned()?;
        self.next += 1;
        Some(Node(child))
    }
}

impl DomNode for Node {
    type Element = Element;
    type Children = ChildNodes;

    fn node_type(&self) -> NodeType {
        Node::node_type(self)
    }

    fn node_value(&self) -> Option<Variant> {
        Node::node_value(self)
    }

    fn child_nodes(&self) -> ChildNodes {
        Node::child_nodes(self)
    }

    fn to_element(&self) -> Option<Element> {
        Node::to_element(self)
    }
}

impl ValueSource for Element {
    fn value_of(&self, name: &str) -> Option<Variant> {
        self.attribute(name)
    }
}

impl DomElement for Element {
    type Node = Node;
    type Attributes = Attributes;

    fn tag_name(&self) -> Cow<'_, str> {
        Cow::Owned(Element::tag_name(self))
    }

    fn attributes(&self) -> Attributes {
        Element::attributes(self)
    }

    fn as_node(&self) -> Node {
        Element::as_node(self)
    }
}

impl ValueSource for Attributes {
    fn value_of(&self, name: &str) -> Option<Variant> {
        self.named_item(name)
    }
}
