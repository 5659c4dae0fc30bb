//! Read-only adapter for `roxmltree` documents.
//!
//! `roxmltree::Node` is used directly as the node handle. Elements are
//! wrapped in [`RoxElement`] so that only element nodes can reach the
//! accessor layer as elements.
//!
//! Tag and attribute names are matched as written in the source, prefix
//! included, the same way the bundled engine matches them.
//!
//! ```
//! # fn main() -> Result<(), roxmltree::Error> {
//! use xmlx::roxml::RoxElement;
//!
//! let doc = roxmltree::Document::parse(r#"<cfg retries="3"><host>db</host></cfg>"#)?;
//! let root = RoxElement::new(doc.root_element()).expect("root is an element");
//! assert_eq!(xmlx::get_int_attribute(&root, "retries", 0), 3);
//! assert_eq!(xmlx::get_string_sub_element(&root, "host", ""), "db");
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;

use crate::engine::{DomElement, DomNode, NodeType, ValueSource};
use crate::variant::Variant;

impl<'a, 'input: 'a> DomNode for roxmltree::Node<'a, 'input> {
    type Element = RoxElement<'a, 'input>;
    type Children = roxmltree::Children<'a, 'input>;

    fn node_type(&self) -> NodeType {
        match roxmltree::Node::node_type(self) {
            roxmltree::NodeType::Root => NodeType::Document,
            roxmltree::NodeType::Element => NodeType::Element,
            roxmltree::NodeType::Text => NodeType::Text,
            roxmltree::NodeType::Comment => NodeType::Comment,
            roxmltree::NodeType::PI => NodeType::ProcessingInstruction,
        }
    }

    fn node_value(&self) -> Option<Variant> {
        match roxmltree::Node::node_type(self) {
            roxmltree::NodeType::Text | roxmltree::NodeType::Comment => {
                Some(Variant::from(self.text().unwrap_or_default()))
            }
            roxmltree::NodeType::PI => self
                .pi()
                .map(|pi| Variant::from(pi.value.unwrap_or_default())),
            roxmltree::NodeType::Root | roxmltree::NodeType::Element => None,
        }
    }

    fn child_nodes(&self) -> Self::Children {
        self.children()
    }

    fn to_element(&self) -> Option<Self::Element> {
        RoxElement::new(*self)
    }
}

/// An element node of a `roxmltree` document.
#[derive(Debug, Clone, Copy)]
pub struct RoxElement<'a, 'input: 'a>(roxmltree::Node<'a, 'input>);

impl<'a, 'input: 'a> RoxElement<'a, 'input> {
    /// Wraps `node` if it is an element.
    pub fn new(node: roxmltree::Node<'a, 'input>) -> Option<Self> {
        node.is_element().then_some(RoxElement(node))
    }

    /// Returns the wrapped node.
    pub fn node(&self) -> roxmltree::Node<'a, 'input> {
        self.0
    }
}

/// Returns the qualified name of an element as written, e.g. `p:x`.
fn qualified_tag_name<'input>(node: roxmltree::Node<'_, 'input>) -> &'input str {
    let source = node
        .document()
        .input_text()
        .get(node.range().start + 1..)
        .unwrap_or_default();
    let end = source
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(source.len());
    match &source[..end] {
        "" => node.tag_name().name(),
        qname => qname,
    }
}

/// Looks an attribute up by its qualified name as written.
fn qualified_attribute<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    let source = node.document().input_text();
    node.attributes()
        .find(|attr| source.get(attr.range_qname()) == Some(name))
        .map(|attr| attr.value())
}

impl ValueSource for RoxElement<'_, '_> {
    fn value_of(&self, name: &str) -> Option<Variant> {
        qualified_attribute(self.0, name).map(Variant::from)
    }
}

impl<'a, 'input: 'a> DomElement for RoxElement<'a, 'input> {
    type Node = roxmltree::Node<'a, 'input>;
    type Attributes = RoxAttributes<'a, 'input>;

    fn tag_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(qualified_tag_name(self.0))
    }

    fn attributes(&self) -> RoxAttributes<'a, 'input> {
        RoxAttributes(self.0)
    }

    fn as_node(&self) -> roxmltree::Node<'a, 'input> {
        self.0
    }
}

/// The attributes of one `roxmltree` element.
#[derive(Debug, Clone, Copy)]
pub struct RoxAttributes<'a, 'input: 'a>(roxmltree::Node<'a, 'input>);

impl RoxAttributes<'_, '_> {
    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.attributes().count()
    }

    /// Returns true if the element has no attributes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ValueSource for RoxAttributes<'_, '_> {
    fn value_of(&self, name: &str) -> Option<Variant> {
        qualified_attribute(self.0, name).map(Variant::from)
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use super::*;
    use crate::accessor::*;
    use crate::traversal::{for_each_sub_element, for_each_sub_node};
    use crate::Document;

    const XML: &str = r#"<r id="7" mask="ff" on="TRUE"><name>widget</name><size>3.5</size><empty/><!--note--><size>9</size></r>"#;

    #[test]
    fn test_node_types() {
        let doc = roxmltree::Document::parse("<r>t<!--c--><?p v?><e/></r>").unwrap();
        let root = doc.root();
        assert_eq!(DomNode::node_type(&root), NodeType::Document);
        let types: Vec<NodeType> = doc
            .root_element()
            .child_nodes()
            .map(|n| DomNode::node_type(&n))
            .collect();
        assert_eq!(
            types,
            vec![
                NodeType::Text,
                NodeType::Comment,
                NodeType::ProcessingInstruction,
                NodeType::Element
            ]
        );
    }

    #[test]
    fn test_accessor_parity_with_bundled_engine() {
        let rox_doc = roxmltree::Document::parse(XML).unwrap();
        let rox = RoxElement::new(rox_doc.root_element()).unwrap();
        let own_doc = Document::parse_str(XML).unwrap();
        let own = own_doc.document_element().unwrap();

        assert_eq!(get_int_attribute(&rox, "id", 0), get_int_attribute(&own, "id", 0));
        assert_eq!(get_hex_attribute(&rox, "mask", 0), 255);
        assert_eq!(get_hex_attribute(&own, "mask", 0), 255);
        assert_eq!(get_bool_attribute(&rox, "on", false), get_bool_attribute(&own, "on", false));
        assert_eq!(
            get_string_sub_element(&rox, "name", ""),
            get_string_sub_element(&own, "name", "")
        );
        assert_eq!(get_float_sub_element(&rox, "size", 0.0), 3.5);
        assert_eq!(get_float_sub_element(&own, "size", 0.0), 3.5);
        assert_eq!(get_string_sub_element(&rox, "empty", "d"), "d");
        assert_eq!(get_string_sub_element(&own, "empty", "d"), "d");
    }

    #[test]
    fn test_detached_attributes() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let root = RoxElement::new(doc.root_element()).unwrap();
        let attrs = root.attributes();
        assert_eq!(attrs.len(), 3);
        assert_eq!(get_uint_attribute(&attrs, "id", 0), 7);
        assert_eq!(get_uint_attribute(&attrs, "missing", 1), 1);
    }

    #[test]
    fn test_traversal_parity() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let root = doc.root_element();

        let mut all = 0;
        assert!(for_each_sub_node(&root, |_| {
            all += 1;
            ControlFlow::Continue(())
        }));
        assert_eq!(all, 5);

        let mut names = Vec::new();
        let completed = for_each_sub_element(&root, |e| {
            names.push(e.tag_name().into_owned());
            if e.tag_name() == "empty" {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(!completed);
        assert_eq!(names, vec!["name", "size", "empty"]);
    }

    #[test]
    fn test_prefixed_names_match_as_written() {
        const PREFIXED: &str =
            r#"<r xmlns:p="urn:p" p:a="attr" a="plain"><p:x>1</p:x><x>2</x></r>"#;
        let rox_doc = roxmltree::Document::parse(PREFIXED).unwrap();
        let rox = RoxElement::new(rox_doc.root_element()).unwrap();
        let own_doc = Document::parse_str(PREFIXED).unwrap();
        let own = own_doc.document_element().unwrap();

        let names: Vec<String> = crate::traversal::child_elements(&rox.as_node())
            .map(|e| e.tag_name().into_owned())
            .collect();
        assert_eq!(names, vec!["p:x", "x"]);

        assert_eq!(get_string_sub_element(&rox, "p:x", "DEFAULT"), "1");
        assert_eq!(get_string_sub_element(&own, "p:x", "DEFAULT"), "1");
        assert_eq!(get_string_sub_element(&rox, "x", "DEFAULT"), "2");
        assert_eq!(get_string_sub_element(&own, "x", "DEFAULT"), "2");

        assert_eq!(get_string_attribute(&rox, "p:a", "DEFAULT"), "attr");
        assert_eq!(get_string_attribute(&own, "p:a", "DEFAULT"), "attr");
        assert_eq!(get_string_attribute(&rox, "a", "DEFAULT"), "plain");
        assert_eq!(get_string_attribute(&rox.attributes(), "p:a", "DEFAULT"), "attr");
        assert_eq!(get_string_attribute(&rox, "q:a", "DEFAULT"), "DEFAULT");
    }

    #[test]
    fn test_non_element_is_not_wrapped() {
        let doc = roxmltree::Document::parse("<r>t</r>").unwrap();
        let text = doc.root_element().first_child().unwrap();
        assert!(RoxElement::new(text).is_none());
        assert_eq!(DomNode::node_value(&text), Some(Variant::from("t")));
    }
}
