//! XML parser that builds node trees.
//!
//! This parser uses quick-xml's streaming API and keeps a stack of open
//! elements, attaching each node to the element on top of the stack.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::node::{
    new_node_ref, NodeInner, NodeRef, XmlComment, XmlContent, XmlElement,
    XmlProcessingInstruction, XmlText,
};
use crate::variant::Variant;

/// Options controlling how a document is read.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Keep text nodes that consist only of whitespace.
    pub preserve_whitespace: bool,
    /// Keep comments as comment nodes.
    pub keep_comments: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            preserve_whitespace: false,
            keep_comments: true,
        }
    }
}

/// XML parser that builds node trees.
pub struct XmlParser {
    options: ParserOptions,
}

impl XmlParser {
    /// Creates a new parser with the given options.
    pub fn new(options: ParserOptions) -> Self {
        XmlParser { options }
    }

    /// Parses XML from a string.
    pub fn parse_str(&self, xml: &str) -> Result<Document> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let file = File::open(path)?;
        let mut reader = Reader::from_reader(BufReader::new(file));
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a quick-xml Reader.
    fn parse_reader<R: BufRead>(&self, reader: &mut Reader<R>) -> Result<Document> {
        let root = new_node_ref(XmlContent::Document);
        let mut node_stack: Vec<NodeRef> = vec![root.clone()];
        let mut current_text: Option<String> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    self.flush_text(&mut current_text, &node_stack)?;
                    let node = new_node_ref(XmlContent::Element(self.parse_element(e, reader)?));
                    Self::attach(&node_stack, node.clone())?;
                    node_stack.push(node);
                }
                Ok(Event::End(_)) => {
                    self.flush_text(&mut current_text, &node_stack)?;
                    node_stack.pop();
                }
                Ok(Event::Empty(ref e)) => {
                    self.flush_text(&mut current_text, &node_stack)?;
                    let node = new_node_ref(XmlContent::Element(self.parse_element(e, reader)?));
                    Self::attach(&node_stack, node)?;
                }
                Ok(Event::Text(e)) => {
                    let raw =
                        std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                    let text = unescape(raw).map_err(|e| Error::Parse(e.to_string()))?;
                    current_text.get_or_insert_with(String::new).push_str(&text);
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref());
                    current_text.get_or_insert_with(String::new).push_str(&text);
                }
                Ok(Event::GeneralRef(e)) => {
                    let text = current_text.get_or_insert_with(String::new);
                    if let Some(ch) = e.resolve_char_ref()? {
                        text.push(ch);
                    } else {
                        let name = e.decode().map_err(|e| Error::Parse(e.to_string()))?;
                        let resolved = resolve_predefined_entity(&name).ok_or_else(|| {
                            Error::Parse(format!("unknown entity reference &{};", name))
                        })?;
                        text.push_str(resolved);
                    }
                }
                Ok(Event::Comment(e)) => {
                    self.flush_text(&mut current_text, &node_stack)?;
                    if self.options.keep_comments {
                        let text = String::from_utf8_lossy(e.as_ref());
                        let node = new_node_ref(XmlContent::Comment(XmlComment::new(&text)));
                        Self::attach(&node_stack, node)?;
                    }
                }
                Ok(Event::PI(e)) => {
                    self.flush_text(&mut current_text, &node_stack)?;
                    let target = String::from_utf8_lossy(e.target());
                    let content = String::from_utf8_lossy(e.content());
                    let node = new_node_ref(XmlContent::ProcessingInstruction(
                        XmlProcessingInstruction::new(&target, content.trim_start()),
                    ));
                    Self::attach(&node_stack, node)?;
                }
                Ok(Event::Decl(_)) | Ok(Event::DocType(_)) => {
                    // The declaration and DOCTYPE are not part of the tree
                }
                Ok(Event::Eof) => {
                    self.flush_text(&mut current_text, &node_stack)?;
                    break;
                }
                Err(e) => return Err(Error::Parse(format!("XML parse error: {}", e))),
            }
            buf.clear();
        }

        if node_stack.len() > 1 {
            return Err(Error::Parse("unexpected end of document".to_string()));
        }
        let has_element = root
            .borrow()
            .children()
            .iter()
            .any(|c| c.borrow().content().is_element());
        if !has_element {
            return Err(Error::Parse("document has no root element".to_string()));
        }

        Ok(Document::from_root(root))
    }

    /// Attaches a node to the element on top of the stack.
    ///
    /// At document level only one element is allowed.
    fn attach(node_stack: &[NodeRef], node: NodeRef) -> Result<()> {
        let Some(parent) = node_stack.last() else {
            return Err(Error::Parse("unbalanced end tag".to_string()));
        };
        if node_stack.len() == 1 && node.borrow().content().is_element() {
            let has_element = parent
                .borrow()
                .children()
                .iter()
                .any(|c| c.borrow().content().is_element());
            if has_element {
                return Err(Error::Parse("multiple root elements".to_string()));
            }
        }
        NodeInner::add_child_to_ref(parent, node);
        Ok(())
    }

    /// Emits accumulated character data as a text node.
    ///
    /// Whitespace-only runs are dropped unless `preserve_whitespace` is set;
    /// at document level they are always dropped and anything else is an
    /// error.
    fn flush_text(&self, current_text: &mut Option<String>, node_stack: &[NodeRef]) -> Result<()> {
        let Some(text) = current_text.take() else {
            return Ok(());
        };
        let blank = text.trim().is_empty();
        if node_stack.len() <= 1 {
            if blank {
                return Ok(());
            }
            return Err(Error::Parse(
                "text outside the document element".to_string(),
            ));
        }
        if blank && !self.options.preserve_whitespace {
            return Ok(());
        }
        trace!(len = text.len(), "text node");
        Self::attach(node_stack, new_node_ref(XmlContent::Text(XmlText::new(&text))))
    }

    /// Parses an element's name and attributes.
    fn parse_element<R: BufRead>(&self, e: &BytesStart, reader: &Reader<R>) -> Result<XmlElement> {
        let name = reader
            .decoder()
            .decode(e.name().as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();

        let mut attributes = FxHashMap::default();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| Error::Parse(format!("Attribute error: {}", e)))?;
            let key = reader
                .decoder()
                .decode(attr.key.as_ref())
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            attributes.insert(key, Variant::String(value));
        }

        Ok(XmlElement::with_attributes(name, attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NodeType;
    use crate::node::Node;

    fn parse(xml: &str) -> Document {
        XmlParser::new(ParserOptions::default())
            .parse_str(xml)
            .unwrap()
    }

    fn texts(node: &Node) -> Vec<String> {
        node.child_nodes()
            .filter(|n| n.node_type() == NodeType::Text)
            .filter_map(|n| n.node_value())
            .map(|v| v.to_string())
            .collect()
    }

    #[test]
    fn test_parse_simple_xml() {
        let doc = parse(r#"<root><child>text</child></root>"#);
        let root = doc.document_element().unwrap();
        assert_eq!(root.tag_name(), "root");

        let child = root.child_nodes().next().unwrap();
        assert_eq!(child.to_element().unwrap().tag_name(), "child");
        assert_eq!(texts(&child), vec!["text"]);
    }

    #[test]
    fn test_parse_with_attributes() {
        let doc = parse(r#"<root id="foo" class="bar">content</root>"#);
        let root = doc.document_element().unwrap();
        assert_eq!(root.attribute("id"), Some(Variant::from("foo")));
        assert_eq!(root.attribute("class"), Some(Variant::from("bar")));
        assert_eq!(root.attribute("missing"), None);
    }

    #[test]
    fn test_whitespace_only_text_dropped() {
        let doc = parse("<root>\n  <a/>\n  <b/>\n</root>");
        let root = doc.document_element().unwrap();
        assert_eq!(root.child_nodes().count(), 2);
    }

    #[test]
    fn test_whitespace_preserved_on_request() {
        let options = ParserOptions {
            preserve_whitespace: true,
            ..ParserOptions::default()
        };
        let doc = XmlParser::new(options)
            .parse_str("<root> <a/> </root>")
            .unwrap();
        let root = doc.document_element().unwrap();
        assert_eq!(root.child_nodes().count(), 3);
    }

    #[test]
    fn test_text_kept_verbatim() {
        let doc = parse("<root>  hello   world  </root>");
        let root = doc.document_element().unwrap();
        assert_eq!(texts(&root.as_node()), vec!["  hello   world  "]);
    }

    #[test]
    fn test_entities_and_cdata() {
        let doc = parse(r#"<root a="&lt;&amp;">x &amp; y &#65;&#x42;<![CDATA[<raw>]]></root>"#);
        let root = doc.document_element().unwrap();
        assert_eq!(root.attribute("a"), Some(Variant::from("<&")));
        assert_eq!(texts(&root.as_node()), vec!["x & y AB<raw>"]);
    }

    #[test]
    fn test_comments_and_pis() {
        let doc = parse(r#"<?xml version="1.0"?><?style href="a.css"?><root><!--note--></root>"#);
        let top: Vec<NodeType> = doc.child_nodes().map(|n| n.node_type()).collect();
        assert_eq!(
            top,
            vec![NodeType::ProcessingInstruction, NodeType::Element]
        );
        let root = doc.document_element().unwrap();
        let comment = root.child_nodes().next().unwrap();
        assert_eq!(comment.node_type(), NodeType::Comment);
        assert_eq!(comment.node_value(), Some(Variant::from("note")));
    }

    #[test]
    fn test_comments_dropped_on_request() {
        let options = ParserOptions {
            keep_comments: false,
            ..ParserOptions::default()
        };
        let doc = XmlParser::new(options)
            .parse_str("<root><!--note--></root>")
            .unwrap();
        assert_eq!(doc.document_element().unwrap().child_nodes().count(), 0);
    }

    #[test]
    fn test_empty_element() {
        let doc = parse(r#"<root><empty /></root>"#);
        let root = doc.document_element().unwrap();
        let empty = root.child_nodes().next().unwrap().to_element().unwrap();
        assert_eq!(empty.tag_name(), "empty");
        assert_eq!(empty.child_nodes().count(), 0);
    }

    #[test]
    fn test_malformed_documents() {
        let parser = XmlParser::new(ParserOptions::default());
        assert!(parser.parse_str("").is_err());
        assert!(parser.parse_str("<a></b>").is_err());
        assert!(parser.parse_str("<a/><b/>").is_err());
        assert!(parser.parse_str("text<a/>").is_err());
        assert!(parser.parse_str("<a>&bogus;</a>").is_err());
    }

    #[test]
    fn test_references_in_text() {
        let doc = parse("<root>&amp;&apos;&quot;&#169;&#x1F600;</root>");
        let root = doc.document_element().unwrap();
        assert_eq!(texts(&root.as_node()), vec!["&'\"©😀"]);

        let parser = XmlParser::new(ParserOptions::default());
        assert!(parser.parse_str("<a>&nbsp;</a>").is_err());
        assert!(parser.parse_str("<a>&#xD800;</a>").is_err());
    }
}
