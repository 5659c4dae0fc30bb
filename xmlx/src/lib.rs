//! xmlx - typed accessors and traversal helpers over an XML DOM
//!
//! This library reads attribute values and child-element text with type
//! coercion and default fallback, walks node lists with a visitor that can
//! stop early, and builds text-only elements from typed values.
//!
//! # Overview
//!
//! The helpers are written against the traits in [`engine`]. Two engines
//! implement them:
//!
//! - the bundled tree ([`Document`], [`Node`], [`Element`]), parsed with
//!   quick-xml and printable back to XML;
//! - `roxmltree` documents, through the [`roxml`] adapter (cargo feature
//!   `roxmltree`).
//!
//! # Example
//!
//! ```
//! use std::ops::ControlFlow;
//!
//! use xmlx::{
//!     create_text_element, for_each_sub_element, get_bool_attribute, get_hex_attribute,
//!     get_int_sub_element, Document,
//! };
//!
//! # fn main() -> xmlx::Result<()> {
//! let doc = Document::parse_str(
//!     r#"<window visible="true" color="0xFF8800"><width>640</width><height>480</height></window>"#,
//! )?;
//! let window = doc.document_element().expect("document has a root");
//!
//! assert!(get_bool_attribute(&window, "visible", false));
//! assert_eq!(get_hex_attribute(&window, "color", 0), 0xFF8800);
//! assert_eq!(get_int_sub_element(&window, "width", 0), 640);
//! assert_eq!(get_int_sub_element(&window, "depth", 32), 32);
//!
//! let mut names = Vec::new();
//! for_each_sub_element(&window.as_node(), |e| {
//!     names.push(e.tag_name());
//!     ControlFlow::Continue(())
//! });
//! assert_eq!(names, ["width", "height"]);
//!
//! let title = create_text_element(&doc, "title", "Main")?;
//! window.append_child(&title.as_node())?;
//! assert_eq!(title.to_string(), "<title>Main</title>");
//! # Ok(())
//! # }
//! ```

pub mod accessor;
pub mod document;
pub mod engine;
pub mod error;
pub mod node;
#[cfg(feature = "roxmltree")]
pub mod roxml;
pub mod traversal;
pub mod variant;
pub mod xml;

// Re-export commonly used types
pub use document::Document;
pub use engine::{DomDocument, DomElement, DomNode, NodeMask, NodeType, ValueSource};
pub use error::{Error, Result};
pub use node::{Attributes, ChildNodes, Element, Node};
pub use variant::{FromVariant, Hex, Variant};
pub use xml::{
    print_to_string, print_to_string_pretty, ParserOptions, XmlParser, XmlPrinter,
    XmlPrinterOptions,
};

// Re-export the helper layer
pub use accessor::{
    create_text_element, get, get_bool_attribute, get_bool_sub_element, get_float_attribute,
    get_float_sub_element, get_hex_attribute, get_hex_sub_element, get_int_attribute,
    get_int_sub_element, get_string_attribute, get_string_sub_element, get_uint_attribute,
    get_uint_sub_element, is_element_node, is_node_type, sub_element, sub_element_attributes,
    sub_element_value, sub_elements, SubElements,
};
pub use traversal::{
    child_elements, elements, for_each_element, for_each_node, for_each_node_of_type,
    for_each_sub_element, for_each_sub_node,
};
