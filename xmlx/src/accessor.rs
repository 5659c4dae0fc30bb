//! Typed get-or-default accessors and the text-element construction helper.
//!
//! Every accessor looks a name up in a [`ValueSource`], coerces what it
//! finds and falls back to the caller's default. A missing name and a value
//! that does not coerce are treated the same way: both yield the default.
//! Callers that need to tell the two apart can use [`ValueSource::value_of`]
//! or [`sub_element_value`] together with [`Variant::coerce`].

use tracing::{debug, trace};

use crate::engine::{DomDocument, DomElement, DomNode, NodeType, ValueSource};
use crate::error::Result;
use crate::variant::{FromVariant, Hex, Variant};

/// Returns true if `node` has the given type.
pub fn is_node_type<N: DomNode>(node: &N, node_type: NodeType) -> bool {
    node.node_type() == node_type
}

/// Returns true if `node` is an element.
pub fn is_element_node<N: DomNode>(node: &N) -> bool {
    is_node_type(node, NodeType::Element)
}

/// Returns the first direct child element of `element` whose tag name is
/// exactly `name`.
pub fn sub_element<E: DomElement>(element: &E, name: &str) -> Option<E> {
    element
        .as_node()
        .child_nodes()
        .filter_map(|node| node.to_element())
        .find(|child| child.tag_name() == name)
}

/// Returns the attributes of the first child element named `name`.
pub fn sub_element_attributes<E: DomElement>(element: &E, name: &str) -> Option<E::Attributes> {
    sub_element(element, name).map(|child| child.attributes())
}

/// Returns the value of the first text node under the first child element
/// named `name`.
///
/// The scan stops at the first text child even when its text is empty. A
/// matching child without any text child yields `None`.
pub fn sub_element_value<E: DomElement>(element: &E, name: &str) -> Option<Variant> {
    sub_element(element, name)?
        .as_node()
        .child_nodes()
        .find(|node| node.node_type() == NodeType::Text)
        .and_then(|text| text.node_value())
}

/// A [`ValueSource`] that looks names up as child element tag names.
///
/// The value under a name is the text of the first matching child element,
/// as described for [`sub_element_value`].
#[derive(Debug, Clone, Copy)]
pub struct SubElements<'a, E>(pub &'a E);

impl<E: DomElement> ValueSource for SubElements<'_, E> {
    fn value_of(&self, name: &str) -> Option<Variant> {
        sub_element_value(self.0, name)
    }
}

/// Wraps `element` so that lookups address its child elements.
pub fn sub_elements<E: DomElement>(element: &E) -> SubElements<'_, E> {
    SubElements(element)
}

/// Looks up `name` in `source` and coerces the value to `T`, returning
/// `default` if the name is absent or the value does not coerce.
pub fn get<T, S>(source: &S, name: &str, default: T) -> T
where
    T: FromVariant,
    S: ValueSource + ?Sized,
{
    let Some(value) = source.value_of(name) else {
        trace!(key = name, "value absent, using default");
        return default;
    };
    match value.coerce::<T>() {
        Ok(v) => v,
        Err(err) => {
            debug!(
                key = name,
                type_name = T::TYPE_NAME,
                %err,
                "value not coercible, using default"
            );
            default
        }
    }
}

/// Returns a string attribute of an element or attribute collection.
pub fn get_string_attribute<S: ValueSource + ?Sized>(source: &S, name: &str, default: &str) -> String {
    source
        .value_of(name)
        .map_or_else(|| default.to_string(), |v| v.as_text().into_owned())
}

/// Returns a float attribute of an element or attribute collection.
pub fn get_float_attribute<S: ValueSource + ?Sized>(source: &S, name: &str, default: f32) -> f32 {
    get(source, name, default)
}

/// Returns a signed integer attribute of an element or attribute collection.
pub fn get_int_attribute<S: ValueSource + ?Sized>(source: &S, name: &str, default: i32) -> i32 {
    get(source, name, default)
}

/// Returns an unsigned decimal attribute of an element or attribute collection.
pub fn get_uint_attribute<S: ValueSource + ?Sized>(source: &S, name: &str, default: u32) -> u32 {
    get(source, name, default)
}

/// Returns a hexadecimal attribute of an element or attribute collection.
///
/// The value is read as base-16 text (e.g. `"1A"` or `"0x1A"`).
pub fn get_hex_attribute<S: ValueSource + ?Sized>(source: &S, name: &str, default: u32) -> u32 {
    get(source, name, Hex(default)).into()
}

/// Returns a boolean attribute of an element or attribute collection.
pub fn get_bool_attribute<S: ValueSource + ?Sized>(source: &S, name: &str, default: bool) -> bool {
    get(source, name, default)
}

/// Returns the text of a child element.
pub fn get_string_sub_element<E: DomElement>(element: &E, name: &str, default: &str) -> String {
    get_string_attribute(&SubElements(element), name, default)
}

/// Returns the text of a child element as a float.
pub fn get_float_sub_element<E: DomElement>(element: &E, name: &str, default: f32) -> f32 {
    get(&SubElements(element), name, default)
}

/// Returns the text of a child element as a signed integer.
pub fn get_int_sub_element<E: DomElement>(element: &E, name: &str, default: i32) -> i32 {
    get(&SubElements(element), name, default)
}

/// Returns the text of a child element as an unsigned decimal.
pub fn get_uint_sub_element<E: DomElement>(element: &E, name: &str, default: u32) -> u32 {
    get(&SubElements(element), name, default)
}

/// Returns the text of a child element parsed as hexadecimal.
pub fn get_hex_sub_element<E: DomElement>(element: &E, name: &str, default: u32) -> u32 {
    get(&SubElements(element), name, Hex(default)).into()
}

/// Returns the text of a child element as a boolean.
pub fn get_bool_sub_element<E: DomElement>(element: &E, name: &str, default: bool) -> bool {
    get(&SubElements(element), name, default)
}

/// Creates a detached element named `tag_name` holding `value` as its only
/// text child.
///
/// The element belongs to `doc` but is not inserted anywhere; attaching it
/// is up to the caller.
///
/// # Errors
/// Propagates the engine's failure to create the element or the text node,
/// or to append one to the other. No element is returned in that case.
pub fn create_text_element<D, V>(doc: &D, tag_name: &str, value: V) -> Result<D::Element>
where
    D: DomDocument,
    V: Into<Variant>,
{
    let value = value.into();
    let element = doc.create_element(tag_name)?;
    let text = doc.create_text_node(&value.as_text())?;
    doc.append_child(&element, &text)?;
    trace!(tag_name, value = %value, "created text element");
    Ok(element)
}
