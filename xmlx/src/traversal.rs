//! Short-circuiting iteration over node sequences.
//!
//! A visitor returns [`ControlFlow::Continue`] to keep going or
//! [`ControlFlow::Break`] to stop. Each function returns `true` if the whole
//! sequence was walked and `false` if the visitor stopped it early. Nodes
//! filtered out before the visitor never influence that result.

use std::ops::ControlFlow;

use crate::engine::{DomNode, NodeMask};

/// Returns the elements of `nodes`, in order, skipping every other kind.
pub fn elements<I>(nodes: I) -> impl Iterator<Item = <I::Item as DomNode>::Element>
where
    I: IntoIterator,
    I::Item: DomNode,
{
    nodes.into_iter().filter_map(|node| node.to_element())
}

/// Returns the child elements of `node`, in order.
pub fn child_elements<N: DomNode>(node: &N) -> impl Iterator<Item = N::Element> {
    elements(node.child_nodes())
}

fn walk<I, F>(mut items: I, visit: F) -> bool
where
    I: Iterator,
    F: FnMut(I::Item) -> ControlFlow<()>,
{
    items.try_for_each(visit).is_continue()
}

/// Visits every node of `nodes`.
pub fn for_each_node<I, F>(nodes: I, visit: F) -> bool
where
    I: IntoIterator,
    I::Item: DomNode,
    F: FnMut(I::Item) -> ControlFlow<()>,
{
    walk(nodes.into_iter(), visit)
}

/// Visits the elements of `nodes`.
pub fn for_each_element<I, F>(nodes: I, visit: F) -> bool
where
    I: IntoIterator,
    I::Item: DomNode,
    F: FnMut(<I::Item as DomNode>::Element) -> ControlFlow<()>,
{
    walk(elements(nodes), visit)
}

/// Visits the nodes of `nodes` whose type is in `mask`.
pub fn for_each_node_of_type<I, F>(nodes: I, mask: NodeMask, visit: F) -> bool
where
    I: IntoIterator,
    I::Item: DomNode,
    F: FnMut(I::Item) -> ControlFlow<()>,
{
    walk(
        nodes
            .into_iter()
            .filter(move |node| mask.matches(node.node_type())),
        visit,
    )
}

/// Visits every child of `node`.
pub fn for_each_sub_node<N, F>(node: &N, visit: F) -> bool
where
    N: DomNode,
    F: FnMut(N) -> ControlFlow<()>,
{
    for_each_node(node.child_nodes(), visit)
}

/// Visits the child elements of `node`.
pub fn for_each_sub_element<N, F>(node: &N, visit: F) -> bool
where
    N: DomNode,
    F: FnMut(N::Element) -> ControlFlow<()>,
{
    for_each_element(node.child_nodes(), visit)
}
