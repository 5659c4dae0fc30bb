//! Traversal behaviour through the public API.

use std::ops::ControlFlow;

use pretty_assertions::assert_eq;
use xmlx::{
    child_elements, for_each_element, for_each_node, for_each_node_of_type, for_each_sub_element,
    for_each_sub_node, get_string_attribute, Document, Node, NodeMask, NodeType,
};

fn children(xml: &str) -> (Document, Vec<Node>) {
    let doc = Document::parse_str(xml).unwrap();
    let nodes = doc.document_element().unwrap().child_nodes().collect();
    (doc, nodes)
}

fn stop_at<'a>(
    tag: &'static str,
    seen: &'a mut Vec<String>,
) -> impl FnMut(Node) -> ControlFlow<()> + 'a {
    move |node| {
        let name = node
            .to_element()
            .map(|e| e.tag_name())
            .unwrap_or_else(|| "#text".to_string());
        let stop = name == tag;
        seen.push(name);
        if stop {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

#[test]
fn abort_on_b_visits_a_and_b_only() {
    let (_doc, nodes) = children("<list><A/><B/><C/></list>");
    let mut seen = Vec::new();
    assert!(!for_each_node(nodes, stop_at("B", &mut seen)));
    assert_eq!(seen, vec!["A", "B"]);
}

#[test]
fn element_filter_skips_leading_text() {
    let (_doc, nodes) = children("<list>text<E1/><E2/></list>");
    assert_eq!(nodes[0].node_type(), NodeType::Text);

    let mut seen = Vec::new();
    let completed = for_each_element(nodes, |e| {
        seen.push(e.tag_name());
        ControlFlow::Continue(())
    });
    assert!(completed);
    assert_eq!(seen, vec!["E1", "E2"]);
}

#[test]
fn filters_share_order_and_stop_semantics() {
    let xml = "<list>a<X/>b<Y/>c<Z/></list>";

    let (_doc, nodes) = children(xml);
    let mut all = Vec::new();
    assert!(!for_each_node(nodes, stop_at("Y", &mut all)));
    assert_eq!(all, vec!["#text", "X", "#text", "Y"]);

    let (_doc, nodes) = children(xml);
    let mut only_elements = Vec::new();
    assert!(!for_each_element(nodes, |e| stop_at("Y", &mut only_elements)(e.as_node())));
    assert_eq!(only_elements, vec!["X", "Y"]);
}

#[test]
fn sub_variants_walk_children() {
    let doc = Document::parse_str(
        r#"<menu><item id="open"/><!--sep--><item id="save"/><item id="quit"/></menu>"#,
    )
    .unwrap();
    let menu = doc.document_element().unwrap().as_node();

    let mut count = 0;
    assert!(for_each_sub_node(&menu, |_| {
        count += 1;
        ControlFlow::Continue(())
    }));
    assert_eq!(count, 4);

    let mut found = None;
    let completed = for_each_sub_element(&menu, |item| {
        if get_string_attribute(&item, "id", "") == "save" {
            found = Some(item);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    });
    assert!(!completed);
    assert_eq!(found.map(|e| e.tag_name()), Some("item".to_string()));
}

#[test]
fn visitor_may_grow_the_list() {
    let doc = Document::parse_str("<queue><job/></queue>").unwrap();
    let queue = doc.document_element().unwrap();

    let mut visited = 0;
    let completed = for_each_sub_element(&queue.as_node(), |_| {
        visited += 1;
        if visited < 3 {
            let next = doc.create_element("job").unwrap();
            queue.append_child(&next.as_node()).unwrap();
        }
        ControlFlow::Continue(())
    });
    assert!(completed);
    assert_eq!(visited, 3);
}

#[test]
fn mask_selects_node_kinds() {
    let (_doc, nodes) = children("<r><!--one-->t<e/><!--two--></r>");
    let mut comments = Vec::new();
    assert!(for_each_node_of_type(nodes, NodeMask::COMMENT, |n| {
        comments.push(n.node_value().unwrap().to_string());
        ControlFlow::Continue(())
    }));
    assert_eq!(comments, vec!["one", "two"]);
}

#[test]
fn child_elements_can_restart() {
    let doc = Document::parse_str("<r><a/>x<b/></r>").unwrap();
    let root = doc.document_element().unwrap().as_node();
    let first: Vec<String> = child_elements(&root).map(|e| e.tag_name()).collect();
    let second: Vec<String> = child_elements(&root).map(|e| e.tag_name()).collect();
    assert_eq!(first, second);
    assert_eq!(first, vec!["a", "b"]);
}
