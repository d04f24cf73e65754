//! Tests for node store navigation, attribute access and re-linking.

use sift_dom::{AttrValue, DomTree, Node, NodeId, NodeKind, Renderer};

/// Helper to create and link an element node.
fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.alloc(Node::new(NodeKind::Element, tag));
    tree.link(parent, id);
    id
}

/// Helper to create and link a leaf node.
fn leaf(tree: &mut DomTree, parent: NodeId, kind: NodeKind, text: &str) -> NodeId {
    let id = tree.alloc(Node::leaf(kind, text));
    tree.link(parent, id);
    id
}

/// Builds `<ul><li>a</li><!--c--><li>b</li><li>c</li></ul>` by hand.
fn list_tree() -> (DomTree, NodeId, [NodeId; 3]) {
    let mut tree = DomTree::new();
    let ul = element(&mut tree, NodeId::ROOT, "ul");
    let first = element(&mut tree, ul, "li");
    let _ = leaf(&mut tree, first, NodeKind::Text, "a");
    let _ = leaf(&mut tree, ul, NodeKind::Comment, "<!--c-->");
    let second = element(&mut tree, ul, "li");
    let _ = leaf(&mut tree, second, NodeKind::Text, "b");
    let third = element(&mut tree, ul, "li");
    let _ = leaf(&mut tree, third, NodeKind::Text, "c");
    (tree, ul, [first, second, third])
}

// ========== navigation ==========

#[test]
fn test_children_are_elements_only() {
    let (tree, ul, items) = list_tree();
    assert_eq!(tree.children(ul), &items);
    assert_eq!(tree.child_nodes(ul).len(), 4);
    assert!(tree.has_child_nodes(ul));
    assert!(!tree.has_child_nodes(items[0]));
}

#[test]
fn test_first_last_and_indexed_child() {
    let (tree, ul, items) = list_tree();
    assert_eq!(tree.first_child(ul), Some(items[0]));
    assert_eq!(tree.last_child(ul), Some(items[2]));
    assert_eq!(tree.child(ul, 1), Some(items[1]));
    assert_eq!(tree.child(ul, 3), None);
}

#[test]
fn test_siblings_skip_comments() {
    let (tree, _, items) = list_tree();
    assert_eq!(tree.next_sibling(items[0]), Some(items[1]));
    assert_eq!(tree.previous_sibling(items[1]), Some(items[0]));
    assert_eq!(tree.previous_sibling(items[0]), None);
    assert_eq!(tree.next_sibling(items[2]), None);
    assert_eq!(tree.next_sibling(NodeId::ROOT), None);
}

#[test]
fn test_find_ancestor_tag_includes_self() {
    let (tree, ul, items) = list_tree();
    assert_eq!(tree.find_ancestor_tag(items[1], "li"), Some(items[1]));
    assert_eq!(tree.find_ancestor_tag(items[1], "ul"), Some(ul));
    assert_eq!(tree.find_ancestor_tag(items[1], "root"), Some(NodeId::ROOT));
    assert_eq!(tree.find_ancestor_tag(items[1], "table"), None);
}

#[test]
fn test_ancestors_walk_to_root() {
    let (tree, ul, items) = list_tree();
    let chain: Vec<NodeId> = tree.ancestors(items[2]).collect();
    assert_eq!(chain, vec![ul, NodeId::ROOT]);
    assert_eq!(tree.node_name(ul), Some("ul"));
}

// ========== sequence ranges ==========

#[test]
fn test_root_begins_before_zero() {
    assert_eq!(NodeId::ROOT.begin(), -1);
    assert_eq!(NodeId(4).begin(), 4);
}

#[test]
fn test_scan_end_uses_recorded_end() {
    let (mut tree, ul, _) = list_tree();
    tree.get_mut(ul).unwrap().end = 9;
    assert_eq!(tree.scan_end(ul), 9);
}

#[test]
fn test_scan_end_follows_last_descendant_when_unclosed() {
    let (tree, ul, items) = list_tree();
    // the last li's text node is the final node created
    assert_eq!(tree.scan_end(ul), tree.len());
    assert_eq!(tree.scan_end(items[0]), items[0].0 + 2);
}

// ========== attributes ==========

#[test]
fn test_attribute_get_set_has_remove() {
    let (mut tree, ul, _) = list_tree();
    tree.set_attr(ul, "id", AttrValue::from("menu"));
    tree.set_attr(ul, "hidden", AttrValue::Flag);

    let node = tree.get(ul).unwrap();
    assert_eq!(node.get_attr("id"), Some("menu"));
    assert_eq!(node.get_attr("hidden"), Some(""));
    assert!(node.has_attr("hidden"));
    assert!(!node.has_attr("class"));

    tree.remove_attr(ul, "hidden");
    assert!(!tree.get(ul).unwrap().has_attr("hidden"));
}

#[test]
fn test_set_existing_attribute_keeps_position() {
    let (mut tree, ul, _) = list_tree();
    tree.set_attr(ul, "a", AttrValue::from("1"));
    tree.set_attr(ul, "b", AttrValue::from("2"));
    tree.set_attr(ul, "a", AttrValue::from("3"));
    let names: Vec<&str> = tree
        .get(ul)
        .unwrap()
        .attributes
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(tree.get(ul).unwrap().get_attr("a"), Some("3"));
}

// ========== overrides and re-linking ==========

#[test]
fn test_inner_and_outer_overrides() {
    let (mut tree, ul, items) = list_tree();
    tree.set_inner_text(items[0], "x");
    tree.set_outer_text(items[2], "<hr>");
    let text_node = tree.child_nodes(items[1])[0];
    tree.set_inner_text(text_node, "B");

    let html = Renderer::new(&tree).outer_text(ul);
    assert_eq!(html, "<ul><li>x<!--c--><li>B<hr>");
}

#[test]
fn test_append_child_moves_node() {
    let (mut tree, ul, items) = list_tree();
    let moved = tree.append_child(items[0], items[2]);
    assert_eq!(moved, items[2]);
    assert_eq!(tree.children(ul), &[items[0], items[1]]);
    assert_eq!(tree.children(items[0]), &[items[2]]);
    assert_eq!(tree.parent(items[2]), Some(items[0]));
}

#[test]
fn test_append_child_rejects_cycles() {
    let (mut tree, ul, items) = list_tree();
    let _ = tree.append_child(items[0], ul);
    assert_eq!(tree.parent(ul), Some(NodeId::ROOT));
    assert_eq!(tree.children(items[0]), &[] as &[NodeId]);
}
