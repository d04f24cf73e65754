//! Integration tests for the tree builder.

use sift_dom::{AttrValue, DomTree, Node, NodeId, NodeKind, Quote, Renderer};
use sift_html::{ParseOptions, parse_document};

/// Helper to parse HTML with default options and return the node store
fn parse(html: &str) -> DomTree {
    parse_document(html, &ParseOptions::default()).tree
}

/// Helper to get a node reference
fn get_node(tree: &DomTree, id: NodeId) -> &Node {
    tree.get(id).expect("Node not found")
}

/// Helper to find the first node with the given tag, in sequence order
fn first_tag(tree: &DomTree, tag: &str) -> NodeId {
    tree.iter()
        .find(|(_, n)| n.tag == tag)
        .map(|(id, _)| id)
        .expect("tag not found")
}

/// Helper to render the whole document
fn render(tree: &DomTree) -> String {
    Renderer::new(tree).outer_text(NodeId::ROOT)
}

#[test]
fn test_document_structure() {
    let tree = parse("<div id='a'><p class='x y'>hi</p></div>");

    let root = get_node(&tree, NodeId::ROOT);
    assert_eq!(root.kind, NodeKind::Root);
    assert_eq!(root.tag, "root");
    assert_eq!(root.end, 4);

    let div = first_tag(&tree, "div");
    let p = first_tag(&tree, "p");
    assert_eq!(div, NodeId(1));
    assert_eq!(p, NodeId(2));
    assert_eq!(tree.children(NodeId::ROOT), &[div]);
    assert_eq!(tree.children(div), &[p]);
    assert_eq!(get_node(&tree, div).end, 4);
    assert_eq!(get_node(&tree, p).end, 4);

    let text = tree.child_nodes(p)[0];
    assert_eq!(get_node(&tree, text).kind, NodeKind::Text);
    assert_eq!(get_node(&tree, text).text.as_deref(), Some("hi"));
}

#[test]
fn test_empty_input_yields_root_only() {
    let tree = parse("");
    assert_eq!(tree.len(), 1);
    assert_eq!(get_node(&tree, NodeId::ROOT).end, 1);
    assert_eq!(render(&tree), "");
}

#[test]
fn test_text_only_input() {
    let tree = parse("just words");
    assert_eq!(tree.len(), 2);
    assert_eq!(render(&tree), "just words");
}

// ========== attributes ==========

#[test]
fn test_attribute_formatting_is_captured() {
    let tree = parse("<a  href = \"x\" title='t' data-n=3 checked>");
    let a = get_node(&tree, first_tag(&tree, "a"));

    let names: Vec<&str> = a.attributes.iter().map(|at| at.name.as_str()).collect();
    assert_eq!(names, vec!["href", "title", "data-n", "checked"]);

    let href = a.attribute("href").unwrap();
    assert_eq!(href.format.before_name, "  ");
    assert_eq!(href.format.before_eq, " ");
    assert_eq!(href.format.after_eq, " ");
    assert_eq!(href.format.quote, Quote::Double);

    assert_eq!(a.attribute("title").unwrap().format.quote, Quote::Single);
    assert_eq!(a.attribute("data-n").unwrap().format.quote, Quote::None);
    assert_eq!(a.get_attr("data-n"), Some("3"));
    assert_eq!(a.attribute("checked").unwrap().value, AttrValue::Flag);
}

#[test]
fn test_attribute_names_are_lowercased() {
    let tree = parse("<DIV ID=\"Main\"></DIV>");
    let div = get_node(&tree, first_tag(&tree, "div"));
    assert_eq!(div.get_attr("id"), Some("Main"));
    assert_eq!(render(&tree), "<div id=\"Main\"></div>");
}

#[test]
fn test_case_preserved_when_requested() {
    let options = ParseOptions::default().with_case_preserved();
    let tree = parse_document("<DIV ID=\"Main\"></DIV>", &options).tree;
    let div = get_node(&tree, first_tag(&tree, "DIV"));
    assert_eq!(div.get_attr("ID"), Some("Main"));
    assert_eq!(render(&tree), "<DIV ID=\"Main\"></DIV>");
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let tree = parse("<p id=\"one\" id=\"two\">x</p>");
    let p = get_node(&tree, first_tag(&tree, "p"));
    assert_eq!(p.attributes.len(), 1);
    assert_eq!(p.get_attr("id"), Some("one"));
}

#[test]
fn test_class_value_is_trimmed() {
    let tree = parse("<p class=\"  a b  \">x</p>");
    let p = get_node(&tree, first_tag(&tree, "p"));
    assert_eq!(p.get_attr("class"), Some("a b"));
}

#[test]
fn test_escaped_quote_in_value() {
    let tree = parse(r#"<p title="say \"hi\"">x</p>"#);
    let p = get_node(&tree, first_tag(&tree, "p"));
    assert_eq!(p.get_attr("title"), Some(r#"say \"hi\""#));
}

#[test]
fn test_boolean_attribute_whitespace_round_trips() {
    let html = "<input  disabled   checked >";
    assert_eq!(render(&parse(html)), html);
}

// ========== self-closing and br ==========

#[test]
fn test_self_closing_tags_do_not_nest() {
    let tree = parse("<img src='a.png'><p>x</p>");
    let img = first_tag(&tree, "img");
    assert_eq!(get_node(&tree, img).end, 0);
    assert_eq!(get_node(&tree, img).get_attr("src"), Some("a.png"));
    assert!(tree.child_nodes(img).is_empty());
    assert_eq!(tree.parent(first_tag(&tree, "p")), Some(NodeId::ROOT));
}

#[test]
fn test_explicit_self_closing_slash() {
    let tree = parse("<div/><span>x</span>");
    let div = first_tag(&tree, "div");
    assert_eq!(get_node(&tree, div).end, 0);
    assert_eq!(get_node(&tree, div).end_space, "/");
    assert_eq!(tree.parent(first_tag(&tree, "span")), Some(NodeId::ROOT));
    assert_eq!(render(&tree), "<div/><span>x</span>");
}

#[test]
fn test_br_carries_break_text() {
    let tree = parse("a<BR>b");
    let br = first_tag(&tree, "br");
    assert_eq!(get_node(&tree, br).inner_override.as_deref(), Some("\r\n"));
    let renderer = Renderer::new(&tree);
    assert_eq!(renderer.outer_text(NodeId::ROOT), "a<br>b");
    assert_eq!(renderer.plain_text(NodeId::ROOT), "a\r\nb");
}

#[test]
fn test_custom_break_text() {
    let options = ParseOptions::default().with_break_text("\n");
    let tree = parse_document("a<br/>b", &options).tree;
    assert_eq!(Renderer::new(&tree).plain_text(NodeId::ROOT), "a\nb");
}

// ========== optional closing ==========

#[test]
fn test_li_closes_previous_li() {
    let tree = parse("<ul><li>a<li>b</ul>");
    let ul = first_tag(&tree, "ul");
    let items = tree.children(ul).to_vec();
    assert_eq!(items.len(), 2);
    assert_eq!(get_node(&tree, items[0]).end, 0);
    assert_eq!(get_node(&tree, items[1]).end, 0);
    assert_eq!(get_node(&tree, ul).end, tree.len());
    assert_eq!(render(&tree), "<ul><li>a<li>b</ul>");
}

#[test]
fn test_td_and_tr_close_cells() {
    let tree = parse("<table><tr><td>1<td>2<tr><td>3</table>");
    let table = first_tag(&tree, "table");
    let rows = tree.children(table).to_vec();
    assert_eq!(rows.len(), 2);
    assert_eq!(tree.children(rows[0]).len(), 2);
    assert_eq!(tree.children(rows[1]).len(), 1);
    assert_ne!(get_node(&tree, table).end, 0);
}

#[test]
fn test_trusted_markup_does_not_close_implicitly() {
    let options = ParseOptions::default().with_markup_trusted();
    let tree = parse_document("<ul><li>a<li>b</li></li></ul>", &options).tree;
    let first = first_tag(&tree, "li");
    assert_eq!(tree.children(first).len(), 1);
    assert_ne!(get_node(&tree, first).end, 0);
}

// ========== markup declarations and noise ==========

#[test]
fn test_doctype_is_unknown_leaf() {
    let tree = parse("<!DOCTYPE html><html></html>");
    let doctype = tree.child_nodes(NodeId::ROOT)[0];
    assert_eq!(get_node(&tree, doctype).kind, NodeKind::Unknown);
    assert_eq!(get_node(&tree, doctype).tag, "unknown");
    assert_eq!(tree.children(NodeId::ROOT).len(), 1);
}

#[test]
fn test_comment_is_leaf_not_child() {
    let tree = parse("<!-- c --><p>x</p>");
    let comment = tree.child_nodes(NodeId::ROOT)[0];
    assert_eq!(get_node(&tree, comment).kind, NodeKind::Comment);
    assert_eq!(tree.children(NodeId::ROOT), &[first_tag(&tree, "p")]);
    assert_eq!(render(&tree), "<!-- c --><p>x</p>");
}

#[test]
fn test_script_body_is_not_tokenized() {
    let html = "<script>if (a < b && c > d) { x('</p>'); }</script><p>y</p>";
    let tree = parse(html);
    let script = first_tag(&tree, "script");
    assert_eq!(tree.child_nodes(script).len(), 1);
    assert_eq!(tree.children(NodeId::ROOT).len(), 2);
    assert_eq!(render(&tree), html);
    assert_eq!(Renderer::new(&tree).plain_text(NodeId::ROOT), "y");
}

#[test]
fn test_noise_in_attribute_is_restored() {
    let tree = parse("<a title=\"{name}\">x</a>");
    let a = get_node(&tree, first_tag(&tree, "a"));
    assert_eq!(a.get_attr("title"), Some("{name}"));
}

#[test]
fn test_line_breaks_become_spaces() {
    let parsed = parse_document("<p>\r\na</p>", &ParseOptions::default());
    assert_eq!(parsed.original_size, 10);
    assert_eq!(parsed.size, 10);
    assert_eq!(render(&parsed.tree), "<p>  a</p>");

    let kept = parse_document("<p>\na</p>", &ParseOptions::default().with_line_breaks_kept());
    assert_eq!(render(&kept.tree), "<p>\na</p>");
}

#[test]
fn test_tag_offsets_point_at_open_bracket() {
    let tree = parse("ab<p>x</p>");
    let p = first_tag(&tree, "p");
    assert_eq!(get_node(&tree, p).tag_offset, 2);
}
