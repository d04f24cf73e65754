//! Tree construction.

/// The tree builder state machine.
pub mod core;
mod helpers;
/// Tag classification tables.
pub mod tags;

pub use self::core::{HtmlParser, ParseIssue, RecoveryKind};

use sift_dom::{AttrValue, DomTree, NodeId, NodeKind};
use std::fmt::Write;

/// Render an indented outline of the subtree at `id`.
///
/// Elements show their attributes and sequence range; text shows spaces as
/// `·` so whitespace-only runs are visible.
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, 0, &mut out);
    out
}

/// Print the outline produced by [`dump_tree`] to stdout.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    write_node(tree, id, indent, &mut out);
    print!("{out}");
}

fn write_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let prefix = "  ".repeat(indent);
    match node.kind {
        NodeKind::Root => {
            let _ = writeln!(out, "{prefix}root [{}..{}]", id.begin(), node.end);
        }
        NodeKind::Element => {
            let attrs: Vec<String> = node
                .attributes
                .iter()
                .map(|a| match &a.value {
                    AttrValue::Flag => a.name.clone(),
                    AttrValue::Text(v) => format!("{}=\"{v}\"", a.name),
                })
                .collect();
            let open = if attrs.is_empty() {
                format!("<{}>", node.tag)
            } else {
                format!("<{} {}>", node.tag, attrs.join(" "))
            };
            let _ = writeln!(out, "{prefix}{open} [{}..{}]", id.0, node.end);
        }
        NodeKind::Text => {
            let text = tree.noise().restore(node.text.as_deref().unwrap_or_default());
            let display = text.replace('\n', "\\n").replace(' ', "\u{00B7}");
            let _ = writeln!(out, "{prefix}\"{display}\"");
        }
        NodeKind::Comment | NodeKind::Unknown => {
            let text = tree.noise().restore(node.text.as_deref().unwrap_or_default());
            let _ = writeln!(out, "{prefix}{text}");
        }
    }
    for &child in &node.child_nodes {
        write_node(tree, child, indent + 1, out);
    }
}
