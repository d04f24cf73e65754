//! Markup and text reconstruction.
//!
//! Rendering replays what the tree builder recorded: literal text for leaves,
//! and for elements the tag name, the attributes with their captured
//! whitespace and quotes, the children, and a closing tag when one was seen.
//! Noise placeholders are restored on the way out.

use crate::{DomTree, NodeId, NodeKind};

/// Character-set conversion hook applied to each rendered child fragment.
pub type Converter = dyn Fn(&str) -> String + Send + Sync;

/// Default text appended after `span` elements in plain text.
pub const DEFAULT_SPAN_SEPARATOR: &str = " ";

/// Renders nodes of one [`DomTree`].
#[derive(Clone, Copy)]
pub struct Renderer<'a> {
    tree: &'a DomTree,
    span_separator: &'a str,
    convert: Option<&'a Converter>,
}

impl<'a> Renderer<'a> {
    /// Create a renderer with the default span separator and no conversion.
    #[must_use]
    pub const fn new(tree: &'a DomTree) -> Self {
        Self {
            tree,
            span_separator: DEFAULT_SPAN_SEPARATOR,
            convert: None,
        }
    }

    /// Use `separator` after `span` elements in plain text.
    #[must_use]
    pub const fn with_span_separator(mut self, separator: &'a str) -> Self {
        self.span_separator = separator;
        self
    }

    /// Pass each child fragment through `convert`.
    #[must_use]
    pub const fn with_converter(mut self, convert: Option<&'a Converter>) -> Self {
        self.convert = convert;
        self
    }

    /// The tree being rendered.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    fn convert(&self, text: String) -> String {
        match self.convert {
            Some(convert) => convert(&text),
            None => text,
        }
    }

    /// Markup between the node's opening and closing tags.
    #[must_use]
    pub fn inner_text(&self, id: NodeId) -> String {
        let Some(node) = self.tree.get(id) else {
            return String::new();
        };
        if let Some(inner) = &node.inner_override {
            return inner.clone();
        }
        if let Some(text) = &node.text {
            return self.tree.noise().restore(text);
        }
        node.child_nodes
            .iter()
            .map(|&child| self.outer_text(child))
            .collect()
    }

    /// The node's complete markup.
    #[must_use]
    pub fn outer_text(&self, id: NodeId) -> String {
        let Some(node) = self.tree.get(id) else {
            return String::new();
        };
        if node.kind == NodeKind::Root {
            return self.inner_text(id);
        }
        if let Some(outer) = &node.outer_override {
            return outer.clone();
        }
        if let Some(text) = &node.text {
            return self.tree.noise().restore(text);
        }

        let mut out = self.opening_tag(id);
        match &node.inner_override {
            // br carries its break text as inner content for plain text only
            Some(_) if node.tag.eq_ignore_ascii_case("br") => {}
            Some(inner) => out.push_str(inner),
            None => {
                for &child in &node.child_nodes {
                    out.push_str(&self.convert(self.outer_text(child)));
                }
            }
        }
        if node.end != 0 {
            out.push_str("</");
            out.push_str(&node.tag);
            out.push('>');
        }
        out
    }

    /// The node's opening tag, or its literal text for leaves.
    #[must_use]
    pub fn opening_tag(&self, id: NodeId) -> String {
        let Some(node) = self.tree.get(id) else {
            return String::new();
        };
        if let Some(text) = &node.text {
            return self.tree.noise().restore(text);
        }
        let mut out = String::from("<");
        out.push_str(&node.tag);
        for attr in &node.attributes {
            attr.write_markup(&mut out);
        }
        let mut out = self.tree.noise().restore(&out);
        out.push_str(&node.end_space);
        out.push('>');
        out
    }

    /// Text content with all markup removed.
    ///
    /// Comments, unknown constructs, `script` and `style` contribute nothing.
    #[must_use]
    pub fn plain_text(&self, id: NodeId) -> String {
        let Some(node) = self.tree.get(id) else {
            return String::new();
        };
        if let Some(inner) = &node.inner_override {
            return inner.clone();
        }
        match node.kind {
            NodeKind::Text => {
                return node
                    .text
                    .as_deref()
                    .map(|text| self.tree.noise().restore(text))
                    .unwrap_or_default();
            }
            NodeKind::Comment | NodeKind::Unknown => return String::new(),
            NodeKind::Root | NodeKind::Element => {}
        }
        if node.tag.eq_ignore_ascii_case("script") || node.tag.eq_ignore_ascii_case("style") {
            return String::new();
        }

        let mut out = String::new();
        for &child in &node.child_nodes {
            out.push_str(&self.convert(self.plain_text(child)));
        }
        if node.tag == "span" {
            out.push_str(self.span_separator);
        }
        out
    }

    /// Inner markup with CDATA delimiters removed.
    #[must_use]
    pub fn xml_text(&self, id: NodeId) -> String {
        remove_ignore_case(&self.inner_text(id), "<![cdata[").replace("]]>", "")
    }
}

/// Remove every ASCII-case-insensitive occurrence of a lowercase `needle`.
fn remove_ignore_case(text: &str, needle: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `text`
    let folded = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in folded.match_indices(needle) {
        out.push_str(&text[last..start]);
        last = start + needle.len();
    }
    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttrValue, Node};

    fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
        let id = tree.alloc(Node::new(NodeKind::Element, tag));
        tree.link(parent, id);
        id
    }

    fn text(tree: &mut DomTree, parent: NodeId, value: &str) -> NodeId {
        let id = tree.alloc(Node::leaf(NodeKind::Text, value));
        tree.link(parent, id);
        id
    }

    #[test]
    fn test_unclosed_element_has_no_end_tag() {
        let mut tree = DomTree::new();
        let p = element(&mut tree, NodeId::ROOT, "p");
        let _ = text(&mut tree, p, "hi");
        assert_eq!(Renderer::new(&tree).outer_text(p), "<p>hi");

        tree.get_mut(p).unwrap().end = 3;
        assert_eq!(Renderer::new(&tree).outer_text(p), "<p>hi</p>");
    }

    #[test]
    fn test_span_separator() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, NodeId::ROOT, "span");
        let _ = text(&mut tree, a, "a");
        let b = element(&mut tree, NodeId::ROOT, "span");
        let _ = text(&mut tree, b, "b");
        assert_eq!(Renderer::new(&tree).plain_text(NodeId::ROOT), "a b ");
        assert_eq!(
            Renderer::new(&tree)
                .with_span_separator("|")
                .plain_text(NodeId::ROOT),
            "a|b|"
        );
    }

    #[test]
    fn test_converter_applies_to_children() {
        let mut tree = DomTree::new();
        let p = element(&mut tree, NodeId::ROOT, "p");
        let _ = text(&mut tree, p, "abc");
        let upper: &Converter = &|s: &str| s.to_uppercase();
        let renderer = Renderer::new(&tree).with_converter(Some(upper));
        assert_eq!(renderer.outer_text(p), "<p>ABC");
    }

    #[test]
    fn test_xml_text_strips_cdata() {
        let mut tree = DomTree::new();
        let s = element(&mut tree, NodeId::ROOT, "data");
        let _ = text(&mut tree, s, "<![cdata[x < y]]>");
        assert_eq!(Renderer::new(&tree).xml_text(s), "x < y");
    }

    #[test]
    fn test_set_attr_renders_double_quoted() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, NodeId::ROOT, "a");
        tree.set_attr(a, "href", AttrValue::from("/x"));
        tree.set_attr(a, "hidden", AttrValue::Flag);
        assert_eq!(Renderer::new(&tree).opening_tag(a), "<a href=\"/x\" hidden>");
    }
}
