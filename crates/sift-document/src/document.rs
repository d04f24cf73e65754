//! The document facade.
//!
//! A [`Document`] owns the node store produced by one parse, the options it
//! was parsed with and an optional conversion hook. Read-only access to a
//! single node goes through the borrowed [`NodeRef`] handle; edits go through
//! the document itself.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use sift_common::{LoadError, source};
use sift_dom::{AttrValue, Attribute, Converter, DomTree, Node, NodeId, NodeKind, Renderer};
use sift_html::{ParseIssue, ParseOptions, dump_tree, parse_document};
use sift_select::{MatchOptions, compile, find};

use crate::charset;
use crate::size::{DisplaySize, display_size};
use crate::summary::NodeSummary;

/// A parsed HTML document.
#[derive(Clone)]
pub struct Document {
    tree: DomTree,
    options: ParseOptions,
    issues: Vec<ParseIssue>,
    charset: String,
    original_size: usize,
    size: usize,
    converter: Option<Arc<Converter>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.tree.len())
            .field("options", &self.options)
            .field("issues", &self.issues.len())
            .field("charset", &self.charset)
            .field("original_size", &self.original_size)
            .field("size", &self.size)
            .field("converter", &self.converter.is_some())
            .finish()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ===== Construction =====

impl Document {
    /// Parse `html` with default options.
    ///
    /// Never fails; an empty string yields a document holding only the root.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self::parse_with(html, ParseOptions::default())
    }

    /// Parse `html` with the given options.
    #[must_use]
    pub fn parse_with(html: &str, options: ParseOptions) -> Self {
        Self::build(html, options, true)
    }

    /// Parse raw bytes. Invalid UTF-8 sequences are replaced, and the
    /// charset falls back to Windows-1252 when no meta tag names one.
    #[must_use]
    pub fn parse_bytes(bytes: &[u8], options: ParseOptions) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let valid_utf8 = matches!(text, Cow::Borrowed(_));
        Self::build(&text, options, valid_utf8)
    }

    /// Read and parse a local file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read and
    /// [`LoadError::Empty`] if it is empty.
    pub fn from_file(path: &str, options: ParseOptions) -> Result<Self, LoadError> {
        Ok(Self::parse_bytes(&source::read_file(path)?, options))
    }

    /// Fetch and parse a remote document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Http`] or [`LoadError::Status`] when the request
    /// fails and [`LoadError::Empty`] when the body is empty.
    pub fn from_url(url: &str, options: ParseOptions) -> Result<Self, LoadError> {
        Ok(Self::parse_bytes(&source::read_url(url)?, options))
    }

    /// Load from a URL or a file path, whichever `source` looks like.
    ///
    /// # Errors
    ///
    /// See [`Self::from_file`] and [`Self::from_url`].
    pub fn load(source: &str, options: ParseOptions) -> Result<Self, LoadError> {
        Ok(Self::parse_bytes(&source::load_source(source)?, options))
    }

    fn build(html: &str, options: ParseOptions, valid_utf8: bool) -> Self {
        let parsed = parse_document(html, &options);
        let charset = charset::detect(&parsed.tree, valid_utf8);
        tracing::debug!(
            nodes = parsed.tree.len(),
            issues = parsed.issues.len(),
            size = parsed.size,
            "parsed document"
        );
        Self {
            tree: parsed.tree,
            options,
            issues: parsed.issues,
            charset,
            original_size: parsed.original_size,
            size: parsed.size,
            converter: None,
        }
    }
}

// ===== Accessors =====

impl Document {
    /// The node store.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The options this document was parsed with.
    #[must_use]
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Recoveries the parser performed.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// The detected source charset.
    #[must_use]
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Byte length of the input as given.
    #[must_use]
    pub const fn original_size(&self) -> usize {
        self.original_size
    }

    /// Byte length of the input after line-break stripping.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: NodeId::ROOT,
            node: self.tree.root_node(),
        }
    }

    /// A handle to node `id`, if it exists.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.tree.get(id).map(|node| NodeRef { doc: self, id, node })
    }

    /// Handles for a list of IDs, such as a query result.
    #[must_use]
    pub fn nodes(&self, ids: &[NodeId]) -> Vec<NodeRef<'_>> {
        ids.iter().filter_map(|&id| self.node(id)).collect()
    }

    /// The first extracted noise region containing `needle`, such as a
    /// script body.
    #[must_use]
    pub fn search_noise(&self, needle: &str) -> Option<&str> {
        self.tree.noise().search(needle)
    }

    /// A renderer configured with this document's span separator and
    /// conversion hook.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.tree)
            .with_span_separator(&self.options.span_separator)
            .with_converter(self.converter.as_deref())
    }

    /// Indented outline of the whole tree.
    #[must_use]
    pub fn dump(&self) -> String {
        dump_tree(&self.tree, NodeId::ROOT)
    }
}

// ===== Queries =====

impl Document {
    /// Every node matching `selector`, in document order.
    #[must_use]
    pub fn find(&self, selector: &str) -> Vec<NodeId> {
        self.root().find(selector)
    }

    /// Like [`Self::find`] with explicit match options.
    #[must_use]
    pub fn find_with(&self, selector: &str, options: MatchOptions) -> Vec<NodeId> {
        self.root().find_with(selector, options)
    }

    /// The `index`-th match; negative indices count from the end.
    #[must_use]
    pub fn find_nth(&self, selector: &str, index: isize) -> Option<NodeId> {
        self.root().find_nth(selector, index)
    }

    /// Like [`Self::find_nth`] with explicit match options.
    #[must_use]
    pub fn find_nth_with(
        &self,
        selector: &str,
        index: isize,
        options: MatchOptions,
    ) -> Option<NodeId> {
        self.root().find_nth_with(selector, index, options)
    }

    /// The first element whose `id` is `id`.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.root().element_by_id(id)
    }

    /// Every element whose `id` is `id`.
    #[must_use]
    pub fn elements_by_id(&self, id: &str) -> Vec<NodeId> {
        self.root().elements_by_id(id)
    }

    /// The first element named `tag`.
    #[must_use]
    pub fn element_by_tag_name(&self, tag: &str) -> Option<NodeId> {
        self.root().element_by_tag_name(tag)
    }

    /// Every element named `tag`.
    #[must_use]
    pub fn elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        self.root().elements_by_tag_name(tag)
    }
}

// ===== Rendering =====

impl Document {
    /// The whole document as markup.
    #[must_use]
    pub fn render(&self) -> String {
        self.renderer().outer_text(NodeId::ROOT)
    }

    /// Markup of node `id`, including its own tags.
    #[must_use]
    pub fn outer_text(&self, id: NodeId) -> String {
        self.renderer().outer_text(id)
    }

    /// Markup between node `id`'s tags.
    #[must_use]
    pub fn inner_text(&self, id: NodeId) -> String {
        self.renderer().inner_text(id)
    }

    /// Text content of node `id`.
    #[must_use]
    pub fn plain_text(&self, id: NodeId) -> String {
        self.renderer().plain_text(id)
    }

    /// Inner markup of node `id` with CDATA delimiters removed.
    #[must_use]
    pub fn xml_text(&self, id: NodeId) -> String {
        self.renderer().xml_text(id)
    }

    /// Write the rendered document to `path`.
    ///
    /// # Errors
    ///
    /// Returns any error from writing the file.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, self.render())
    }

    /// Pass every rendered fragment through `convert`, for example to
    /// transcode from [`Self::charset`].
    pub fn set_converter(&mut self, convert: impl Fn(&str) -> String + Send + Sync + 'static) {
        self.converter = Some(Arc::new(convert));
    }

    /// Render fragments unchanged again.
    pub fn clear_converter(&mut self) {
        self.converter = None;
    }
}

// ===== Editing =====

impl Document {
    /// Set attribute `name` on node `id` to a text value.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        self.tree.set_attr(id, name, AttrValue::Text(value.into()));
    }

    /// Set presence-only attribute `name` on node `id`.
    pub fn set_flag(&mut self, id: NodeId, name: &str) {
        self.tree.set_attr(id, name, AttrValue::Flag);
    }

    /// Remove attribute `name` from node `id`.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        self.tree.remove_attr(id, name);
    }

    /// Replace node `id`'s whole markup when rendered.
    pub fn set_outer_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.tree.set_outer_text(id, text);
    }

    /// Replace node `id`'s content when rendered.
    pub fn set_inner_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.tree.set_inner_text(id, text);
    }

    /// Move node `child` under `parent`. Returns `child`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        self.tree.append_child(parent, child)
    }
}

/// A borrowed handle to one node of a [`Document`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
    node: &'a Node,
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("tag", &self.node.tag)
            .finish()
    }
}

impl<'a> NodeRef<'a> {
    /// The node's ID.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The underlying node record.
    #[must_use]
    pub const fn node(&self) -> &'a Node {
        self.node
    }

    fn wrap(&self, id: Option<NodeId>) -> Option<Self> {
        self.doc.node(id?)
    }

    /// The node's kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.node.kind
    }

    /// The node's tag name.
    #[must_use]
    pub fn tag(&self) -> &'a str {
        &self.node.tag
    }

    // ===== Navigation =====

    /// The enclosing node.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.wrap(self.doc.tree.parent(self.id))
    }

    /// Immediate element children.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.doc.nodes(self.doc.tree.children(self.id))
    }

    /// The `idx`-th element child.
    #[must_use]
    pub fn child(&self, idx: usize) -> Option<Self> {
        self.wrap(self.doc.tree.child(self.id, idx))
    }

    /// Immediate nodes of every kind.
    #[must_use]
    pub fn child_nodes(&self) -> Vec<Self> {
        self.doc.nodes(self.doc.tree.child_nodes(self.id))
    }

    /// Returns true if the node has element children.
    #[must_use]
    pub fn has_child_nodes(&self) -> bool {
        self.doc.tree.has_child_nodes(self.id)
    }

    /// The first element child.
    #[must_use]
    pub fn first_child(&self) -> Option<Self> {
        self.wrap(self.doc.tree.first_child(self.id))
    }

    /// The last element child.
    #[must_use]
    pub fn last_child(&self) -> Option<Self> {
        self.wrap(self.doc.tree.last_child(self.id))
    }

    /// The next element sibling.
    #[must_use]
    pub fn next_sibling(&self) -> Option<Self> {
        self.wrap(self.doc.tree.next_sibling(self.id))
    }

    /// The previous element sibling.
    #[must_use]
    pub fn previous_sibling(&self) -> Option<Self> {
        self.wrap(self.doc.tree.previous_sibling(self.id))
    }

    /// The closest node named `tag`, starting with this one.
    #[must_use]
    pub fn find_ancestor_tag(&self, tag: &str) -> Option<Self> {
        self.wrap(self.doc.tree.find_ancestor_tag(self.id, tag))
    }

    // ===== Queries =====

    /// Matches of `selector` inside this node's subtree, in document order.
    #[must_use]
    pub fn find(&self, selector: &str) -> Vec<NodeId> {
        self.find_with(selector, MatchOptions::default())
    }

    /// Like [`Self::find`] with explicit match options.
    #[must_use]
    pub fn find_with(&self, selector: &str, options: MatchOptions) -> Vec<NodeId> {
        let compiled = compile(selector, self.doc.options.case_insensitive_tags);
        find(&self.doc.renderer(), self.id, &compiled, options)
    }

    /// The `index`-th match; negative indices count from the end.
    #[must_use]
    pub fn find_nth(&self, selector: &str, index: isize) -> Option<NodeId> {
        self.find_nth_with(selector, index, MatchOptions::default())
    }

    /// Like [`Self::find_nth`] with explicit match options.
    #[must_use]
    pub fn find_nth_with(
        &self,
        selector: &str,
        index: isize,
        options: MatchOptions,
    ) -> Option<NodeId> {
        nth(&self.find_with(selector, options), index)
    }

    /// The first element whose `id` is `id`.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_nth(&format!("#{id}"), 0)
    }

    /// Every element whose `id` is `id`.
    #[must_use]
    pub fn elements_by_id(&self, id: &str) -> Vec<NodeId> {
        self.find(&format!("#{id}"))
    }

    /// The first element named `tag`.
    #[must_use]
    pub fn element_by_tag_name(&self, tag: &str) -> Option<NodeId> {
        self.find_nth(tag, 0)
    }

    /// Every element named `tag`.
    #[must_use]
    pub fn elements_by_tag_name(&self, tag: &str) -> Vec<NodeId> {
        self.find(tag)
    }

    // ===== Attributes =====

    /// Attributes in source order.
    #[must_use]
    pub fn attributes(&self) -> &'a [Attribute] {
        &self.node.attributes
    }

    /// The value of attribute `name`; presence-only attributes read as `""`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.node.get_attr(name)
    }

    /// Returns true if attribute `name` is present.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.node.has_attr(name)
    }

    // ===== Text =====

    /// Markup including the node's own tags.
    #[must_use]
    pub fn outer_text(&self) -> String {
        self.doc.outer_text(self.id)
    }

    /// Markup between the node's tags.
    #[must_use]
    pub fn inner_text(&self) -> String {
        self.doc.inner_text(self.id)
    }

    /// Text content.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.doc.plain_text(self.id)
    }

    /// Inner markup with CDATA delimiters removed.
    #[must_use]
    pub fn xml_text(&self) -> String {
        self.doc.xml_text(self.id)
    }

    /// Tag name for elements, or the kind name for other nodes.
    #[must_use]
    pub fn node_name(&self) -> Option<&'a str> {
        self.doc.tree.node_name(self.id)
    }

    // ===== Inspection =====

    /// Displayed size for `img` elements.
    #[must_use]
    pub fn display_size(&self) -> Option<DisplaySize> {
        display_size(self.node)
    }

    /// A serializable description of the node.
    #[must_use]
    pub fn summary(&self) -> Option<NodeSummary> {
        NodeSummary::of(&self.doc.tree, self.id)
    }
}

/// Pick the `index`-th element; negative indices count from the end.
fn nth(found: &[NodeId], index: isize) -> Option<NodeId> {
    let position = if index < 0 {
        found.len().checked_sub(index.unsigned_abs())?
    } else {
        index.unsigned_abs()
    };
    found.get(position).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_positions() {
        let ids = [NodeId(3), NodeId(5), NodeId(9)];
        assert_eq!(nth(&ids, 0), Some(NodeId(3)));
        assert_eq!(nth(&ids, 2), Some(NodeId(9)));
        assert_eq!(nth(&ids, 3), None);
        assert_eq!(nth(&ids, -1), Some(NodeId(9)));
        assert_eq!(nth(&ids, -3), Some(NodeId(3)));
        assert_eq!(nth(&ids, -4), None);
        assert_eq!(nth(&[], -1), None);
    }
}
