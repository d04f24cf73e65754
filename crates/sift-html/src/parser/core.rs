use strum_macros::Display;

use sift_common::warning::warn_once;
use sift_dom::{DomTree, Node, NodeId, NodeKind, NoiseTable};

use super::tags;
use crate::options::ParseOptions;
use crate::scanner::{BLANK, SLASH, Scanner};

/// The kinds of malformed markup the tree builder recovers from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RecoveryKind {
    /// A `<` inside a tag name or attribute name; the tag so far became text.
    #[strum(serialize = "stray '<' inside a tag")]
    StrayOpenBracket,
    /// A `<` not followed by a valid tag name; the run became text.
    #[strum(serialize = "malformed tag name")]
    MalformedTagName,
    /// Input ended before `>`; the tag became text.
    #[strum(serialize = "unterminated tag")]
    UnterminatedTag,
    /// An end tag that closes nothing; it was kept as text.
    #[strum(serialize = "unmatched end tag")]
    UnmatchedEndTag,
    /// An end tag closed an ancestor, leaving open elements unclosed.
    #[strum(serialize = "end tag closed an ancestor")]
    BrokenClose,
}

/// One recovery performed while building the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What was wrong.
    pub kind: RecoveryKind,
    /// Byte offset of the offending `<` in the preprocessed input.
    pub offset: usize,
}

/// Outcome of reading an opening tag's attributes.
pub(super) enum TagEnd<'a> {
    /// Reached `>` or `/`; carries the whitespace seen after the last attribute.
    Closed(&'a str),
    /// Input ended inside the tag.
    Unterminated,
    /// A `<` appeared at this offset inside an attribute name.
    StrayBracket(usize),
}

/// Builds a node tree from noise-extracted input.
///
/// One call to [`Self::step`] produces a single node, or closes one element,
/// and advances the cursor. Malformed markup never stops the parse; it is
/// turned into text and recorded as a [`ParseIssue`].
pub struct HtmlParser<'a> {
    /// Cursor over the preprocessed input.
    pub(super) scanner: Scanner<'a>,

    /// Node store under construction. `NodeId::ROOT` is the document root.
    pub(super) tree: DomTree,

    /// The innermost open element; new nodes are linked under it.
    pub(super) parent: NodeId,

    /// Settings for this parse.
    pub(super) options: &'a ParseOptions,

    /// Recoveries performed so far.
    issues: Vec<ParseIssue>,
}

impl<'a> HtmlParser<'a> {
    /// Create a parser over `doc`, which must already have had its noise
    /// extracted into `noise`.
    #[must_use]
    pub fn new(doc: &'a str, noise: NoiseTable, options: &'a ParseOptions) -> Self {
        Self {
            scanner: Scanner::new(doc),
            tree: DomTree::with_noise(noise),
            parent: NodeId::ROOT,
            options,
            issues: Vec::new(),
        }
    }

    /// Run the parser to completion and return the tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser to completion and return the tree together with every
    /// recovery that was needed.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        while self.step() {}
        tracing::debug!(
            nodes = self.tree.len(),
            issues = self.issues.len(),
            "built tree"
        );
        (self.tree, self.issues)
    }

    /// Produce one node or close one element. Returns false at end of input,
    /// after closing the root.
    pub fn step(&mut self) -> bool {
        let start = self.scanner.pos();
        let text = self.scanner.copy_until_char(b'<');
        if !text.is_empty() {
            let _ = self.push_leaf(NodeKind::Text, text, start);
            return true;
        }
        self.read_tag()
    }

    fn read_tag(&mut self) -> bool {
        if self.scanner.current() != Some(b'<') {
            let end = self.tree.len();
            self.set_end(NodeId::ROOT, end);
            return false;
        }

        let tag_start = self.scanner.pos();
        self.scanner.advance();

        if self.scanner.current() == Some(b'/') {
            self.read_end_tag(tag_start);
            return true;
        }

        let name = self.scanner.copy_until(SLASH);

        // doctype, cdata & comments
        if name.starts_with('!') {
            let _ = self.scanner.copy_until_char(b'>');
            self.scanner.advance();
            let kind = if name.starts_with("!--") {
                NodeKind::Comment
            } else {
                NodeKind::Unknown
            };
            let raw = self.scanner.slice(tag_start, self.scanner.pos());
            let _ = self.push_leaf(kind, raw, tag_start);
            return true;
        }

        if let Some(idx) = name.find('<') {
            self.demote_before(tag_start, tag_start + 1 + idx);
            return true;
        }

        if !tags::is_tag_name(name) {
            let _ = self.scanner.copy_until(b"<>");
            if self.scanner.current() == Some(b'>') {
                self.scanner.advance();
            }
            self.demote(tag_start, RecoveryKind::MalformedTagName);
            return true;
        }

        self.read_element(tag_start, name);
        true
    }

    fn read_element(&mut self, tag_start: usize, name: &str) {
        let tag_lower = name.to_ascii_lowercase();
        let tag = if self.options.case_insensitive_tags {
            tag_lower.clone()
        } else {
            name.to_string()
        };

        if self.options.force_tags_closed && tags::is_optional_closing(&tag_lower) {
            while tags::closes(&tag_lower, &self.parent_tag_lower()) {
                let Some(grandparent) = self.tree.parent(self.parent) else {
                    break;
                };
                self.set_end(self.parent, 0);
                self.parent = grandparent;
            }
        }

        let mut node = Node::new(NodeKind::Element, tag);
        node.tag_offset = tag_start;

        let lead = match self.read_attributes(&mut node) {
            TagEnd::Closed(lead) => lead,
            TagEnd::Unterminated => {
                self.demote_to_end(tag_start);
                return;
            }
            TagEnd::StrayBracket(at) => {
                self.demote_before(tag_start, at);
                return;
            }
        };

        let rest = self.scanner.copy_until_char_escaped(b'>');
        if self.scanner.at_end() {
            self.demote_to_end(tag_start);
            return;
        }
        let self_closed = rest.trim_end_matches([' ', '\t', '\r', '\n']) == "/";
        node.end_space = format!("{lead}{rest}");
        self.scanner.advance();

        if tag_lower == "br" {
            node.inner_override = Some(self.options.break_text.clone());
        }

        let id = self.tree.alloc(node);
        self.tree.link(self.parent, id);
        if !self_closed && !tags::is_self_closing(&tag_lower) {
            self.parent = id;
        }
    }

    fn read_end_tag(&mut self, tag_start: usize) {
        // consume '/'
        self.scanner.advance();
        self.scanner.skip(BLANK);
        let raw_name = self.scanner.copy_until_char(b'>');
        if self.scanner.at_end() {
            self.demote_to_end(tag_start);
            return;
        }

        // ignore attributes in end tag
        let name = raw_name
            .split(|c: char| c.is_ascii_whitespace())
            .next()
            .unwrap_or_default();
        let tag_lower = name.to_ascii_lowercase();

        if self.parent_tag_lower() != tag_lower && !self.close_mismatched(&tag_lower) {
            self.keep_end_tag_as_text(tag_start);
            return;
        }

        let end = self.tree.len();
        self.set_end(self.parent, end);
        if let Some(grandparent) = self.tree.parent(self.parent) {
            self.parent = grandparent;
        }
        self.scanner.advance();
    }

    /// Resolve an end tag that does not match the current parent.
    ///
    /// On success the element to close is left in `self.parent`. On failure
    /// the caller keeps the end tag as text under whatever parent is current.
    fn close_mismatched(&mut self, tag_lower: &str) -> bool {
        let original = self.parent;
        let grandparent = self.tree.parent(original);

        if tags::is_optional_closing(&self.parent_tag_lower()) && tags::is_block(tag_lower) {
            self.set_end(original, 0);
            if let Some(found) = self.find_open(tag_lower) {
                self.parent = found;
                self.record(RecoveryKind::BrokenClose, self.tree_offset(original));
                return true;
            }
            self.parent = grandparent.unwrap_or(original);
            return false;
        }

        if grandparent.is_some() && tags::is_block(tag_lower) {
            self.set_end(original, 0);
            if let Some(found) = self.find_open(tag_lower) {
                self.parent = found;
                self.record(RecoveryKind::BrokenClose, self.tree_offset(original));
                return true;
            }
            self.parent = original;
            return false;
        }

        if let Some(grandparent) = grandparent
            && self.tag_lower(grandparent) == tag_lower
        {
            self.set_end(original, 0);
            self.parent = grandparent;
            self.record(RecoveryKind::BrokenClose, self.tree_offset(original));
            return true;
        }

        false
    }

    /// Closest open element (starting at the current parent) named `tag_lower`.
    fn find_open(&self, tag_lower: &str) -> Option<NodeId> {
        std::iter::once(self.parent)
            .chain(self.tree.ancestors(self.parent))
            .find(|&id| self.tag_lower(id) == tag_lower)
    }

    fn keep_end_tag_as_text(&mut self, tag_start: usize) {
        self.scanner.advance();
        self.demote(tag_start, RecoveryKind::UnmatchedEndTag);
    }

    // ===== Node helpers =====

    pub(super) fn push_leaf(&mut self, kind: NodeKind, text: &str, offset: usize) -> NodeId {
        let mut node = Node::leaf(kind, text);
        node.tag_offset = offset;
        let id = self.tree.alloc(node);
        self.tree.link(self.parent, id);
        id
    }

    /// Emit everything from `start` up to the cursor as text.
    fn demote(&mut self, start: usize, kind: RecoveryKind) {
        let raw = self.scanner.slice(start, self.scanner.pos());
        let _ = self.push_leaf(NodeKind::Text, raw, start);
        self.record(kind, start);
    }

    /// Emit everything from `start` to the end of input as text.
    fn demote_to_end(&mut self, start: usize) {
        self.demote(start, RecoveryKind::UnterminatedTag);
    }

    /// Emit `start..at` as text and resume scanning at the stray `<` at `at`.
    fn demote_before(&mut self, start: usize, at: usize) {
        let raw = self.scanner.slice(start, at);
        self.scanner.rewind(at);
        let _ = self.push_leaf(NodeKind::Text, raw, start);
        self.record(RecoveryKind::StrayOpenBracket, start);
    }

    fn set_end(&mut self, id: NodeId, end: usize) {
        if let Some(node) = self.tree.get_mut(id) {
            node.end = end;
        }
    }

    fn tag_lower(&self, id: NodeId) -> String {
        self.tree
            .get(id)
            .map(|n| n.tag.to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn parent_tag_lower(&self) -> String {
        self.tag_lower(self.parent)
    }

    fn tree_offset(&self, id: NodeId) -> usize {
        self.tree.get(id).map_or(0, |n| n.tag_offset)
    }

    fn record(&mut self, kind: RecoveryKind, offset: usize) {
        warn_once("HTML Parser", &kind.to_string());
        self.issues.push(ParseIssue { kind, offset });
    }
}
