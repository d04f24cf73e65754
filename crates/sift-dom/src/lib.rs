//! Node store for the sift HTML toolkit.
//!
//! A parsed document is a flat, append-only arena of [`Node`] records. A
//! node's index in the arena is also its *sequence number*: the order in which
//! the tree builder created it. Relationships are stored as [`NodeId`]
//! indices, so the tree has no reference cycles and the whole thing is
//! dropped in one go with its owner.
//!
//! # Sequence ranges
//!
//! Every element records the sequence counter observed when its end tag was
//! consumed in [`Node::end`]. Because nodes are appended in document order,
//! the indices strictly between an element's own index and its `end` are
//! exactly its descendants. Selector matching relies on this to scan a
//! subtree as a contiguous slice of the arena instead of walking pointers.
//! An `end` of `0` means the element was self-closing, was implicitly closed,
//! or was never closed; see [`DomTree::scan_end`].
//!
//! # Modules
//!
//! - [`attr`] - ordered attributes with the formatting needed to re-emit them
//! - [`noise`] - the placeholder table for extracted comments, scripts and
//!   other opaque regions
//! - [`render`] - inner, outer and plain text reconstruction

pub mod attr;
pub mod noise;
pub mod render;
mod tree;

pub use attr::{AttrFormat, AttrValue, Attribute, Quote};
pub use noise::NoiseTable;
pub use render::{Converter, Renderer};
pub use tree::{AncestorIterator, DomTree};

/// A type-safe index into the node store.
///
/// The index doubles as the node's sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document root is always at index 0.
    pub const ROOT: Self = Self(0);

    /// The node's logical begin position.
    ///
    /// The root reports `-1` so that its subtree range starts at index 0.
    #[must_use]
    pub fn begin(self) -> isize {
        if self == Self::ROOT {
            -1
        } else {
            isize::try_from(self.0).unwrap_or(isize::MAX)
        }
    }
}

/// The role a node plays in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// The synthetic document root.
    Root,
    /// An element with a tag name and attributes.
    Element,
    /// A run of character data, or markup demoted to text during recovery.
    Text,
    /// An `<!-- ... -->` comment.
    Comment,
    /// Any other `<! ... >` construct, such as a doctype.
    Unknown,
}

impl NodeKind {
    /// Tag name used for nodes that have no element name of their own.
    #[must_use]
    pub const fn default_tag(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Element => "",
            Self::Text => "text",
            Self::Comment => "comment",
            Self::Unknown => "unknown",
        }
    }
}

/// A single record in the node store.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is.
    pub kind: NodeKind,

    /// Element name, or `text`/`comment`/`unknown`/`root` for other kinds.
    pub tag: String,

    /// Attributes in source order. Names are unique.
    pub attributes: Vec<Attribute>,

    /// Literal source slice for text, comment and unknown nodes. May contain
    /// noise placeholders.
    pub text: Option<String>,

    /// Replacement for everything between the opening and closing tag.
    pub inner_override: Option<String>,

    /// Replacement for the node's whole markup.
    pub outer_override: Option<String>,

    /// Whitespace and residue captured between the last attribute and `>`,
    /// including a trailing `/` for explicitly self-closed tags.
    pub end_space: String,

    /// Sequence counter at the matching close event, or `0`.
    pub end: usize,

    /// Byte offset of this node's `<` in the preprocessed input.
    pub tag_offset: usize,

    /// Enclosing node. Only the root has none.
    pub parent: Option<NodeId>,

    /// Immediate element children, in document order.
    pub children: Vec<NodeId>,

    /// All immediate nodes of every kind, in document order.
    pub child_nodes: Vec<NodeId>,
}

impl Node {
    /// Create an unlinked node of the given kind.
    #[must_use]
    pub fn new(kind: NodeKind, tag: impl Into<String>) -> Self {
        Self {
            kind,
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
            inner_override: None,
            outer_override: None,
            end_space: String::new(),
            end: 0,
            tag_offset: 0,
            parent: None,
            children: Vec::new(),
            child_nodes: Vec::new(),
        }
    }

    /// Create an unlinked leaf holding literal source text.
    #[must_use]
    pub fn leaf(kind: NodeKind, text: impl Into<String>) -> Self {
        let mut node = Self::new(kind, kind.default_tag());
        node.text = Some(text.into());
        node
    }

    /// Returns true for element nodes.
    #[must_use]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// The attribute's value. Presence-only attributes read as `""`.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attribute(name).map(|a| a.value.as_str())
    }

    /// Returns true if the attribute is present, with or without a value.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Set an attribute, keeping its position and formatting if it exists.
    ///
    /// New attributes are appended with a single leading space and double
    /// quotes.
    pub fn set_attr(&mut self, name: &str, value: AttrValue) {
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == name) {
            if matches!(existing.value, AttrValue::Flag) && existing.format.quote == Quote::None {
                existing.format.quote = Quote::Double;
            }
            existing.value = value;
        } else {
            self.attributes.push(Attribute::appended(name, value));
        }
    }

    /// Remove an attribute, returning it if it was present.
    pub fn remove_attr(&mut self, name: &str) -> Option<Attribute> {
        let position = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(position))
    }
}
