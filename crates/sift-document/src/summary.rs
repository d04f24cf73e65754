//! Serializable node summaries for tooling output.

use serde::Serialize;
use sift_dom::{AttrValue, DomTree, NodeId};

/// One attribute as it appears in a summary. Presence-only attributes have
/// no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSummary {
    /// Attribute name.
    pub name: String,
    /// Attribute value, `None` for a presence-only attribute.
    pub value: Option<String>,
}

/// A flat description of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    /// Sequence number.
    pub index: usize,
    /// `root`, `element`, `text`, `comment` or `unknown`.
    pub kind: String,
    /// Tag name.
    pub tag: String,
    /// Attributes in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSummary>,
    /// Literal text of a leaf, with noise restored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Begin of the sequence range.
    pub begin: isize,
    /// End of the sequence range, `0` when never explicitly closed.
    pub end: usize,
    /// Byte offset of the node's `<` in the preprocessed input.
    pub offset: usize,
}

impl NodeSummary {
    /// Summarize node `id`, or `None` if it does not exist.
    #[must_use]
    pub fn of(tree: &DomTree, id: NodeId) -> Option<Self> {
        let node = tree.get(id)?;
        let attributes = node
            .attributes
            .iter()
            .map(|attr| AttributeSummary {
                name: attr.name.clone(),
                value: match &attr.value {
                    AttrValue::Flag => None,
                    AttrValue::Text(text) => Some(text.clone()),
                },
            })
            .collect();
        Some(Self {
            index: id.0,
            kind: node.kind.to_string(),
            tag: node.tag.clone(),
            attributes,
            text: node.text.as_deref().map(|t| tree.noise().restore(t)),
            begin: id.begin(),
            end: node.end,
            offset: node.tag_offset,
        })
    }
}
