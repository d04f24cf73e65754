use crate::{AttrValue, Node, NodeId, NodeKind, NoiseTable};

/// Arena-based node store with O(1) access by [`NodeId`].
///
/// Storage order is creation order, so a node's index is its sequence number.
/// The root is always at index 0. The noise table lives alongside the nodes
/// because node text refers to it through placeholders.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    nodes: Vec<Node>,
    /// Regions extracted before tokenizing.
    noise: NoiseTable,
}

impl DomTree {
    /// Create a store holding only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self::with_noise(NoiseTable::new())
    }

    /// Create a store holding only the root node, with a prepared noise table.
    #[must_use]
    pub fn with_noise(noise: NoiseTable) -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root, NodeKind::Root.default_tag())],
            noise,
        }
    }

    /// Get the root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// The root node. Nodes are never removed, so it always exists.
    #[must_use]
    pub fn root_node(&self) -> &Node {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the store, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the store is empty (it always holds at least the root).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node with its ID, in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// The noise table backing placeholder restoration.
    #[must_use]
    pub const fn noise(&self) -> &NoiseTable {
        &self.noise
    }

    /// Append a node to the store and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Attach `child` under `parent`.
    ///
    /// Every node goes into the parent's `child_nodes`; elements also go into
    /// `children`.
    pub fn link(&mut self, parent: NodeId, child: NodeId) {
        let is_element = self.nodes[child.0].is_element();
        self.nodes[child.0].parent = Some(parent);
        let parent_node = &mut self.nodes[parent.0];
        parent_node.child_nodes.push(child);
        if is_element {
            parent_node.children.push(child);
        }
    }

    /// Move an existing node under a new parent, detaching it from its old one
    /// first. Returns `child`.
    ///
    /// Moving a node breaks the sequence-range property for the nodes
    /// involved; selector scans fall back to subtree extents for them only if
    /// their `end` is `0`. Requests that would create a cycle are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            tracing::debug!(?parent, ?child, "ignored append that would create a cycle");
            return child;
        }
        if let Some(old) = self.parent(child) {
            let old_node = &mut self.nodes[old.0];
            old_node.children.retain(|&c| c != child);
            old_node.child_nodes.retain(|&c| c != child);
        }
        self.link(parent, child);
        child
    }

    // ===== Navigation =====

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get the element children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the `idx`-th element child of a node (0-based).
    #[must_use]
    pub fn child(&self, id: NodeId, idx: usize) -> Option<NodeId> {
        self.children(id).get(idx).copied()
    }

    /// Get every immediate node (elements, text, comments) under a node.
    #[must_use]
    pub fn child_nodes(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.child_nodes.as_slice())
    }

    /// Returns true if the node has element children.
    #[must_use]
    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// Get the first element child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last element child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Get the next element sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Get the previous element sibling of a node.
    #[must_use]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Find the closest node with the given tag, starting with the node itself.
    #[must_use]
    pub fn find_ancestor_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&a| self.get(a).is_some_and(|n| n.tag == tag))
    }

    /// The node's tag name.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.tag.as_str())
    }

    /// One past the last sequence number belonging to the node's subtree.
    ///
    /// Uses the recorded `end` when there is one. Otherwise follows the last
    /// linked node down to a leaf; since nodes are linked in creation order,
    /// that leaf carries the highest index in the subtree.
    #[must_use]
    pub fn scan_end(&self, id: NodeId) -> usize {
        let Some(node) = self.get(id) else {
            return id.0;
        };
        if node.end != 0 {
            return node.end.min(self.nodes.len());
        }
        let mut last = id;
        while let Some(&next) = self.child_nodes(last).last() {
            last = next;
        }
        last.0 + 1
    }

    // ===== Mutation =====

    /// Set an attribute on a node. See [`Node::set_attr`].
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: AttrValue) {
        if let Some(node) = self.get_mut(id) {
            node.set_attr(name, value);
        }
    }

    /// Remove an attribute from a node.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.get_mut(id) {
            let _ = node.remove_attr(name);
        }
    }

    /// Replace the node's entire markup when rendered.
    pub fn set_outer_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.get_mut(id) {
            node.outer_override = Some(text.into());
        }
    }

    /// Replace the node's content when rendered.
    ///
    /// Text-like nodes have their literal text replaced instead.
    pub fn set_inner_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.get_mut(id) {
            if node.text.is_some() {
                node.text = Some(text.into());
            } else {
                node.inner_override = Some(text.into());
            }
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
