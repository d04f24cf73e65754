//! Selector matching over sequence ranges.
//!
//! Every node's subtree occupies the contiguous index range
//! `(id, scan_end(id))` of the node store, so a descendant step is a linear
//! scan of that range rather than a tree walk.

use std::collections::BTreeSet;

use sift_dom::{Node, NodeId, Renderer};

use crate::selector::{AttrKey, Condition, Selector, Step, ValueTest};

/// Per-query matching options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare attribute values ignoring case. Regex literals then see the
    /// value lowercased.
    pub case_insensitive_values: bool,
}

impl MatchOptions {
    /// Options with case-insensitive value comparison.
    #[must_use]
    pub const fn ignoring_case() -> Self {
        Self {
            case_insensitive_values: true,
        }
    }
}

/// Run `selector` inside the subtree of `scope`.
///
/// Each group starts from `{scope}`; every step replaces the current roots by
/// the nodes in their ranges that pass the step. The matches of all groups
/// are merged and returned in document order without duplicates. `scope`
/// itself is never part of the result.
#[must_use]
pub fn find(
    renderer: &Renderer<'_>,
    scope: NodeId,
    selector: &Selector,
    options: MatchOptions,
) -> Vec<NodeId> {
    if selector.has_empty_group() {
        return Vec::new();
    }
    let mut found = BTreeSet::new();
    for group in selector.groups() {
        let mut head = BTreeSet::from([scope]);
        for step in group.steps() {
            let mut next = BTreeSet::new();
            for &root in &head {
                seek(renderer, root, step, options, &mut next);
            }
            head = next;
            if head.is_empty() {
                break;
            }
        }
        found.extend(head);
    }
    tracing::trace!(scope = scope.0, matches = found.len(), "matched selector");
    found.into_iter().collect()
}

/// Add the nodes under `root` that pass `step` to `out`.
fn seek(
    renderer: &Renderer<'_>,
    root: NodeId,
    step: &Step,
    options: MatchOptions,
    out: &mut BTreeSet<NodeId>,
) {
    let tree = renderer.tree();

    if let Some(position) = step.position() {
        // positions are 1-based; 0 never matches
        let hit = position.checked_sub(1).and_then(|skip| {
            tree.children(root)
                .iter()
                .copied()
                .filter(|&child| passes(renderer, child, step, options))
                .nth(skip)
        });
        if let Some(hit) = hit {
            let _ = out.insert(hit);
        }
        return;
    }

    for index in root.0 + 1..tree.scan_end(root) {
        let id = NodeId(index);
        if passes(renderer, id, step, options) {
            let _ = out.insert(id);
        }
    }
}

/// Returns true if node `id` passes the tag filter and every condition.
fn passes(renderer: &Renderer<'_>, id: NodeId, step: &Step, options: MatchOptions) -> bool {
    let Some(node) = renderer.tree().get(id) else {
        return false;
    };
    step.tag.accepts(node)
        && step.conditions.iter().all(|condition| match condition {
            Condition::Nth(_) | Condition::Has(AttrKey::PlainText) => true,
            Condition::Has(AttrKey::Named(name)) => node.has_attr(name),
            Condition::Lacks(name) => !node.has_attr(name),
            Condition::Value(test) => value_passes(renderer, id, node, test, options),
        })
}

fn value_passes(
    renderer: &Renderer<'_>,
    id: NodeId,
    node: &Node,
    test: &ValueTest,
    options: MatchOptions,
) -> bool {
    let actual = match &test.key {
        AttrKey::PlainText => renderer.plain_text(id),
        AttrKey::Named(name) => match node.get_attr(name) {
            Some(value) => value.to_string(),
            None => return false,
        },
    };
    if test.accepts(&actual, options) {
        return true;
    }
    test.tokens
        && actual
            .split(' ')
            .filter(|token| !token.is_empty())
            .any(|token| test.accepts(token, options))
}
