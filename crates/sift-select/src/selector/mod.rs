//! Selector intermediate representation.
//!
//! A [`Selector`] is a list of comma-separated [`Group`]s. A group is an
//! ordered list of [`Step`]s joined by the descendant combinator; each step
//! narrows the previous step's matches to nodes inside their subtrees.

mod parser;

pub use parser::compile;

use std::borrow::Cow;

use regex::Regex;
use sift_dom::{Node, NodeKind};
use strum_macros::{Display, EnumString};

use crate::matcher::MatchOptions;

/// Pseudo-attribute whose value is the node's rendered plain text.
pub const PLAIN_TEXT_KEY: &str = "plaintext";

/// A compiled selector.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    groups: Vec<Group>,
}

impl Selector {
    /// The comma-separated alternatives, in source order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Returns true if the selector compiled to nothing; it matches nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns true if some group has no steps, as `tbody, p` does. Such a
    /// selector matches nothing.
    #[must_use]
    pub fn has_empty_group(&self) -> bool {
        self.groups.iter().any(|group| group.steps.is_empty())
    }
}

/// One comma-separated alternative.
#[derive(Debug, Clone, Default)]
pub struct Group {
    steps: Vec<Step>,
}

impl Group {
    /// Steps in descendant order, outermost first.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// What a step requires of a node's tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// No tag given: any node, including text and comments.
    Any,
    /// `*`: any element.
    Elements,
    /// An exact tag name, compared with the node's `tag`. `text` and
    /// `comment` select leaves.
    Named(String),
}

impl TagFilter {
    /// Returns true if `node` passes this filter.
    #[must_use]
    pub fn accepts(&self, node: &Node) -> bool {
        match self {
            Self::Any => true,
            Self::Elements => node.kind == NodeKind::Element,
            Self::Named(tag) => node.tag == *tag,
        }
    }
}

/// A single compound step: `tag#id.class[attr op value]`.
#[derive(Debug, Clone)]
pub struct Step {
    /// Tag filter.
    pub tag: TagFilter,
    /// Conditions that must all hold.
    pub conditions: Vec<Condition>,
}

impl Step {
    /// The 1-based position requested by a `tag[N]` step, if any.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.conditions.iter().find_map(|c| match c {
            Condition::Nth(n) => Some(*n),
            _ => None,
        })
    }
}

/// Where a condition reads its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrKey {
    /// A named attribute.
    Named(String),
    /// The node's plain text.
    PlainText,
}

/// A single test inside a step.
#[derive(Debug, Clone)]
pub enum Condition {
    /// `tag[N]`: the N-th matching direct child of the current root.
    Nth(usize),
    /// `[attr]`: the attribute is present. Always true for plain text.
    Has(AttrKey),
    /// `[!attr]`: the attribute is absent.
    Lacks(String),
    /// `[attr op value]`, `#id` or `.class`.
    Value(ValueTest),
}

/// Comparison operators for attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum AttrOp {
    /// `=`: whole value equal.
    #[strum(serialize = "=")]
    Equals,
    /// `!=`: whole value different.
    #[strum(serialize = "!=")]
    NotEquals,
    /// `^=`: value starts with.
    #[strum(serialize = "^=")]
    Prefix,
    /// `$=`: value ends with.
    #[strum(serialize = "$=")]
    Suffix,
    /// `*=`: value contains, ignoring case, or matches a regex literal.
    #[strum(serialize = "*=")]
    Contains,
}

/// The right-hand side of a value test.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Plain text compared with the operator.
    Literal(String),
    /// A `/body/flags` literal given to `*=`.
    Regex(Regex),
    /// A regex literal that failed to compile; matches nothing.
    Invalid(String),
}

/// `key op pattern`.
#[derive(Debug, Clone)]
pub struct ValueTest {
    /// Value source.
    pub key: AttrKey,
    /// Operator.
    pub op: AttrOp,
    /// Expected value.
    pub pattern: Pattern,
    /// Also pass when one space-separated token of the value passes. Set
    /// for the `.class` shorthand and for `class` brackets other than `=`.
    pub tokens: bool,
}

impl ValueTest {
    /// Test a candidate value.
    ///
    /// With `case_insensitive_values` both sides of a literal comparison are
    /// lowercased, and a regex literal runs against the lowercased value.
    /// Substring tests ignore case either way.
    #[must_use]
    pub fn accepts(&self, value: &str, options: MatchOptions) -> bool {
        let expected = match &self.pattern {
            Pattern::Literal(text) => text.as_str(),
            Pattern::Regex(re) if options.case_insensitive_values => {
                return re.is_match(&value.to_lowercase());
            }
            Pattern::Regex(re) => return re.is_match(value),
            Pattern::Invalid(_) => return false,
        };
        let fold = options.case_insensitive_values || self.op == AttrOp::Contains;
        let (expected, value) = if fold {
            (
                Cow::Owned(expected.to_lowercase()),
                Cow::Owned(value.to_lowercase()),
            )
        } else {
            (Cow::Borrowed(expected), Cow::Borrowed(value))
        };
        match self.op {
            AttrOp::Equals => value == expected,
            AttrOp::NotEquals => value != expected,
            AttrOp::Prefix => value.starts_with(expected.as_ref()),
            AttrOp::Suffix => value.ends_with(expected.as_ref()),
            AttrOp::Contains => value.contains(expected.as_ref()),
        }
    }
}
