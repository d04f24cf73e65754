//! Selector compilation and matching for the sift HTML toolkit.
//!
//! # Scope
//!
//! This crate implements the query side of the toolkit:
//! - **Selector compiler** - turns a selector string into comma-separated
//!   groups of steps, each step a tag filter plus attribute conditions
//!   - Tag, universal, `#id` and `.class` shorthands
//!   - `[attr]`, `[!attr]`, `[attr=v]`, `[attr!=v]`, `[attr^=v]`,
//!     `[attr$=v]`, `[attr*=v]` (substring, or a `/regex/flags` literal)
//!   - `tag[N]` positional steps
//!   - The `plaintext` pseudo-attribute
//! - **Matcher** - evaluates each step over the contiguous sequence range of
//!   every current root instead of walking the tree
//!
//! Steps are joined only by the descendant combinator (whitespace or `/`).
//!
//! # Not Implemented
//!
//! - Child, sibling and adjacent combinators
//! - Pseudo-classes and pseudo-elements
//! - Specificity

/// Range-scanning matcher.
pub mod matcher;
/// Selector intermediate representation and compiler.
pub mod selector;

pub use matcher::{MatchOptions, find};
pub use selector::{AttrKey, AttrOp, Condition, Group, Pattern, Selector, Step, TagFilter, ValueTest, compile};
