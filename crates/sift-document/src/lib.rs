//! High-level document API for the sift HTML toolkit.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - parse strings and bytes, read files, fetch URLs
//! - **Queries** - selector search over the whole document or a subtree,
//!   with `getElementById`-style shortcuts
//! - **Rendering** - outer, inner, plain and XML text, with an optional
//!   character-set conversion hook
//! - **Editing** - attribute and text overrides, re-linking nodes, saving
//! - **Inspection** - charset sniffing, `img` display sizes, serializable
//!   node summaries and tree outlines
//!
//! # Not Implemented
//!
//! - Character-set conversion (callers supply it through
//!   [`Document::set_converter`])
//! - Creating new nodes

/// Charset detection from `<meta>` tags.
pub mod charset;
/// The document facade.
pub mod document;
/// Display-size heuristics for images.
pub mod size;
/// Serializable node summaries.
pub mod summary;

pub use sift_dom as dom;
pub use sift_html as html;
pub use sift_select as select;

pub use document::{Document, NodeRef};
pub use sift_common::LoadError;
pub use sift_dom::{AttrValue, NodeId, NodeKind};
pub use sift_html::ParseOptions;
pub use sift_select::MatchOptions;
pub use size::DisplaySize;
pub use summary::NodeSummary;
