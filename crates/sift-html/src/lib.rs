//! Forgiving HTML parser for the sift toolkit.
//!
//! # Scope
//!
//! This crate implements the parsing pipeline:
//! - **Preprocessing** - optional `\r`/`\n` stripping
//! - **Noise extraction** - comments, CDATA, script and style bodies, `code`
//!   bodies, server tags and template tags are swapped for placeholders
//! - **Scanner** - byte-set cursor primitives over the prepared input
//! - **Tree builder** - one node per token, with implicit closing of
//!   optional-closing tags and local recovery for mismatched end tags
//!
//! Parsing never fails. Malformed markup is kept as text so the input
//! survives into the tree.
//!
//! # Not Implemented
//!
//! - HTML5 tokenizer states and insertion modes
//! - Character reference decoding
//! - Incremental parsing

/// Noise extraction pre-pass.
pub mod noise;
/// Parser configuration.
pub mod options;
/// Tree construction.
pub mod parser;
/// Cursor primitives.
pub mod scanner;

pub use noise::extract_noise;
pub use options::ParseOptions;
pub use parser::{HtmlParser, ParseIssue, RecoveryKind, dump_tree, print_tree};
pub use scanner::Scanner;

use sift_dom::{DomTree, NoiseTable};

/// Result of parsing one document.
#[derive(Debug, Clone)]
pub struct Parsed {
    /// The node store, with the noise table attached.
    pub tree: DomTree,
    /// Recoveries performed while building the tree.
    pub issues: Vec<ParseIssue>,
    /// Byte length of the input as given.
    pub original_size: usize,
    /// Byte length after line-break stripping.
    pub size: usize,
}

/// Parse `input` into a node store.
///
/// An empty input yields a tree holding only the root.
#[must_use]
pub fn parse_document(input: &str, options: &ParseOptions) -> Parsed {
    let original_size = input.len();
    let prepared = if options.strip_cr_lf {
        input.replace(['\r', '\n'], " ")
    } else {
        input.to_string()
    };
    let size = prepared.len();

    let mut noise = NoiseTable::new();
    let doc = extract_noise(&prepared, &mut noise);
    let (tree, issues) = HtmlParser::new(&doc, noise, options).run_with_issues();

    Parsed {
        tree,
        issues,
        original_size,
        size,
    }
}
