//! Attribute reading for opening tags.

use sift_dom::{AttrFormat, AttrValue, Attribute, Node, Quote};

use super::core::{HtmlParser, TagEnd};
use crate::scanner::{ATTR, BLANK, EQUAL};

// =============================================================================
// Attributes
// =============================================================================

impl<'a> HtmlParser<'a> {
    /// Read attributes until `>` or `/`, storing them on `node` with the
    /// whitespace and quoting needed to reproduce the tag.
    ///
    /// An attribute needs whitespace before its name. Repeated names keep the
    /// first value; later values are still consumed.
    pub(super) fn read_attributes(&mut self, node: &mut Node) -> TagEnd<'a> {
        let mut lead = self.scanner.copy_skip(BLANK);
        loop {
            if self.scanner.at_end() {
                return TagEnd::Unterminated;
            }
            if lead.is_empty() || matches!(self.scanner.current(), Some(b'>' | b'/')) {
                return TagEnd::Closed(lead);
            }

            let name_start = self.scanner.pos();
            let raw_name = self.scanner.copy_until(EQUAL);
            if let Some(idx) = raw_name.find('<') {
                return TagEnd::StrayBracket(name_start + idx);
            }
            if raw_name.is_empty() {
                // a stray '=' with no name; the caller keeps it as residue
                return TagEnd::Closed(lead);
            }

            let gap_start = self.scanner.pos();
            let before_eq = self.scanner.copy_skip(BLANK);
            let mut name = self.tree.noise().restore(raw_name);
            if self.options.case_insensitive_tags {
                name.make_ascii_lowercase();
            }

            if self.scanner.current() == Some(b'=') {
                self.scanner.advance();
                let after_eq = self.scanner.copy_skip(BLANK);
                let (quote, raw_value) = self.read_value();
                let mut value = self.tree.noise().restore(raw_value).replace(['\r', '\n'], "");
                if name == "class" {
                    value = value.trim().to_string();
                }
                if !node.has_attr(&name) {
                    node.attributes.push(Attribute {
                        name,
                        value: AttrValue::Text(value),
                        format: AttrFormat {
                            before_name: lead.to_string(),
                            before_eq: before_eq.to_string(),
                            after_eq: after_eq.to_string(),
                            quote,
                        },
                    });
                }
            } else {
                // presence-only: the whitespace after the name leads the next attribute
                self.scanner.rewind(gap_start);
                if !node.has_attr(&name) {
                    node.attributes.push(Attribute {
                        name,
                        value: AttrValue::Flag,
                        format: AttrFormat {
                            before_name: lead.to_string(),
                            quote: Quote::None,
                            ..AttrFormat::default()
                        },
                    });
                }
            }

            lead = self.scanner.copy_skip(BLANK);
        }
    }

    /// Read a value after `=`, returning its quote style and raw text.
    fn read_value(&mut self) -> (Quote, &'a str) {
        let (quote, delimiter) = match self.scanner.current() {
            Some(b'"') => (Quote::Double, b'"'),
            Some(b'\'') => (Quote::Single, b'\''),
            _ => return (Quote::None, self.scanner.copy_until(ATTR)),
        };
        self.scanner.advance();
        let value = self.scanner.copy_until_char_escaped(delimiter);
        self.scanner.advance();
        (quote, value)
    }
}
