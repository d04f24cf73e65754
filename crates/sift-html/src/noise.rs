//! Noise extraction.
//!
//! Regions the tree builder must not look inside are replaced by fixed-width
//! placeholders before tokenizing. For comments, script, style and `code`
//! bodies only the content is replaced, so the surrounding tags are still
//! tokenized normally. CDATA sections, server tags and template tags are
//! replaced whole.

use regex::Regex;
use sift_common::warning::warn_once;
use sift_dom::NoiseTable;
use std::ops::Range;
use std::sync::OnceLock;

/// A region pattern and the capture group that gets replaced.
struct NoisePattern {
    pattern: &'static str,
    group: usize,
}

/// Applied in order; later patterns see the placeholders of earlier ones.
const PATTERNS: [NoisePattern; 9] = [
    // comments
    NoisePattern {
        pattern: r"(?is)<!--(.*?)-->",
        group: 1,
    },
    // cdata
    NoisePattern {
        pattern: r"(?is)<!\[CDATA\[(.*?)\]\]>",
        group: 0,
    },
    // script with attributes, then bare
    NoisePattern {
        pattern: r"(?is)<\s*script[^>]*[^/]>(.*?)<\s*/\s*script\s*>",
        group: 1,
    },
    NoisePattern {
        pattern: r"(?is)<\s*script\s*>(.*?)<\s*/\s*script\s*>",
        group: 1,
    },
    // style with attributes, then bare
    NoisePattern {
        pattern: r"(?is)<\s*style[^>]*[^/]>(.*?)<\s*/\s*style\s*>",
        group: 1,
    },
    NoisePattern {
        pattern: r"(?is)<\s*style\s*>(.*?)<\s*/\s*style\s*>",
        group: 1,
    },
    // preformatted
    NoisePattern {
        pattern: r"(?is)<\s*(?:code)[^>]*>(.*?)<\s*/\s*(?:code)\s*>",
        group: 1,
    },
    // server-side script
    NoisePattern {
        pattern: r"(?s)(<\?)(.*?)(\?>)",
        group: 0,
    },
    // template tags
    NoisePattern {
        pattern: r"(?s)(\{\w)(.*?)(\})",
        group: 0,
    },
];

fn compiled_patterns() -> &'static [(Regex, usize)] {
    static COMPILED: OnceLock<Vec<(Regex, usize)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .filter_map(|p| match Regex::new(p.pattern) {
                Ok(re) => Some((re, p.group)),
                Err(e) => {
                    warn_once("Noise", &format!("skipping pattern {}: {e}", p.pattern));
                    None
                }
            })
            .collect()
    })
}

/// Replace every noise region in `doc` with a placeholder, recording the
/// originals in `table`.
///
/// Matches of one pattern are replaced from last to first so earlier byte
/// offsets stay valid. Once the table is full the remaining regions are left
/// in place.
#[must_use]
pub fn extract_noise(doc: &str, table: &mut NoiseTable) -> String {
    let mut doc = doc.to_string();
    for (re, group) in compiled_patterns() {
        let spans: Vec<Range<usize>> = re
            .captures_iter(&doc)
            .filter_map(|caps| caps.get(*group))
            .map(|m| m.range())
            .collect();

        for span in spans.into_iter().rev() {
            let original = doc[span.clone()].to_string();
            let Some(placeholder) = table.insert(&original) else {
                warn_once("Noise", "placeholder key space exhausted; leaving regions in place");
                return doc;
            };
            doc.replace_range(span, &placeholder);
        }
    }
    tracing::debug!(regions = table.len(), "extracted noise");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_content_is_replaced() {
        let mut table = NoiseTable::new();
        let doc = extract_noise("<!-- c --><p>x</p>", &mut table);
        assert_eq!(doc, "<!--___noise___00000--><p>x</p>");
        assert_eq!(table.get(0), Some(" c "));
    }

    #[test]
    fn test_cdata_is_replaced_whole() {
        let mut table = NoiseTable::new();
        let doc = extract_noise("a<![CDATA[<b>]]>b", &mut table);
        assert_eq!(doc, "a___noise___00000b");
        assert_eq!(table.get(0), Some("<![CDATA[<b>]]>"));
    }

    #[test]
    fn test_reverse_order_keys() {
        let mut table = NoiseTable::new();
        let doc = extract_noise("<!--a--><!--b-->", &mut table);
        // the last match is replaced first
        assert_eq!(doc, "<!--___noise___00001--><!--___noise___00000-->");
        assert_eq!(table.get(0), Some("b"));
        assert_eq!(table.get(1), Some("a"));
    }

    #[test]
    fn test_script_and_style_bodies() {
        let mut table = NoiseTable::new();
        let doc = extract_noise(
            "<script type=\"x\">if (a<b) {}</script><style>p{}</style>",
            &mut table,
        );
        assert_eq!(
            doc,
            "<script type=\"x\">___noise___00000</script><style>___noise___00001</style>"
        );
        assert_eq!(table.restore(&doc), "<script type=\"x\">if (a<b) {}</script><style>p{}</style>");
    }

    #[test]
    fn test_server_and_template_tags() {
        let mut table = NoiseTable::new();
        let doc = extract_noise("<p><?php echo 1; ?>{name}</p>", &mut table);
        assert_eq!(doc, "<p>___noise___00000___noise___00001</p>");
        assert_eq!(table.get(0), Some("<?php echo 1; ?>"));
        assert_eq!(table.get(1), Some("{name}"));
    }
}
