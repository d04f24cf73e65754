//! Charset sniffing.
//!
//! Only detection happens here. Converting text is left to the hook set with
//! [`crate::Document::set_converter`].

use std::sync::OnceLock;

use regex::Regex;
use sift_dom::{DomTree, NodeId, Renderer};
use sift_select::{MatchOptions, compile, find};

/// Charset assumed when nothing is declared and the bytes are valid UTF-8.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Charset assumed for a `Content-Type` meta tag without a `charset=`.
pub const META_FALLBACK_CHARSET: &str = "ISO-8859-1";

/// Windows-1252, a superset of Latin-1 that replaces its aliases.
pub const WINDOWS_1252: &str = "CP1252";

const LATIN1_ALIASES: [&str; 3] = ["ISO-8859-1", "Latin1", "Latin-1"];

fn charset_param() -> Option<&'static Regex> {
    static COMPILED: OnceLock<Option<Regex>> = OnceLock::new();
    COMPILED
        .get_or_init(|| Regex::new(r"(?i)charset=(.+)").ok())
        .as_ref()
}

/// Detect the document's charset.
///
/// A `<meta http-equiv="Content-Type">` tag wins, then `<meta charset>`.
/// Without either, `valid_utf8` tells whether the source bytes decoded
/// cleanly; if not they are assumed to be Windows-1252.
#[must_use]
pub fn detect(tree: &DomTree, valid_utf8: bool) -> String {
    let charset = declared(tree).unwrap_or_else(|| {
        if valid_utf8 {
            DEFAULT_CHARSET.to_string()
        } else {
            WINDOWS_1252.to_string()
        }
    });
    let charset = widen(&charset);
    tracing::debug!(%charset, "detected charset");
    charset
}

/// The charset named by the document's meta tags, if any.
#[must_use]
pub fn declared(tree: &DomTree) -> Option<String> {
    let renderer = Renderer::new(tree);
    let first_meta = |selector: &str| {
        find(
            &renderer,
            NodeId::ROOT,
            &compile(selector, true),
            MatchOptions::ignoring_case(),
        )
        .first()
        .and_then(|&id| tree.get(id))
    };

    if let Some(meta) = first_meta("meta[http-equiv=Content-Type]")
        && let Some(content) = meta.get_attr("content").filter(|c| !c.is_empty())
    {
        let named = charset_param()
            .and_then(|re| re.captures(content))
            .and_then(|caps| caps.get(1))
            .map_or(META_FALLBACK_CHARSET, |m| m.as_str());
        return Some(named.to_string());
    }

    first_meta("meta[charset]")
        .and_then(|meta| meta.get_attr("charset"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Replace Latin-1 aliases with [`WINDOWS_1252`].
#[must_use]
pub fn widen(charset: &str) -> String {
    if LATIN1_ALIASES
        .iter()
        .any(|alias| alias.eq_ignore_ascii_case(charset))
    {
        WINDOWS_1252.to_string()
    } else {
        charset.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_html::{ParseOptions, parse_document};

    fn charset_of(html: &str) -> String {
        detect(&parse_document(html, &ParseOptions::default()).tree, true)
    }

    #[test]
    fn test_http_equiv_charset() {
        let html = r#"<meta http-equiv="Content-Type" content="text/html; charset=Shift_JIS">"#;
        assert_eq!(charset_of(html), "Shift_JIS");
    }

    #[test]
    fn test_http_equiv_without_charset_is_latin1() {
        let html = r#"<meta http-equiv="content-type" content="text/html">"#;
        assert_eq!(charset_of(html), WINDOWS_1252);
    }

    #[test]
    fn test_meta_charset() {
        assert_eq!(charset_of(r#"<meta charset="utf-8">"#), "utf-8");
        assert_eq!(charset_of("<meta charset=latin1>"), WINDOWS_1252);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(charset_of("<p>x</p>"), DEFAULT_CHARSET);
        let tree = parse_document("<p>x</p>", &ParseOptions::default()).tree;
        assert_eq!(detect(&tree, false), WINDOWS_1252);
    }
}
