//! Tag classification tables used by the tree builder.

/// Tags that never have content or an end tag.
const SELF_CLOSING: &[&str] = &[
    "img", "br", "input", "meta", "link", "hr", "base", "embed", "spacer",
];

/// Tags whose end tag may close an enclosing optional-closing element.
const BLOCK: &[&str] = &["root", "body", "form", "div", "span", "table"];

/// An opening tag, and the open parent tags it implicitly closes.
const OPTIONAL_CLOSING: &[(&str, &[&str])] = &[
    ("tr", &["tr", "td", "th"]),
    ("th", &["th"]),
    ("td", &["td"]),
    ("li", &["li"]),
    ("dt", &["dt", "dd"]),
    ("dd", &["dd", "dt"]),
    ("dl", &["dd", "dt"]),
    ("p", &["p"]),
    ("nobr", &["nobr"]),
    ("b", &["b"]),
    ("option", &["option"]),
];

/// Returns true for tags such as `img` and `br`. Expects a lowercase name.
#[must_use]
pub fn is_self_closing(tag: &str) -> bool {
    SELF_CLOSING.contains(&tag)
}

/// Returns true for `div`, `table` and the other block tags. Expects a
/// lowercase name.
#[must_use]
pub fn is_block(tag: &str) -> bool {
    BLOCK.contains(&tag)
}

/// Returns true if `tag` has implicit-closing rules. Expects a lowercase name.
#[must_use]
pub fn is_optional_closing(tag: &str) -> bool {
    OPTIONAL_CLOSING.iter().any(|(t, _)| *t == tag)
}

/// Returns true if opening `tag` implicitly closes an open `parent`.
/// Expects lowercase names.
#[must_use]
pub fn closes(tag: &str, parent: &str) -> bool {
    OPTIONAL_CLOSING
        .iter()
        .find(|(t, _)| *t == tag)
        .is_some_and(|(_, parents)| parents.contains(&parent))
}

/// Returns true if `name` is a plain tag name: ASCII word characters, `-`
/// and `:`.
#[must_use]
pub fn is_tag_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_closing_rules() {
        assert!(closes("li", "li"));
        assert!(closes("tr", "td"));
        assert!(closes("dd", "dt"));
        assert!(!closes("li", "ul"));
        assert!(!closes("div", "p"));
        assert!(is_optional_closing("p"));
        assert!(!is_optional_closing("div"));
    }

    #[test]
    fn test_tag_name_pattern() {
        assert!(is_tag_name("div"));
        assert!(is_tag_name("svg:rect"));
        assert!(is_tag_name("my-element_2"));
        assert!(!is_tag_name(""));
        assert!(!is_tag_name("a\"b"));
        assert!(!is_tag_name("p="));
    }
}
