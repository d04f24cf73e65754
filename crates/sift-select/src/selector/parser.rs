//! Selector compiler.
//!
//! The grammar is a single regular expression applied repeatedly; each match
//! yields one step and the separator that follows it. Text between matches
//! is dropped with a warning.

use std::sync::OnceLock;

use regex::{Captures, Regex, RegexBuilder};
use sift_common::warning::warn_once;

use super::{AttrKey, AttrOp, Condition, Group, PLAIN_TEXT_KEY, Pattern, Selector, Step, TagFilter, ValueTest};

/// tag, #id | .class, [attr op value], separator
const STEP_PATTERN: &str = r##"(?is)([\w\-:*]*)(?:#([\w\-]+)|\.([\w\-]+))?(?:\[@?(!?[\w\-:]+)(?:([!*^$]?=)["']?(.*?)["']?)?\])?([/,\s]+)"##;

fn step_regex() -> Option<&'static Regex> {
    static COMPILED: OnceLock<Option<Regex>> = OnceLock::new();
    COMPILED
        .get_or_init(|| match Regex::new(STEP_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                warn_once("Selector", &format!("step grammar failed to compile: {e}"));
                None
            }
        })
        .as_ref()
}

/// Compile `source` into groups of steps.
///
/// With `fold_case` tag names and attribute keys are lowercased, matching a
/// document parsed with case-insensitive tags. The tag `tbody` is skipped so
/// selectors copied from browser-serialized paths still match source markup.
/// A group left with no steps this way is kept, and such a selector matches
/// nothing. Unrecognized fragments are dropped.
#[must_use]
pub fn compile(source: &str, fold_case: bool) -> Selector {
    let Some(re) = step_regex() else {
        return Selector::default();
    };
    let input = format!("{} ", source.trim());

    let mut groups = Vec::new();
    let mut steps = Vec::new();
    // the current group has read a step, kept or skipped
    let mut open = false;
    let mut last_end = 0;
    for caps in re.captures_iter(&input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last_end {
            let skipped = &input[last_end..whole.start()];
            warn_once("Selector", &format!("ignored unrecognized fragment '{skipped}'"));
        }
        last_end = whole.end();

        let separator = caps.get(7).map_or("", |m| m.as_str());
        open |= !is_bare_separator(whole.as_str());
        if let Some(step) = read_step(&caps, fold_case) {
            steps.push(step);
        }
        // a group whose only step was skipped stays, empty
        if separator.trim() == "," {
            groups.push(Group {
                steps: std::mem::take(&mut steps),
            });
            open = false;
        }
    }
    if last_end < input.len() {
        warn_once(
            "Selector",
            &format!("ignored unrecognized fragment '{}'", &input[last_end..]),
        );
    }
    if open {
        groups.push(Group { steps });
    }

    tracing::trace!(selector = source, groups = groups.len(), "compiled selector");
    Selector { groups }
}

/// Build the step for one grammar match, or `None` for a bare separator or a
/// skipped `tbody`.
fn read_step(caps: &Captures<'_>, fold_case: bool) -> Option<Step> {
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    if is_bare_separator(group(0)) {
        return None;
    }

    let tag = fold(group(1), fold_case);
    if tag == "tbody" {
        return None;
    }

    let mut conditions = Vec::new();
    if !group(2).is_empty() {
        conditions.push(shorthand("id", group(2), false));
    }
    if !group(3).is_empty() {
        conditions.push(shorthand("class", group(3), true));
    }
    if !group(4).is_empty() {
        conditions.push(bracket(&fold(group(4), fold_case), group(5), group(6)));
    }

    let tag = match tag.as_str() {
        "" => TagFilter::Any,
        "*" => TagFilter::Elements,
        _ => TagFilter::Named(tag),
    };
    Some(Step { tag, conditions })
}

fn is_bare_separator(matched: &str) -> bool {
    matches!(matched.trim(), "" | "/" | "//")
}

fn fold(text: &str, fold_case: bool) -> String {
    if fold_case {
        text.to_lowercase()
    } else {
        text.to_string()
    }
}

fn shorthand(name: &str, value: &str, tokens: bool) -> Condition {
    Condition::Value(ValueTest {
        key: AttrKey::Named(name.to_string()),
        op: AttrOp::Equals,
        pattern: Pattern::Literal(value.to_string()),
        tokens,
    })
}

/// Translate `[key op value]`.
fn bracket(key: &str, op: &str, value: &str) -> Condition {
    if let Some(name) = key.strip_prefix('!') {
        return Condition::Lacks(name.to_string());
    }
    if op.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
        // an out-of-range position never matches
        return Condition::Nth(key.parse().unwrap_or(0));
    }

    let key = if key == PLAIN_TEXT_KEY {
        AttrKey::PlainText
    } else {
        AttrKey::Named(key.to_string())
    };
    if value.is_empty() || value == "*" {
        return Condition::Has(key);
    }

    let op = op.parse().unwrap_or(AttrOp::Equals);
    let pattern = if op == AttrOp::Contains {
        regex_literal(value).unwrap_or_else(|| Pattern::Literal(value.to_string()))
    } else {
        Pattern::Literal(value.to_string())
    };
    // class values are token lists; only exact equality looks at the whole string
    let tokens = op != AttrOp::Equals && matches!(&key, AttrKey::Named(name) if name == "class");
    Condition::Value(ValueTest {
        key,
        op,
        pattern,
        tokens,
    })
}

/// Compile a `/body/flags` literal. Returns `None` if `value` is not one.
fn regex_literal(value: &str) -> Option<Pattern> {
    let rest = value.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, flags) = (&rest[..close], &rest[close + 1..]);

    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        let _ = match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'U' => builder.swap_greed(true),
            'u' => builder.unicode(true),
            other => {
                warn_once("Selector", &format!("ignored regex flag '{other}' in {value}"));
                &mut builder
            }
        };
    }

    Some(match builder.build() {
        Ok(re) => Pattern::Regex(re),
        Err(e) => {
            warn_once("Selector", &format!("invalid regex {value}: {e}"));
            Pattern::Invalid(value.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(source: &str) -> Vec<Step> {
        let selector = compile(source, true);
        assert_eq!(selector.groups().len(), 1, "{source}");
        selector.groups()[0].steps().to_vec()
    }

    #[test]
    fn test_regex_literal_with_flags() {
        let Some(Pattern::Regex(re)) = regex_literal("/^ab+c$/i") else {
            panic!("expected regex");
        };
        assert!(re.is_match("ABBC"));
        assert!(!re.is_match("xabc"));
    }

    #[test]
    fn test_not_a_regex_literal() {
        assert!(regex_literal("abc").is_none());
        assert!(regex_literal("/abc").is_none());
    }

    #[test]
    fn test_invalid_regex_literal() {
        assert!(matches!(regex_literal("/(/"), Some(Pattern::Invalid(_))));
    }

    #[test]
    fn test_position_step() {
        let steps = steps("li[2]");
        assert_eq!(steps[0].position(), Some(2));
    }

    #[test]
    fn test_skipped_step_leaves_empty_group() {
        let selector = compile("tbody, p", true);
        let sizes: Vec<_> = selector.groups().iter().map(|g| g.steps().len()).collect();
        assert_eq!(sizes, vec![0, 1]);
        assert!(selector.has_empty_group());
        assert!(compile("p, tbody", true).has_empty_group());
        assert!(!compile("p, a", true).has_empty_group());
    }

    #[test]
    fn test_xpath_style_separators() {
        let steps = steps("//html/body/tbody/div");
        let tags: Vec<_> = steps.iter().map(|s| s.tag.clone()).collect();
        assert_eq!(
            tags,
            vec![
                TagFilter::Named("html".into()),
                TagFilter::Named("body".into()),
                TagFilter::Named("div".into()),
            ]
        );
    }
}
