//! Display-size heuristics for `img` elements.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use sift_dom::Node;

/// Width and height in pixels; `-1` when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplaySize {
    /// Width in pixels.
    pub width: i64,
    /// Height in pixels.
    pub height: i64,
}

fn style_declaration() -> Option<&'static Regex> {
    static COMPILED: OnceLock<Option<Regex>> = OnceLock::new();
    COMPILED
        .get_or_init(|| Regex::new(r"([\w-]+)\s*:\s*([^;]+)\s*;?").ok())
        .as_ref()
}

/// Guess how large an image is displayed.
///
/// `width` and `height` attributes are used first. A dimension still missing
/// is taken from the inline `style` when it is a whole number of `px`.
/// Returns `None` for anything but `img`.
#[must_use]
pub fn display_size(node: &Node) -> Option<DisplaySize> {
    if !node.tag.eq_ignore_ascii_case("img") {
        return None;
    }

    let from_attr = |name: &str| node.get_attr(name).and_then(|v| v.trim().parse::<i64>().ok());
    let mut width = from_attr("width");
    let mut height = from_attr("height");

    if let Some(style) = node.get_attr("style")
        && let Some(re) = style_declaration()
    {
        for caps in re.captures_iter(style) {
            let (Some(property), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let slot = match property.as_str().to_ascii_lowercase().as_str() {
                "width" => &mut width,
                "height" => &mut height,
                _ => continue,
            };
            if slot.is_none() {
                *slot = pixels(value.as_str());
            }
        }
    }

    Some(DisplaySize {
        width: width.unwrap_or(-1),
        height: height.unwrap_or(-1),
    })
}

/// Parse `"120px"` as `120`. Zero and non-integers are rejected.
fn pixels(value: &str) -> Option<i64> {
    let value = value.trim();
    let cut = value.len().checked_sub(2)?;
    if !value.is_char_boundary(cut) || !value[cut..].eq_ignore_ascii_case("px") {
        return None;
    }
    value[..cut].parse::<i64>().ok().filter(|&n| n != 0)
}
