//! Placeholder table for extracted noise regions.
//!
//! Before tokenizing, the parser cuts comments, CDATA sections, script and
//! style bodies, `<code>` bodies, server tags and template tags out of the
//! input and leaves a fixed-width placeholder in their place. This table keeps
//! the original text so rendering can put it back.

use sift_common::warning::warn_once;

/// Prefix shared by every placeholder.
pub const PLACEHOLDER_PREFIX: &str = "___noise___";

/// Number of zero-padded digits following the prefix.
pub const KEY_WIDTH: usize = 5;

/// The largest number of regions a single document can hold.
pub const MAX_ENTRIES: usize = 100_000;

/// Nesting limit when a restored region itself contains placeholders.
const MAX_DEPTH: usize = 16;

/// Marker emitted for a well-formed key with no table entry.
pub const UNDEFINED_KEY_MARKER: &str = "UNDEFINED NOISE FOR KEY: ";

/// Marker emitted for a prefix that is not followed by a full key.
pub const MISSING_KEY_MARKER: &str = "NO NUMERIC NOISE KEY";

/// Original text of every extracted region, indexed by placeholder key.
#[derive(Debug, Clone, Default)]
pub struct NoiseTable {
    entries: Vec<String>,
}

impl NoiseTable {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of stored regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The placeholder text for `key`.
    #[must_use]
    pub fn placeholder(key: usize) -> String {
        format!("{PLACEHOLDER_PREFIX}{key:0width$}", width = KEY_WIDTH)
    }

    /// Store a region and return its placeholder, or `None` once the key
    /// space is exhausted.
    pub fn insert(&mut self, original: &str) -> Option<String> {
        let key = self.entries.len();
        if key >= MAX_ENTRIES {
            return None;
        }
        self.entries.push(original.to_string());
        Some(Self::placeholder(key))
    }

    /// Original text stored under `key`.
    #[must_use]
    pub fn get(&self, key: usize) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterate over stored regions in key order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// First stored region containing `needle`.
    #[must_use]
    pub fn search(&self, needle: &str) -> Option<&str> {
        self.iter().find(|entry| entry.contains(needle))
    }

    /// Replace every placeholder in `text` with its original region.
    ///
    /// Never fails: unknown keys and truncated placeholders are replaced with
    /// a visible marker instead.
    #[must_use]
    pub fn restore(&self, text: &str) -> String {
        if !text.contains(PLACEHOLDER_PREFIX) {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        self.restore_into(text, &mut out, 0);
        out
    }

    fn restore_into(&self, text: &str, out: &mut String, depth: usize) {
        let mut rest = text;
        while let Some(pos) = rest.find(PLACEHOLDER_PREFIX) {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + PLACEHOLDER_PREFIX.len()..];

            let Some(digits) = after.get(..KEY_WIDTH) else {
                warn_once("Noise", "placeholder prefix without a numeric key");
                out.push_str(MISSING_KEY_MARKER);
                rest = after;
                continue;
            };

            let original = digits
                .bytes()
                .all(|b| b.is_ascii_digit())
                .then(|| digits.parse::<usize>().ok())
                .flatten()
                .and_then(|key| self.get(key));

            match original {
                Some(original) if depth < MAX_DEPTH => {
                    self.restore_into(original, out, depth + 1);
                }
                Some(original) => out.push_str(original),
                None => {
                    warn_once("Noise", &format!("no region stored for key {digits}"));
                    out.push_str(UNDEFINED_KEY_MARKER);
                    out.push_str(PLACEHOLDER_PREFIX);
                    out.push_str(digits);
                }
            }
            rest = &after[KEY_WIDTH..];
        }
        out.push_str(rest);
    }
}
