//! Cursor primitives over the preprocessed input.
//!
//! Character sets are ASCII byte strings, so every position the scanner
//! stops at is a UTF-8 boundary and the returned slices are valid `&str`.

/// Whitespace recognised inside tags.
pub const BLANK: &[u8] = b" \t\r\n";
/// Terminates an attribute name.
pub const EQUAL: &[u8] = b" =/>";
/// Terminates a tag name.
pub const SLASH: &[u8] = b" />\r\n\t";
/// Terminates an unquoted attribute value.
pub const ATTR: &[u8] = b" >";

/// A cursor over an immutable buffer.
///
/// The current character is always the byte at the cursor, or `None` at end
/// of input.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    doc: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Start scanning at the beginning of `doc`.
    #[must_use]
    pub const fn new(doc: &'a str) -> Self {
        Self { doc, pos: 0 }
    }

    /// Current byte offset.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor back to an earlier stop.
    pub(crate) fn rewind(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos && self.doc.is_char_boundary(pos));
        self.pos = pos;
    }

    /// The byte under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<u8> {
        self.doc.as_bytes().get(self.pos).copied()
    }

    /// Returns true once the cursor has passed the last byte.
    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.pos >= self.doc.len()
    }

    /// Step over the current byte. Only called on ASCII bytes.
    pub fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    /// The input between two earlier stops.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.doc[start..end]
    }

    /// Advance past a run of bytes in `set`.
    pub fn skip(&mut self, set: &[u8]) {
        let _ = self.copy_skip(set);
    }

    /// Advance past a run of bytes in `set` and return the run.
    pub fn copy_skip(&mut self, set: &[u8]) -> &'a str {
        let start = self.pos;
        let len = self.doc.as_bytes()[start..]
            .iter()
            .take_while(|b| set.contains(b))
            .count();
        self.pos += len;
        &self.doc[start..self.pos]
    }

    /// Advance to the next byte in `set` and return what was passed over.
    pub fn copy_until(&mut self, set: &[u8]) -> &'a str {
        let start = self.pos;
        let len = self.doc.as_bytes()[start..]
            .iter()
            .take_while(|b| !set.contains(b))
            .count();
        self.pos += len;
        &self.doc[start..self.pos]
    }

    /// Advance to the next `ch` and return what was passed over. Without a
    /// further `ch`, returns the remainder and stops at end of input.
    pub fn copy_until_char(&mut self, ch: u8) -> &'a str {
        let start = self.pos;
        self.pos = self.find_from(start, ch).unwrap_or(self.doc.len());
        &self.doc[start..self.pos]
    }

    /// Like [`Self::copy_until_char`], but a `ch` preceded by a backslash does
    /// not end the scan. A `ch` directly under the cursor always does.
    pub fn copy_until_char_escaped(&mut self, ch: u8) -> &'a str {
        let start = self.pos;
        let bytes = self.doc.as_bytes();
        let mut from = start;
        loop {
            let Some(found) = self.find_from(from, ch) else {
                self.pos = self.doc.len();
                return &self.doc[start..];
            };
            if found > start && bytes[found - 1] == b'\\' {
                from = found + 1;
                continue;
            }
            self.pos = found;
            return &self.doc[start..found];
        }
    }

    fn find_from(&self, from: usize, ch: u8) -> Option<usize> {
        self.doc
            .as_bytes()
            .get(from..)?
            .iter()
            .position(|&b| b == ch)
            .map(|offset| from + offset)
    }
}
