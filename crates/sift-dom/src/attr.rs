//! Attributes and the formatting captured around them.
//!
//! The tree builder records every whitespace run and quote style it sees
//! inside an opening tag so the renderer can reproduce the tag byte for byte.

/// Quote style of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quote {
    /// `name="value"`
    #[default]
    Double,
    /// `name='value'`
    Single,
    /// `name=value`, or a presence-only attribute.
    None,
}

impl Quote {
    /// The quote character as text (empty for unquoted values).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Double => "\"",
            Self::Single => "'",
            Self::None => "",
        }
    }
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Present without a value, e.g. `checked`.
    Flag,
    /// A (possibly empty) string value.
    Text(String),
}

impl AttrValue {
    /// The value as a string slice; flags read as `""`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Flag => "",
            Self::Text(value) => value,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Whitespace and quoting around one attribute.
///
/// `<a␣href␣=␣"x">` stores `" "` in all three whitespace fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttrFormat {
    /// Whitespace preceding the attribute name.
    pub before_name: String,
    /// Whitespace between the name and `=`.
    pub before_eq: String,
    /// Whitespace between `=` and the value.
    pub after_eq: String,
    /// Quote style of the value.
    pub quote: Quote,
}

/// One attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name (lowercased when the parser folds case).
    pub name: String,
    /// The value, with noise placeholders already restored.
    pub value: AttrValue,
    /// Formatting needed to re-emit the attribute.
    pub format: AttrFormat,
}

impl Attribute {
    /// An attribute added after parsing: one leading space, double quotes.
    #[must_use]
    pub fn appended(name: &str, value: AttrValue) -> Self {
        let quote = match value {
            AttrValue::Flag => Quote::None,
            AttrValue::Text(_) => Quote::Double,
        };
        Self {
            name: name.to_string(),
            value,
            format: AttrFormat {
                before_name: " ".to_string(),
                quote,
                ..AttrFormat::default()
            },
        }
    }

    /// Append this attribute's markup, including its leading whitespace.
    pub fn write_markup(&self, out: &mut String) {
        out.push_str(&self.format.before_name);
        out.push_str(&self.name);
        if let AttrValue::Text(value) = &self.value {
            let quote = self.format.quote.as_str();
            out.push_str(&self.format.before_eq);
            out.push('=');
            out.push_str(&self.format.after_eq);
            out.push_str(quote);
            out.push_str(value);
            out.push_str(quote);
        }
    }
}
