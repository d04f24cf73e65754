//! Acquiring raw markup from a path or a URL.

use crate::{LoadError, net};
use std::fs;

/// Where a document's bytes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// An `http://` or `https://` URL.
    Remote,
    /// Anything else, treated as a local file path.
    Local,
}

impl SourceKind {
    /// Classify a source string by its scheme.
    #[must_use]
    pub fn of(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Remote
        } else {
            Self::Local
        }
    }
}

/// Read a local file into memory.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read and
/// [`LoadError::Empty`] when it has no content.
pub fn read_file(path: &str) -> Result<Vec<u8>, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })?;
    non_empty(path, bytes)
}

/// Fetch a remote document into memory.
///
/// # Errors
///
/// Propagates [`net::fetch_bytes`] failures and returns [`LoadError::Empty`]
/// for an empty body.
pub fn read_url(url: &str) -> Result<Vec<u8>, LoadError> {
    non_empty(url, net::fetch_bytes(url)?)
}

/// Load raw markup from a file path or URL, dispatching on the scheme.
///
/// # Errors
///
/// See [`read_file`] and [`read_url`].
pub fn load_source(source: &str) -> Result<Vec<u8>, LoadError> {
    match SourceKind::of(source) {
        SourceKind::Remote => read_url(source),
        SourceKind::Local => read_file(source),
    }
}

fn non_empty(source_name: &str, bytes: Vec<u8>) -> Result<Vec<u8>, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::Empty {
            source_name: source_name.to_string(),
        });
    }
    Ok(bytes)
}
