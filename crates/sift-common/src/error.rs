//! Errors raised while loading markup.
//!
//! Parsing itself never fails; only acquiring the bytes can.

use thiserror::Error;

/// Error type for loading a document's source text.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a local file.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request could not be made or its body could not be read.
    #[error("request to '{url}' failed: {message}")]
    Http {
        /// The requested URL.
        url: String,
        /// Description of the transport failure.
        message: String,
    },

    /// The server answered with a non-success status code.
    #[error("'{url}' returned HTTP {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The numeric status code.
        status: u16,
    },

    /// The file or response body was empty.
    #[error("'{source_name}' has no content")]
    Empty {
        /// The path or URL that produced no bytes.
        source_name: String,
    },
}
