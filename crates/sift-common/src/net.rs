//! HTTP fetch utilities for the document loader.
//!
//! Provides a simple blocking HTTP GET wrapper.

use crate::LoadError;
use std::time::Duration;

/// User-Agent header sent with all requests.
///
/// Mimics a common desktop browser to avoid basic bot detection.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
pub const TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch a URL and return its body as raw bytes.
///
/// The bytes are returned undecoded; charset sniffing happens after parsing.
///
/// # Errors
///
/// Returns [`LoadError::Http`] if the HTTP client cannot be created, the
/// request fails, or the body cannot be read, and [`LoadError::Status`] if the
/// response has a non-success status.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    let http_error = |message: String| LoadError::Http {
        url: url.to_string(),
        message,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(|e| http_error(format!("failed to create HTTP client: {e}")))?;

    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .map_err(|e| http_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    tracing::debug!(url, status = status.as_u16(), "fetched document");

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|e| http_error(format!("failed to read response body: {e}")))
}
