//! Common utilities for the sift HTML toolkit.
//!
//! This crate provides shared infrastructure used by all sift components:
//! - **Warning System** - deduplicated warnings for recoverable oddities in
//!   markup, noise placeholders and selectors
//! - **Source Loading** - reading raw markup from local files or over HTTP
//! - **Errors** - the [`LoadError`] type surfaced by the loaders

pub mod error;
pub mod net;
pub mod source;
pub mod warning;

pub use error::LoadError;
pub use source::{SourceKind, load_source};
