//! URL handling module for Falcon-Crawl
//!
//! This module provides canonical URL parsing, relative-reference resolution,
//! fragment stripping, and extension classification. Canonical URLs are plain
//! strings of the form `scheme://host/path`; two URLs are the same crawl
//! target exactly when their canonical strings are byte-equal.

mod parts;
mod resolve;

pub use parts::UrlParts;
pub use resolve::{extension_from_url, make_absolute, query_indicates_download, strip_fragment};
