//! Falcon-Crawl: a parallel campus web crawler
//!
//! This crate implements the ingestion stage of a campus knowledge pipeline:
//! starting from a seed URL it walks a university's web presence in parallel,
//! writing fetched pages and documents into a local corpus directory together
//! with a tab-separated metadata log.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Falcon-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// A missing or unreadable config document is not an error (the crawler
/// proceeds with defaults); only a document that exists and is not valid
/// JSON is fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias for Falcon-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{find_repo_root, load_config, Config};
pub use crawler::{Crawler, Fetch, FetchRecord, HttpFetcher};
pub use url::{make_absolute, strip_fragment, UrlParts};
