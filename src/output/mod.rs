//! Corpus output for Falcon-Crawl
//!
//! Fetched artifacts land in a flat on-disk layout under the configured
//! `raw_output` root: HTML under `html/`, everything else under `files/`,
//! with one tab-separated metadata row per artifact in `metadata.tsv`.

mod sink;

pub use sink::{sanitize_file_name, ArtifactKind, Sink, SinkError};
