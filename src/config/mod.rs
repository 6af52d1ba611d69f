//! Configuration module for Falcon-Crawl
//!
//! This module locates and parses the pipeline configuration document
//! (`config/pipeline.json`), applies defaults for anything the document
//! omits, and resolves output paths against the discovered repo root.
//!
//! # Example
//!
//! ```no_run
//! use falcon_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new(".")).unwrap();
//! println!("Crawling {} with {} workers", config.start_url, config.crawler_threads);
//! ```

mod loader;
mod types;

pub use loader::{find_repo_root, load_config, CONFIG_REL_PATH};
pub use types::Config;
