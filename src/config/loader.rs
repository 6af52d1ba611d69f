use crate::config::types::Config;
use crate::ConfigResult;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Location of the pipeline config document relative to the repo root
pub const CONFIG_REL_PATH: &str = "config/pipeline.json";

/// The config document as written on disk
///
/// Every field is optional; unknown keys are ignored. Defaults and
/// normalization are applied afterwards by [`load_config`].
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    start_url: Option<String>,
    allowed_domains: Option<Vec<String>>,
    raw_output: Option<String>,
    max_pages: Option<i64>,
    delay: Option<f64>,
    timeout: Option<f64>,
    crawler_threads: Option<i64>,
    extensions: Option<Vec<String>>,
}

/// Walks upward from `start` looking for the directory that contains
/// `config/pipeline.json`
///
/// The first ancestor holding the document is taken as the repo root and
/// anchors all relative output paths. If no ancestor qualifies, `start`
/// itself is returned and defaults apply.
pub fn find_repo_root(start: &Path) -> PathBuf {
    let mut dir = start;
    loop {
        if dir.join(CONFIG_REL_PATH).exists() {
            return dir.to_path_buf();
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return start.to_path_buf(),
        }
    }
}

/// Loads the crawler configuration, searching upward from `start_dir`
///
/// A missing document is not an error: the defaults describe a full crawl of
/// the default campus site. Only a document that exists but is not valid
/// JSON fails.
pub fn load_config(start_dir: &Path) -> ConfigResult<Config> {
    let repo_root = find_repo_root(start_dir);
    let config_path = repo_root.join(CONFIG_REL_PATH);

    let raw = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(data) => {
                tracing::info!("Using config at {}", config_path.display());
                serde_json::from_str::<RawConfig>(&data)?
            }
            Err(e) => {
                tracing::warn!(
                    "Config at {} unreadable ({}). Using defaults.",
                    config_path.display(),
                    e
                );
                RawConfig::default()
            }
        }
    } else {
        tracing::warn!(
            "Config not found starting from {}. Using defaults.",
            start_dir.display()
        );
        RawConfig::default()
    };

    Ok(apply(raw, &repo_root))
}

/// Merges the raw document over the defaults and normalizes the result
fn apply(raw: RawConfig, repo_root: &Path) -> Config {
    let mut config = Config::default();

    if let Some(start_url) = raw.start_url {
        config.start_url = start_url;
    }
    if let Some(domains) = raw.allowed_domains {
        if !domains.is_empty() {
            config.allowed_domains = domains;
        }
    }
    config.raw_output = resolve_path(
        repo_root,
        raw.raw_output.as_deref().unwrap_or("data/raw"),
    );
    if let Some(max_pages) = raw.max_pages {
        config.max_pages = max_pages;
    }
    if let Some(delay) = raw.delay {
        config.request_delay_seconds = delay;
    }
    if let Some(timeout) = raw.timeout {
        config.timeout_seconds = timeout;
    }
    // Non-positive thread counts fall back to hardware concurrency
    if let Some(threads) = raw.crawler_threads {
        if threads > 0 {
            config.crawler_threads = threads as usize;
        }
    }
    if let Some(extensions) = raw.extensions {
        let normalized: std::collections::HashSet<String> = extensions
            .into_iter()
            .filter(|e| !e.is_empty())
            .map(|e| {
                if e.starts_with('.') {
                    e.to_lowercase()
                } else {
                    format!(".{}", e.to_lowercase())
                }
            })
            .collect();
        if !normalized.is_empty() {
            config.allowed_extensions = normalized;
        }
    }

    for domain in &mut config.allowed_domains {
        *domain = domain.to_lowercase();
    }

    config
}

fn resolve_path(repo_root: &Path, raw_path: &str) -> PathBuf {
    if raw_path.is_empty() {
        return repo_root.to_path_buf();
    }
    let path = Path::new(raw_path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}
