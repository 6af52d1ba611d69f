use std::collections::HashSet;
use std::path::PathBuf;

/// Extensions admitted into the frontier when the config names none
const DEFAULT_EXTENSIONS: &[&str] = &[
    ".html", ".htm", ".php", ".asp", ".aspx", ".jsp", ".pdf", ".txt", ".json", ".csv", ".xml",
    ".doc", ".docx", ".ppt", ".pptx", ".xls", ".xlsx", ".rtf", ".srt", ".vtt", ".jpg", ".jpeg",
    ".png", ".gif", ".svg", ".zip", ".tar", ".gz", ".mp3", ".mp4",
];

/// Crawler configuration
///
/// Every field has a default, so a missing config document yields a usable
/// crawl of the default campus site.
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial seed URL
    pub start_url: String,

    /// Host allow-list, matched exactly against lowercased hosts
    pub allowed_domains: Vec<String>,

    /// Root directory for `html/`, `files/`, and `metadata.tsv`
    pub raw_output: PathBuf,

    /// Cap on successful fetches; negative means unlimited
    pub max_pages: i64,

    /// Per-worker sleep after each fetch, in seconds
    pub request_delay_seconds: f64,

    /// Whole-request timeout, in seconds
    pub timeout_seconds: f64,

    /// Worker-pool size
    pub crawler_threads: usize,

    /// Path extensions admitted into the frontier (leading dot included)
    pub allowed_extensions: HashSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_url: "https://www.bgsu.edu".to_string(),
            allowed_domains: vec!["www.bgsu.edu".to_string(), "bgsu.edu".to_string()],
            raw_output: PathBuf::from("data").join("raw"),
            max_pages: -1,
            request_delay_seconds: 0.25,
            timeout_seconds: 20.0,
            crawler_threads: num_cpus::get().max(1),
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl Config {
    /// Returns true if the host is on the allow-list
    pub fn is_allowed_domain(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.allowed_domains.iter().any(|d| *d == host)
    }

    /// Returns true if the extension is empty or on the allow-list
    pub fn is_allowed_extension(&self, extension: &str) -> bool {
        extension.is_empty() || self.allowed_extensions.contains(extension)
    }
}
