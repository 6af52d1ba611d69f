//! Crawler module: worker pool, fetch loop, and frontier
//!
//! The crawler runs a fixed pool of OS threads over a shared frontier.
//! Each worker claims a URL, fetches it with blocking I/O, persists the
//! result, feeds discovered links back into the frontier, and sleeps the
//! politeness delay. Workers exit cooperatively once the queue is empty and
//! nobody is mid-fetch, or as soon as the page cap is reached.

mod extractor;
mod fetcher;
mod frontier;

pub use extractor::extract_links;
pub use fetcher::{Fetch, FetchRecord, HttpFetcher, USER_AGENT};
pub use frontier::Frontier;

use crate::config::Config;
use crate::output::{ArtifactKind, Sink, SinkError};
use crate::url::UrlParts;
use crate::Result;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

/// A parallel crawl over one site
///
/// All crawl state (frontier, counters, stop flag) lives on the instance, so
/// independent crawls can coexist in one process.
pub struct Crawler<F: Fetch = HttpFetcher> {
    config: Config,
    frontier: Frontier,
    sink: Sink,
    fetcher: F,
    stop: AtomicBool,
    pages_downloaded: AtomicI64,
}

impl Crawler<HttpFetcher> {
    /// Creates a crawler with the production HTTP fetcher
    ///
    /// Fails if the output layout cannot be created or the HTTP client
    /// cannot be built.
    pub fn new(config: Config) -> Result<Crawler<HttpFetcher>> {
        let fetcher = HttpFetcher::new(config.timeout_seconds)?;
        Crawler::with_fetcher(config, fetcher)
    }
}

impl<F: Fetch> Crawler<F> {
    /// Creates a crawler over a custom fetcher implementation
    pub fn with_fetcher(config: Config, fetcher: F) -> Result<Crawler<F>> {
        let sink = Sink::new(&config.raw_output)?;
        let frontier = Frontier::new(&config);
        Ok(Crawler {
            config,
            frontier,
            sink,
            fetcher,
            stop: AtomicBool::new(false),
            pages_downloaded: AtomicI64::new(0),
        })
    }

    /// Runs the crawl to completion
    ///
    /// Seeds the frontier with the configured start URL, spawns the worker
    /// pool, and returns once every worker has exited: either because the
    /// reachable set is exhausted or because the page cap was hit.
    pub fn run(&self) {
        tracing::info!(
            "Starting crawl of {} with {} workers",
            self.config.start_url,
            self.config.crawler_threads
        );
        self.frontier.enqueue(&self.config.start_url);

        std::thread::scope(|scope| {
            for _ in 0..self.config.crawler_threads {
                scope.spawn(|| self.worker_loop());
            }
        });

        tracing::info!(
            "Crawl finished: {} pages downloaded, {} URLs visited",
            self.pages_downloaded(),
            self.frontier.visited_count()
        );
    }

    /// Number of successful fetches so far
    pub fn pages_downloaded(&self) -> i64 {
        self.pages_downloaded.load(Ordering::SeqCst)
    }

    /// The crawl frontier
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    fn worker_loop(&self) {
        while !self.stop.load(Ordering::SeqCst) {
            let Some(url) = self.frontier.claim() else {
                if self.frontier.should_stop() {
                    self.stop.store(true, Ordering::SeqCst);
                    break;
                }
                std::thread::yield_now();
                continue;
            };

            // The cap is checked again right before fetching; claims that
            // slipped past it are dropped uncounted (a claim is permanent,
            // so the URL stays visited)
            if self.cap_reached() {
                self.stop.store(true, Ordering::SeqCst);
                self.frontier.release();
                break;
            }

            let outcome = self.process(&url);
            self.frontier.release();
            if let Err(e) = outcome {
                // Disk failures end this worker; the rest of the pool
                // carries on
                tracing::error!("Worker exiting, output failed for {}: {}", url, e);
                break;
            }
        }
    }

    /// Fetch, persist, and expand one claimed URL
    fn process(&self, url: &str) -> std::result::Result<(), SinkError> {
        let record = self.fetcher.fetch(url);
        if !record.is_failure() {
            if let Some(parts) = UrlParts::parse(url) {
                let saved = self
                    .sink
                    .persist(url, &parts, &record.body, &record.content_type)?;
                tracing::debug!("Saved {} as {}", url, saved);

                if ArtifactKind::classify(&record.content_type) == ArtifactKind::Html {
                    let html = String::from_utf8_lossy(&record.body);
                    for link in extract_links(&html, url) {
                        self.frontier.enqueue(&link);
                    }
                }

                let downloaded = self.pages_downloaded.fetch_add(1, Ordering::SeqCst) + 1;
                if self.config.max_pages >= 0 && downloaded >= self.config.max_pages {
                    self.stop.store(true, Ordering::SeqCst);
                }
            }
        }

        if self.config.request_delay_seconds > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(self.config.request_delay_seconds));
        }
        Ok(())
    }

    fn cap_reached(&self) -> bool {
        self.config.max_pages >= 0 && self.pages_downloaded() >= self.config.max_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// In-memory fetcher serving a fixed URL-to-response map
    struct FakeFetcher {
        pages: HashMap<String, FetchRecord>,
    }

    impl FakeFetcher {
        fn new() -> FakeFetcher {
            FakeFetcher {
                pages: HashMap::new(),
            }
        }

        fn with_html(mut self, url: &str, body: &str) -> FakeFetcher {
            self.pages.insert(
                url.to_string(),
                FetchRecord {
                    body: body.as_bytes().to_vec(),
                    content_type: "text/html".to_string(),
                },
            );
            self
        }

        fn with_binary(mut self, url: &str, body: &[u8], content_type: &str) -> FakeFetcher {
            self.pages.insert(
                url.to_string(),
                FetchRecord {
                    body: body.to_vec(),
                    content_type: content_type.to_string(),
                },
            );
            self
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch(&self, url: &str) -> FetchRecord {
            self.pages.get(url).cloned().unwrap_or_default()
        }
    }

    fn test_config(output: &TempDir) -> Config {
        let mut config = Config::default();
        config.start_url = "https://campus.test/".to_string();
        config.allowed_domains = vec!["campus.test".to_string()];
        config.raw_output = output.path().to_path_buf();
        config.request_delay_seconds = 0.0;
        config.crawler_threads = 2;
        config
    }

    fn metadata_rows(output: &TempDir) -> Vec<String> {
        std::fs::read_to_string(output.path().join("metadata.tsv"))
            .unwrap()
            .lines()
            .skip(1)
            .map(|line| line.to_string())
            .collect()
    }

    #[test]
    fn test_crawl_follows_links() {
        let output = TempDir::new().unwrap();
        let fetcher = FakeFetcher::new()
            .with_html(
                "https://campus.test/",
                r#"<a href="/a">a</a><a href="/b">b</a>"#,
            )
            .with_html("https://campus.test/a", "no links")
            .with_html("https://campus.test/b", "no links");

        let crawler = Crawler::with_fetcher(test_config(&output), fetcher).unwrap();
        crawler.run();

        assert_eq!(crawler.pages_downloaded(), 3);
        assert_eq!(crawler.frontier().visited_count(), 3);
        assert_eq!(metadata_rows(&output).len(), 3);
    }

    #[test]
    fn test_failed_fetch_is_visited_but_unrecorded() {
        let output = TempDir::new().unwrap();
        let fetcher = FakeFetcher::new().with_html(
            "https://campus.test/",
            r#"<a href="/missing">dead</a>"#,
        );

        let crawler = Crawler::with_fetcher(test_config(&output), fetcher).unwrap();
        crawler.run();

        assert_eq!(crawler.pages_downloaded(), 1);
        assert_eq!(crawler.frontier().visited_count(), 2);
        assert_eq!(metadata_rows(&output).len(), 1);
    }

    #[test]
    fn test_binary_pages_do_not_expand() {
        let output = TempDir::new().unwrap();
        let fetcher = FakeFetcher::new()
            .with_html("https://campus.test/", r#"<a href="/doc.pdf">doc</a>"#)
            .with_binary(
                "https://campus.test/doc.pdf",
                b"%PDF <a href=\"/hidden\">x</a>",
                "application/pdf",
            );

        let crawler = Crawler::with_fetcher(test_config(&output), fetcher).unwrap();
        crawler.run();

        // The PDF body contains an href, but binary artifacts are not scanned
        assert_eq!(crawler.frontier().visited_count(), 2);
        assert_eq!(crawler.pages_downloaded(), 2);
    }

    #[test]
    fn test_max_pages_zero_fetches_nothing() {
        let output = TempDir::new().unwrap();
        let fetcher =
            FakeFetcher::new().with_html("https://campus.test/", r#"<a href="/a">a</a>"#);

        let mut config = test_config(&output);
        config.max_pages = 0;
        let crawler = Crawler::with_fetcher(config, fetcher).unwrap();
        crawler.run();

        assert_eq!(crawler.pages_downloaded(), 0);
        assert!(metadata_rows(&output).is_empty());
    }

    #[test]
    fn test_max_pages_caps_single_worker_exactly() {
        let output = TempDir::new().unwrap();
        let mut fetcher =
            FakeFetcher::new().with_html(
                "https://campus.test/",
                &(1..=10)
                    .map(|i| format!(r#"<a href="/page{i}">p</a>"#))
                    .collect::<String>(),
            );
        for i in 1..=10 {
            fetcher = fetcher.with_html(&format!("https://campus.test/page{i}"), "leaf");
        }

        let mut config = test_config(&output);
        config.max_pages = 3;
        config.crawler_threads = 1;
        let crawler = Crawler::with_fetcher(config, fetcher).unwrap();
        crawler.run();

        assert_eq!(crawler.pages_downloaded(), 3);
        assert_eq!(metadata_rows(&output).len(), 3);
    }

    #[test]
    fn test_offsite_links_never_fetched() {
        let output = TempDir::new().unwrap();
        let fetcher = FakeFetcher::new()
            .with_html(
                "https://campus.test/",
                r#"<a href="https://other.test/x">ext</a><a href="/b">b</a>"#,
            )
            .with_html("https://campus.test/b", "leaf")
            .with_html("https://other.test/x", "should never be fetched");

        let crawler = Crawler::with_fetcher(test_config(&output), fetcher).unwrap();
        crawler.run();

        assert_eq!(crawler.pages_downloaded(), 2);
        for row in metadata_rows(&output) {
            assert!(row.starts_with("https://campus.test/"));
        }
    }
}
