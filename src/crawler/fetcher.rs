//! HTTP fetcher implementation
//!
//! One GET per URL: redirects followed, whole-request timeout, body captured
//! as raw bytes together with the final `Content-Type` header. Every failure
//! mode (DNS, TLS, timeout, connection reset, non-success status) collapses
//! into an empty-body record after one logged line; the worker loop treats
//! that as a silent skip.

use reqwest::blocking::Client;
use std::time::Duration;

/// User agent presented on every request
pub const USER_AGENT: &str = "FalconGraphCrawler/1.0";

/// Outcome of fetching a single URL
///
/// An empty body signals failure; successful fetches of genuinely empty
/// responses are indistinguishable from failures and are skipped the same way.
#[derive(Debug, Clone, Default)]
pub struct FetchRecord {
    /// Raw response body
    pub body: Vec<u8>,

    /// Trimmed `Content-Type` header value, empty if absent
    pub content_type: String,
}

impl FetchRecord {
    /// The empty record returned for failed fetches
    pub fn failed() -> FetchRecord {
        FetchRecord::default()
    }

    /// True when the fetch produced nothing worth persisting
    pub fn is_failure(&self) -> bool {
        self.body.is_empty()
    }
}

/// Capability interface over the HTTP client, so tests can substitute
/// in-memory fakes for the network
pub trait Fetch: Sync {
    /// Fetches one URL; never fails, returning an empty record instead
    fn fetch(&self, url: &str) -> FetchRecord;
}

/// Production fetcher backed by a blocking reqwest client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the HTTP client
    ///
    /// Redirects are followed up to the client's default limit. A
    /// non-positive timeout disables the deadline entirely.
    pub fn new(timeout_seconds: f64) -> Result<HttpFetcher, reqwest::Error> {
        let mut builder = Client::builder().user_agent(USER_AGENT).gzip(true);
        if timeout_seconds > 0.0 {
            builder = builder.timeout(Duration::from_secs_f64(timeout_seconds));
        }
        Ok(HttpFetcher {
            client: builder.build()?,
        })
    }

    fn try_fetch(&self, url: &str) -> Result<FetchRecord, reqwest::Error> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        let body = response.bytes()?.to_vec();
        Ok(FetchRecord { body, content_type })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> FetchRecord {
        match self.try_fetch(url) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                FetchRecord::failed()
            }
        }
    }
}
