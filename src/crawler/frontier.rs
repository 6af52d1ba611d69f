use crate::config::Config;
use crate::url::{extension_from_url, strip_fragment, UrlParts};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// The queued/visited pair shares one lock: the two sets express a single
/// invariant (a URL is in at most one of them, and never re-enters).
#[derive(Debug, Default)]
struct UrlSets {
    queued: HashSet<String>,
    visited: HashSet<String>,
}

/// Shared crawl frontier
///
/// A FIFO of URLs waiting to be fetched, plus the bookkeeping that guarantees
/// each URL is processed at most once. All operations are total and
/// non-blocking; workers coordinate termination through [`Frontier::claim`],
/// [`Frontier::release`], and [`Frontier::should_stop`].
///
/// Lock order is sets before pending; `enqueue` holds the set lock while
/// appending to the queue.
pub struct Frontier {
    config: Config,
    pending: Mutex<VecDeque<String>>,
    sets: Mutex<UrlSets>,
    active_workers: AtomicUsize,
}

impl Frontier {
    /// Creates an empty frontier gated by the config's admission rules
    pub fn new(config: &Config) -> Frontier {
        Frontier {
            config: config.clone(),
            pending: Mutex::new(VecDeque::new()),
            sets: Mutex::new(UrlSets::default()),
            active_workers: AtomicUsize::new(0),
        }
    }

    /// Offers a URL to the frontier
    ///
    /// The candidate is canonicalized (fragment stripped, scheme and host
    /// lowercased) and admitted only if it parses, its host is on the domain
    /// allow-list, its extension is empty or allowed, and it has never been
    /// queued or visited before. Returns whether the URL was admitted.
    pub fn enqueue(&self, url: &str) -> bool {
        let stripped = strip_fragment(url);
        if stripped.is_empty() {
            return false;
        }
        let Some(parts) = UrlParts::parse(stripped) else {
            return false;
        };
        if !self.config.is_allowed_domain(&parts.host) {
            return false;
        }
        let canonical = parts.to_url_string();
        if !self
            .config
            .is_allowed_extension(&extension_from_url(&canonical))
        {
            return false;
        }

        let mut sets = self.sets.lock().expect("frontier set lock poisoned");
        if sets.visited.contains(&canonical) || sets.queued.contains(&canonical) {
            return false;
        }
        sets.queued.insert(canonical.clone());
        self.pending
            .lock()
            .expect("frontier queue lock poisoned")
            .push_back(canonical);
        true
    }

    /// Claims the next URL for processing
    ///
    /// Pops the queue head, moves it from queued to visited, and counts the
    /// caller as active, all atomically. Returns `None` without touching any
    /// state when the queue is empty. A claimed URL stays visited forever,
    /// whatever the fetch outcome.
    pub fn claim(&self) -> Option<String> {
        let mut sets = self.sets.lock().expect("frontier set lock poisoned");
        let mut pending = self.pending.lock().expect("frontier queue lock poisoned");
        let url = pending.pop_front()?;
        sets.queued.remove(&url);
        sets.visited.insert(url.clone());
        // Counted active before the queue lock drops, so should_stop() can
        // never observe an empty queue with this claim in flight but uncounted
        self.active_workers.fetch_add(1, Ordering::SeqCst);
        Some(url)
    }

    /// Marks the caller as done with its claimed URL
    pub fn release(&self) {
        let _ = self
            .active_workers
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// True when the reachable set is exhausted: nothing pending and no
    /// worker mid-fetch
    pub fn should_stop(&self) -> bool {
        let pending_empty = self
            .pending
            .lock()
            .expect("frontier queue lock poisoned")
            .is_empty();
        pending_empty && self.active_workers.load(Ordering::SeqCst) == 0
    }

    /// Number of URLs ever claimed
    pub fn visited_count(&self) -> usize {
        self.sets
            .lock()
            .expect("frontier set lock poisoned")
            .visited
            .len()
    }

    /// Number of URLs waiting in the queue
    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .expect("frontier queue lock poisoned")
            .len()
    }
}
