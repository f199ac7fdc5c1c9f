//! Crawl frontier and visited tracking
//!
//! This module handles:
//! - The internal and external "seen" sets used as the dedup gate
//! - The explicit LIFO work stack that keeps the traversal depth-first

use std::collections::HashSet;
use url::Url;

/// A URL waiting on the work stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch
    pub url: Url,

    /// Distance from the seed (the seed is at depth 0)
    pub depth: u32,
}

/// Per-run frontier state
///
/// A URL is classified once: whichever set sees it first keeps it, so the
/// internal and external sets never overlap. Every URL scheduled for fetching
/// has been inserted into the internal set first.
#[derive(Debug, Default)]
pub struct Frontier {
    internal_seen: HashSet<String>,
    external_seen: HashSet<String>,
    stack: Vec<QueuedUrl>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    ///
    /// The seed is marked as seen and placed on the stack at depth 0. Its
    /// fragment is dropped, matching the form in which body links are seen.
    pub fn with_seed(mut seed: Url) -> Self {
        seed.set_fragment(None);
        let mut frontier = Self::default();
        frontier.internal_seen.insert(seed.to_string());
        frontier.stack.push(QueuedUrl {
            url: seed,
            depth: 0,
        });
        frontier
    }

    /// Records an article or translation candidate
    ///
    /// Returns true only if the URL was not seen before in either set.
    pub fn observe_internal(&mut self, url: &str) -> bool {
        if self.external_seen.contains(url) {
            return false;
        }
        self.internal_seen.insert(url.to_string())
    }

    /// Records a link that leaves the site
    ///
    /// Returns true if the URL was newly recorded. A URL already known as
    /// internal stays internal.
    pub fn observe_external(&mut self, url: &str) -> bool {
        if self.internal_seen.contains(url) {
            return false;
        }
        self.external_seen.insert(url.to_string())
    }

    /// Pushes a batch of sibling links discovered on one page
    ///
    /// Siblings go on in reverse so the first one discovered is popped first.
    pub fn schedule(&mut self, siblings: Vec<QueuedUrl>) {
        self.stack.extend(siblings.into_iter().rev());
    }

    /// Pops the next URL to fetch
    pub fn next(&mut self) -> Option<QueuedUrl> {
        self.stack.pop()
    }

    /// Pops up to `n` URLs, in the order they would be popped one at a time
    pub fn next_batch(&mut self, n: usize) -> Vec<QueuedUrl> {
        let mut batch = Vec::with_capacity(n.min(self.stack.len()));
        while batch.len() < n {
            match self.next() {
                Some(queued) => batch.push(queued),
                None => break,
            }
        }
        batch
    }

    /// Returns true if the work stack is empty
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of URLs waiting on the stack
    pub fn pending(&self) -> usize {
        self.stack.len()
    }

    /// Number of URLs ever accepted as internal
    pub fn internal_count(&self) -> usize {
        self.internal_seen.len()
    }

    /// Number of URLs recorded as external
    pub fn external_count(&self) -> usize {
        self.external_seen.len()
    }

    pub fn is_internal(&self, url: &str) -> bool {
        self.internal_seen.contains(url)
    }

    pub fn is_external(&self, url: &str) -> bool {
        self.external_seen.contains(url)
    }
}
