//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Resetting storage before the run
//! - Managing the frontier stack
//! - Coordinating fetching, extraction, persistence and link discovery
//! - Handling cancellation
//!
//! Fetches may run concurrently, but every fetched page is processed in the
//! coordinator task in pop order, so the frontier has a single writer and a
//! page's link edges are always written after its page row.

use crate::config::{Config, ExtractConfig, TextMode};
use crate::crawler::fetcher::{FetchedPage, Fetcher};
use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::extract::{extract, tokenize, HtmlDocument, PageDocument};
use crate::storage::Storage;
use crate::url::{classify, classify_translation, language_code, LinkKind, LinkRules};
use crate::WikiError;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Summary of a finished (or cancelled) crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Page rows written
    pub pages_stored: u64,

    /// Link edges written
    pub edges_stored: u64,

    /// Media rows written
    pub media_stored: u64,

    /// Novel internal links left unfetched because of the recursion limit
    pub dangling: u64,

    /// Distinct external URLs recorded
    pub external_seen: u64,

    /// Pages skipped for a missing heading or content region
    pub malformed_skipped: u64,

    /// Pages whose redirect target had already been discovered
    pub redirect_duplicates: u64,

    /// Whether the crawl stopped because of cancellation
    pub cancelled: bool,
}

/// Crawl behavior taken from the configuration
#[derive(Debug, Clone)]
struct CrawlSettings {
    recursion_limit: u32,
    concurrency: usize,
    abort_on_malformed: bool,
    rules: LinkRules,
    native_language: String,
    extract: ExtractConfig,
}

impl From<&Config> for CrawlSettings {
    fn from(config: &Config) -> Self {
        Self {
            recursion_limit: config.crawler.recursion_limit,
            concurrency: config.crawler.max_concurrent_fetches.max(1) as usize,
            abort_on_malformed: config.crawler.abort_on_malformed,
            rules: LinkRules::from(&config.site),
            native_language: config.site.native_language.clone(),
            extract: config.extract.clone(),
        }
    }
}

/// What happened to one fetched page
enum PageOutcome {
    Stored,
    Malformed,
    RedirectDuplicate,
}

/// Main crawler coordinator structure
pub struct Coordinator<F, S> {
    settings: CrawlSettings,
    fetcher: F,
    storage: S,
    frontier: Frontier,
    cancel: CancellationToken,
    report: CrawlReport,
}

impl<F: Fetcher, S: Storage> Coordinator<F, S> {
    /// Creates a new coordinator instance
    ///
    /// The storage schema is reset here, so a failure to prepare the database
    /// aborts before any fetch.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fetcher` - Page source
    /// * `storage` - Persistence gateway, owned for the whole run
    /// * `cancel` - Token checked before every fetch batch
    pub fn new(
        config: &Config,
        fetcher: F,
        mut storage: S,
        cancel: CancellationToken,
    ) -> Result<Self, WikiError> {
        let seed = Url::parse(&config.crawler.seed_url)?;

        storage.reset_schema().map_err(|e| {
            WikiError::PersistenceUnavailable(format!("cannot reset schema: {}", e))
        })?;

        Ok(Self {
            settings: CrawlSettings::from(config),
            fetcher,
            storage,
            frontier: Frontier::with_seed(seed),
            cancel,
            report: CrawlReport::default(),
        })
    }

    /// Runs the main crawl loop
    ///
    /// Pops up to `max-concurrent-fetches` URLs, fetches them, then processes
    /// the results in pop order. Stops when the stack is empty, on the first
    /// fatal error, or when the token is cancelled.
    pub async fn run(&mut self) -> Result<CrawlReport, WikiError> {
        tracing::info!(
            "Starting crawl (recursion limit {}, {} concurrent fetch(es))",
            self.settings.recursion_limit,
            self.settings.concurrency
        );
        let start_time = std::time::Instant::now();

        while !self.frontier.is_empty() {
            if self.cancel.is_cancelled() {
                tracing::warn!(
                    "Crawl cancelled with {} URL(s) still stacked",
                    self.frontier.pending()
                );
                self.report.cancelled = true;
                break;
            }

            let batch = self.frontier.next_batch(self.settings.concurrency);
            let fetcher = &self.fetcher;
            let results: Vec<Result<FetchedPage, WikiError>> =
                stream::iter(batch.iter().map(|queued| fetcher.fetch(&queued.url)))
                    .buffered(self.settings.concurrency)
                    .collect()
                    .await;

            for (queued, result) in batch.iter().zip(results) {
                let fetched = result.map_err(|e| {
                    tracing::error!("Aborting crawl at {}: {}", queued.url, e);
                    e
                })?;

                match self.process_page(queued, &fetched)? {
                    PageOutcome::Stored => self.report.pages_stored += 1,
                    PageOutcome::Malformed => self.report.malformed_skipped += 1,
                    PageOutcome::RedirectDuplicate => self.report.redirect_duplicates += 1,
                }
            }
        }

        self.report.external_seen = self.frontier.external_count() as u64;

        tracing::info!(
            "Crawl finished: {} pages, {} edges, {} media, {} dangling in {:?}",
            self.report.pages_stored,
            self.report.edges_stored,
            self.report.media_stored,
            self.report.dangling,
            start_time.elapsed()
        );

        Ok(self.report.clone())
    }

    /// Returns the storage backend, e.g. to read results after a run
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the frontier state
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Extracts, persists and expands one fetched page
    ///
    /// Kept synchronous: the parsed document never lives across an await.
    fn process_page(
        &mut self,
        queued: &QueuedUrl,
        fetched: &FetchedPage,
    ) -> Result<PageOutcome, WikiError> {
        tracing::debug!(
            "Fetched {} (HTTP {}, {} bytes, depth {})",
            fetched.final_url,
            fetched.status,
            fetched.body.len(),
            queued.depth
        );

        let page_url = if fetched.was_redirected() {
            if !self.frontier.observe_internal(fetched.final_url.as_str()) {
                tracing::info!(
                    "Skipping {}: redirects to already discovered {}",
                    queued.url,
                    fetched.final_url
                );
                return Ok(PageOutcome::RedirectDuplicate);
            }
            fetched.final_url.clone()
        } else {
            queued.url.clone()
        };

        let document = HtmlDocument::parse(&fetched.body);
        let record = match extract(&document, &page_url, self.settings.extract.summary_policy) {
            Ok(record) => record,
            Err(e) if !e.is_fatal() && !self.settings.abort_on_malformed => {
                tracing::warn!("Skipping page: {}", e);
                return Ok(PageOutcome::Malformed);
            }
            Err(e) => {
                tracing::error!("Aborting crawl: {}", e);
                return Err(e);
            }
        };

        let page_id =
            self.storage
                .insert_page(&record.title, &record.source_url, &record.summary_text)?;

        for media in &record.media_refs {
            if self.storage.insert_media(page_id, media)? {
                self.report.media_stored += 1;
            }
        }

        self.report_progress(&record.source_url, &record.summary_text);

        let children = self.discover_links(&document, &page_url, page_id, queued.depth)?;
        self.frontier.schedule(children);

        Ok(PageOutcome::Stored)
    }

    /// Classifies every link of a stored page and returns the ones to fetch
    ///
    /// Novel article and translation links get an edge. They are returned for
    /// scheduling while `depth` is below the recursion limit and counted as
    /// dangling otherwise.
    fn discover_links(
        &mut self,
        document: &impl PageDocument,
        page_url: &Url,
        page_id: i64,
        depth: u32,
    ) -> Result<Vec<QueuedUrl>, WikiError> {
        let mut novel = Vec::new();

        for href in document.body_links() {
            let classified = classify(href.as_deref(), page_url, &self.settings.rules);
            let Some(target) = classified.target else {
                continue;
            };

            match classified.kind {
                LinkKind::Article => {
                    if self.frontier.observe_internal(&target) {
                        novel.push(target);
                    }
                }
                LinkKind::External => {
                    if self.frontier.observe_external(&target) {
                        tracing::debug!("External link recorded: {}", target);
                    }
                }
                LinkKind::NonArticleInternal | LinkKind::Translation | LinkKind::Ignored => {}
            }
        }

        if self.collects_translations(page_url) {
            for href in document.language_links() {
                let classified = classify_translation(href.as_deref(), page_url);
                if let Some(target) = classified.target {
                    if self.frontier.observe_internal(&target) {
                        novel.push(target);
                    }
                }
            }
        }

        let mut children = Vec::new();
        for target in novel {
            let language = if self.settings.rules.language_aware {
                language_code(&target)
            } else {
                None
            };
            self.storage.insert_link(page_id, &target, language)?;
            self.report.edges_stored += 1;

            if depth >= self.settings.recursion_limit {
                tracing::debug!("Depth limit reached, not following {}", target);
                self.report.dangling += 1;
                continue;
            }

            match Url::parse(&target) {
                Ok(url) => children.push(QueuedUrl {
                    url,
                    depth: depth + 1,
                }),
                Err(e) => tracing::debug!("Not following {}: {}", target, e),
            }
        }

        Ok(children)
    }

    /// Translation links are gathered only from pages in the native language
    fn collects_translations(&self, page_url: &Url) -> bool {
        self.settings.rules.language_aware
            && language_code(page_url.as_str()) == Some(self.settings.native_language.as_str())
    }

    fn report_progress(&self, url: &str, summary: &str) {
        match self.settings.extract.text_mode {
            TextMode::Prose => tracing::info!("Scraped {}: {}", url, summary),
            TextMode::Ngrams => {
                let grams = tokenize(summary, self.settings.extract.ngram_size);
                tracing::info!("Scraped {}: {} distinct n-gram(s)", url, grams.len());
            }
        }
    }
}
