//! Crawler module for wiki page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with redirect following
//! - The frontier of seen URLs and the depth-first work stack
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;

pub use coordinator::{Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_url, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Frontier, QueuedUrl};

use crate::config::Config;
use crate::storage::SqliteStorage;
use crate::WikiError;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the database and reset its tables
/// 2. Build the HTTP client
/// 3. Walk the site depth-first from the seed
/// 4. Return the crawl report
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `cancel` - Cancelling this token stops the crawl before the next fetch
///
/// # Example
///
/// ```no_run
/// use tokio_util::sync::CancellationToken;
/// use wiki_ripple::config::Config;
/// use wiki_ripple::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(&Config::default(), CancellationToken::new()).await?;
/// println!("{} pages stored", report.pages_stored);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    cancel: CancellationToken,
) -> Result<CrawlReport, WikiError> {
    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let fetcher = HttpFetcher::from_config(
        &config.user_agent,
        Duration::from_secs(config.crawler.fetch_timeout_secs),
    )?;

    let mut coordinator = Coordinator::new(config, fetcher, storage, cancel)?;
    coordinator.run().await
}
