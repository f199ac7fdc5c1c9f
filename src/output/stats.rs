//! Statistics generation from crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::storage::Storage;
use crate::WikiError;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of stored pages
    pub total_pages: u64,

    /// Total number of link edges
    pub total_links: u64,

    /// Total number of media rows
    pub total_media: u64,

    /// Link edges per language code; `None` for untagged edges
    pub links_by_language: Vec<(Option<String>, u64)>,
}

impl CrawlStatistics {
    /// Average number of outgoing edges per stored page
    pub fn links_per_page(&self) -> f64 {
        if self.total_pages == 0 {
            0.0
        } else {
            self.total_links as f64 / self.total_pages as f64
        }
    }

    /// Returns true if any edge carries a language code
    pub fn is_language_aware(&self) -> bool {
        self.links_by_language
            .iter()
            .any(|(language, _)| language.is_some())
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
pub fn load_statistics(storage: &dyn Storage) -> Result<CrawlStatistics, WikiError> {
    Ok(CrawlStatistics {
        total_pages: storage.count_pages()?,
        total_links: storage.count_links()?,
        total_media: storage.count_media()?,
        links_by_language: storage.count_links_by_language()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages stored: {}", stats.total_pages);
    println!("  Link edges: {}", stats.total_links);
    println!("  Media files: {}", stats.total_media);
    println!("  Links per page: {:.1}", stats.links_per_page());
    println!();

    if stats.is_language_aware() {
        println!("Links by Language:");
        for (language, count) in &stats.links_by_language {
            let percentage = if stats.total_links > 0 {
                (*count as f64 / stats.total_links as f64) * 100.0
            } else {
                0.0
            };
            println!(
                "  {}: {} ({:.1}%)",
                language.as_deref().unwrap_or("(none)"),
                count,
                percentage
            );
        }
        println!();
    }
}
