//! Output module for crawl reports and statistics
//!
//! This module handles:
//! - Printing the report of a finished crawl
//! - Reading and displaying statistics of an existing database

pub mod stats;

pub use stats::{load_statistics, print_statistics, CrawlStatistics};

use crate::crawler::CrawlReport;

/// Prints the report returned by a crawl to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    if report.cancelled {
        println!("Status: cancelled");
    } else {
        println!("Status: completed");
    }
    println!("  Pages stored: {}", report.pages_stored);
    println!("  Link edges stored: {}", report.edges_stored);
    println!("  Media stored: {}", report.media_stored);
    println!("  Dangling links (depth limit): {}", report.dangling);
    println!("  External links seen: {}", report.external_seen);

    if report.malformed_skipped > 0 {
        println!("  Malformed pages skipped: {}", report.malformed_skipped);
    }
    if report.redirect_duplicates > 0 {
        println!("  Redirect duplicates skipped: {}", report.redirect_duplicates);
    }
}
