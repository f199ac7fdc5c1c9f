//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{LinkRow, MediaRow, PageRow};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Page not found: {0}")]
    PageNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines the persistence gateway used by the crawler. Write
/// operations take `&mut self`; one backend instance serves a whole run.
pub trait Storage {
    // ===== Schema =====

    /// Drops and recreates the `page`, `link` and `file` tables
    fn reset_schema(&mut self) -> StorageResult<()>;

    // ===== Writes =====

    /// Stores one page and returns its durable id
    ///
    /// # Arguments
    ///
    /// * `title` - Page title
    /// * `url` - Absolute URL the page was fetched from
    /// * `content` - Cleaned summary text
    fn insert_page(&mut self, title: &str, url: &str, content: &str) -> StorageResult<i64>;

    /// Stores one link edge from a stored page
    ///
    /// `language` is set only in language-aware crawls.
    fn insert_link(&mut self, page_id: i64, url: &str, language: Option<&str>)
        -> StorageResult<()>;

    /// Stores a media reference for a page
    ///
    /// Returns false (and writes nothing) if the same URL is already stored
    /// for that page.
    fn insert_media(&mut self, page_id: i64, url: &str) -> StorageResult<bool>;

    // ===== Reads =====

    /// Gets a page by URL
    fn get_page_by_url(&self, url: &str) -> StorageResult<Option<PageRow>>;

    /// Gets all link edges of a page, in insertion order
    fn get_links(&self, page_id: i64) -> StorageResult<Vec<LinkRow>>;

    /// Gets all media rows of a page, in insertion order
    fn get_media(&self, page_id: i64) -> StorageResult<Vec<MediaRow>>;

    // ===== Statistics =====

    /// Gets total page count
    fn count_pages(&self) -> StorageResult<u64>;

    /// Gets total link edge count
    fn count_links(&self) -> StorageResult<u64>;

    /// Gets total media row count
    fn count_media(&self) -> StorageResult<u64>;

    /// Gets link edge counts grouped by language, most frequent first
    ///
    /// Edges without a language are reported under `None`.
    fn count_links_by_language(&self) -> StorageResult<Vec<(Option<String>, u64)>>;
}
