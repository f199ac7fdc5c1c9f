//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema reset
//! - Page record persistence
//! - Link edge and media tracking

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::WikiError;

use std::path::Path;

/// Opens a storage database without touching its contents
///
/// Used for reading statistics of a finished crawl.
pub fn open_storage(path: &Path) -> Result<SqliteStorage, WikiError> {
    SqliteStorage::new(path)
}

/// Represents a page in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRow {
    pub page_id: i64,
    pub page_url: String,
    pub page_title: String,
    pub page_content: String,
    pub added_in: String,
}

/// Represents a link edge in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub link_id: i64,
    pub page_id: i64,
    pub link: String,
    pub language: Option<String>,
    pub added_in: String,
}

/// Represents a media reference in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRow {
    pub file_id: i64,
    pub page_id: i64,
    pub file_url: String,
    pub added_in: String,
}
