//! Wiki-Ripple: an encyclopedia crawler
//!
//! This crate walks a wiki-style site from a seed article, extracts a title,
//! a cleaned summary paragraph and media references from every page, and
//! records pages, link edges and media files in SQLite.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Wiki-Ripple operations
#[derive(Debug, Error)]
pub enum WikiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A fetch returned a non-success status. Always fatal for the crawl.
    #[error("Transport error for {url}: HTTP {status}")]
    Transport { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    /// An expected structural element (heading, content region) is missing.
    #[error("Malformed document at {url}: missing {missing}")]
    MalformedDocument { url: String, missing: &'static str },

    /// The database could not be opened or initialized.
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl WikiError {
    /// Returns true if this error should stop the whole crawl
    ///
    /// Only a malformed page can be skipped; everything else aborts.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MalformedDocument { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Wiki-Ripple operations
pub type Result<T> = std::result::Result<T, WikiError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport};
pub use extract::{clean, extract, tokenize, PageRecord, SummaryPolicy};
pub use crate::url::{classify, language_code, Classified, LinkKind, LinkRules};
