//! Page extraction module
//!
//! This module turns a fetched page into a [`PageRecord`]:
//! - a narrow document query interface over the HTML tree
//! - title, summary and media extraction
//! - summary text cleaning and n-gram tokenization

mod document;
mod page;
mod text;

pub use crate::config::SummaryPolicy;
pub use document::{HtmlDocument, PageDocument};
pub use page::{extract, PageRecord, UNDEFINED_SUMMARY};
pub use text::{clean, tokenize};
