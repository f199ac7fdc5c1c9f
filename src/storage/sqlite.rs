//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{LinkRow, MediaRow, PageRow};
use crate::WikiError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates a database file
    ///
    /// Missing tables are created; existing rows are kept until
    /// [`Storage::reset_schema`] is called.
    ///
    /// # Errors
    ///
    /// `WikiError::PersistenceUnavailable` if the file cannot be opened or
    /// initialized.
    pub fn new(path: &Path) -> Result<Self, WikiError> {
        let conn = Connection::open(path).map_err(|e| {
            WikiError::PersistenceUnavailable(format!("cannot open {}: {}", path.display(), e))
        })?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .and_then(|_| schema::initialize_schema(&conn))
        .map_err(|e| {
            WikiError::PersistenceUnavailable(format!(
                "cannot initialize {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, WikiError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn page_exists(&self, page_id: i64) -> StorageResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM page WHERE page_id = ?1",
                params![page_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

fn page_from_row(row: &Row<'_>) -> rusqlite::Result<PageRow> {
    Ok(PageRow {
        page_id: row.get(0)?,
        page_url: row.get(1)?,
        page_title: row.get(2)?,
        page_content: row.get(3)?,
        added_in: row.get(4)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Schema =====

    fn reset_schema(&mut self) -> StorageResult<()> {
        schema::reset_schema(&self.conn)?;
        Ok(())
    }

    // ===== Writes =====

    fn insert_page(&mut self, title: &str, url: &str, content: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO page (page_url, page_title, page_content, added_in) VALUES (?1, ?2, ?3, ?4)",
            params![url, title, content, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_link(
        &mut self,
        page_id: i64,
        url: &str,
        language: Option<&str>,
    ) -> StorageResult<()> {
        if !self.page_exists(page_id)? {
            return Err(StorageError::PageNotFound(page_id));
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO link (page_id, link, language, added_in) VALUES (?1, ?2, ?3, ?4)",
            params![page_id, url, language, now],
        )?;
        Ok(())
    }

    fn insert_media(&mut self, page_id: i64, url: &str) -> StorageResult<bool> {
        let existing = self
            .conn
            .query_row(
                "SELECT file_id FROM file WHERE page_id = ?1 AND file_url = ?2",
                params![page_id, url],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        if existing.is_some() {
            return Ok(false);
        }

        if !self.page_exists(page_id)? {
            return Err(StorageError::PageNotFound(page_id));
        }

        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO file (page_id, file_url, added_in) VALUES (?1, ?2, ?3)",
            params![page_id, url, now],
        )?;
        Ok(true)
    }

    // ===== Reads =====

    fn get_page_by_url(&self, url: &str) -> StorageResult<Option<PageRow>> {
        let page = self
            .conn
            .query_row(
                "SELECT page_id, page_url, page_title, page_content, added_in
                 FROM page WHERE page_url = ?1 ORDER BY page_id LIMIT 1",
                params![url],
                page_from_row,
            )
            .optional()?;
        Ok(page)
    }

    fn get_links(&self, page_id: i64) -> StorageResult<Vec<LinkRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT link_id, page_id, link, language, added_in
             FROM link WHERE page_id = ?1 ORDER BY link_id",
        )?;

        let links = stmt
            .query_map(params![page_id], |row| {
                Ok(LinkRow {
                    link_id: row.get(0)?,
                    page_id: row.get(1)?,
                    link: row.get(2)?,
                    language: row.get(3)?,
                    added_in: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    fn get_media(&self, page_id: i64) -> StorageResult<Vec<MediaRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT file_id, page_id, file_url, added_in
             FROM file WHERE page_id = ?1 ORDER BY file_id",
        )?;

        let media = stmt
            .query_map(params![page_id], |row| {
                Ok(MediaRow {
                    file_id: row.get(0)?,
                    page_id: row.get(1)?,
                    file_url: row.get(2)?,
                    added_in: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(media)
    }

    // ===== Statistics =====

    fn count_pages(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM page")
    }

    fn count_links(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM link")
    }

    fn count_media(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM file")
    }

    fn count_links_by_language(&self) -> StorageResult<Vec<(Option<String>, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT language, COUNT(*) AS n FROM link
             GROUP BY language ORDER BY n DESC, language",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let language: Option<String> = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((language, count as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
